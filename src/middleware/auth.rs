use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{
    db::{self, users as db_users},
    error::AppError,
    models::User,
    routes::found,
    state::AppState,
    urls,
};

/// 세션 토큰을 담는 쿠키 이름
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // 사용자 id
    pub sid: String, // auth_sessions.id
    pub exp: i64,
    pub iat: i64,
}

/// 로그인한 사용자. 이 Extractor를 받는 핸들러는 로그인 전용이 되고,
/// 익명 요청은 로그인 페이지로 리다이렉트됩니다.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// 로그인했다면 그 사용자. 익명 요청도 거부하지 않습니다.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[derive(Debug, Error)]
pub enum AuthRejection {
    /// `next`: 요청했던 URL (경로와 쿼리)
    #[error("Login required to access {next}")]
    LoginRequired { next: String },
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRequired { next } => found(&urls::login_with_next(&next)),
            AuthRejection::Internal(e) => e.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(&parts.headers, state).await? {
            Some(user) => Ok(CurrentUser { user }),
            None => {
                let next = requested_url(parts);
                tracing::debug!("Anonymous request to {}, redirecting to login", next);
                Err(AuthRejection::LoginRequired { next })
            }
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(authenticate(&parts.headers, state).await?))
    }
}

/// 요청의 세션 토큰으로 사용자를 찾습니다.
///
/// 토큰 없음, 서명 불일치, 토큰 만료, 폐기되거나 만료된 세션, 삭제된 사용자는
/// 모두 `Ok(None)`입니다. DB 실패만 에러입니다.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let claims = match verify_session_token(&token, &state.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Rejected session token: {}", e);
            return Ok(None);
        }
    };

    let Some(session) = db::find_active_session(&state.pool, &hash_token(&token)).await? else {
        return Ok(None);
    };
    if session.id != claims.sid || session.user_id != claims.sub {
        tracing::warn!("Session token claims do not match session {}", session.id);
        return Ok(None);
    }

    db_users::find_by_id(&state.pool, &session.user_id).await
}

/// `session` 쿠키의 세션 토큰. 없으면 `Authorization: Bearer` 헤더에서 찾습니다.
///
/// 쿠키는 `cookie` 크레이트로 파싱합니다. 따옴표로 감싼 값은 벗겨내고,
/// 비어 있지 않은 첫 번째 `session` 쿠키를 사용합니다.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value_trimmed().is_empty())
        .map(|c| c.value_trimmed().to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string)
    })
}

fn requested_url(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// `user_id`의 세션을 열고, 클라이언트에 넘길 토큰을 반환합니다.
pub async fn start_session(state: &AppState, user_id: &str) -> Result<String, AppError> {
    let session_id = uuid::Uuid::now_v7().to_string();
    let token = create_session_token(user_id, &session_id, &state.jwt_secret, state.session_ttl)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let expires_at = (Utc::now() + state.session_ttl)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db::create_session(
        &state.pool,
        &session_id,
        user_id,
        &hash_token(&token),
        &expires_at,
    )
    .await?;

    Ok(token)
}

/// 요청 토큰의 세션을 폐기합니다. 세션이 있었는지 반환합니다.
pub async fn end_session(state: &AppState, headers: &HeaderMap) -> Result<bool, AppError> {
    match session_token(headers) {
        Some(token) => db::delete_session(&state.pool, &hash_token(&token)).await,
        None => Ok(false),
    }
}

/// `token`을 담고 `ttl` 동안 유효한 쿠키
pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// 삭제용 쿠키: 빈 값, `Max-Age=0`, 과거의 만료 시각
pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

pub fn create_session_token(
    user_id: &str,
    session_id: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_session_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
