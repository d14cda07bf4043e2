//! # 인증(Auth) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET/POST /auth/signup/` → 계정 생성 후 로그인 페이지로 302
//! - `GET/POST /auth/login/`  → 세션을 열고 `next`로 302
//! - `GET/POST /auth/logout/` → 세션 폐기

use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{self, users as db_users},
    error::AppError,
    forms::{LoginForm, LoginFormData, SignupForm, SignupFormData},
    middleware::auth::{clear_session_cookie, end_session, session_cookie, start_session},
    routes::found,
    services::password::{hash_password, verify_password},
    state::AppState,
    urls,
};

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

pub async fn signup_form() -> Json<Value> {
    Json(json!({ "form": SignupForm::default() }))
}

pub async fn signup(
    State(state): State<AppState>,
    Form(data): Form<SignupFormData>,
) -> Result<Response, AppError> {
    let account = match SignupForm::validate(data) {
        Ok(account) => account,
        Err(form) => return Ok(Json(json!({ "form": form })).into_response()),
    };

    let password_hash = hash_password(&account.password)?;

    match db_users::create_user(
        &state.pool,
        &account.username,
        account.email.as_deref(),
        &password_hash,
    )
    .await
    {
        Ok(user) => {
            tracing::info!("Registered user {}", user.username);
            Ok(found(urls::LOGIN))
        }
        Err(AppError::Conflict(_)) => {
            Ok(Json(json!({ "form": SignupForm::username_taken(account) })).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn login_form(Query(query): Query<NextQuery>) -> Json<Value> {
    Json(json!({ "form": LoginForm::new(query.next) }))
}

/// `POST /auth/login/`
///
/// `next`는 폼 본문이나 쿼리 문자열에서 가져옵니다.
/// 이 사이트 안의 경로가 아니면 무시하고 메모 목록으로 보냅니다.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    Form(data): Form<LoginFormData>,
) -> Result<Response, AppError> {
    let next = data
        .next
        .or(query.next)
        .filter(|n| !n.is_empty());
    let username = data.username.unwrap_or_default().trim().to_string();
    let password = data.password.unwrap_or_default();

    let user = match db_users::find_by_username(&state.pool, &username).await? {
        Some(user) if verify_password(&password, &user.password_hash)? => user,
        _ => {
            tracing::debug!("Failed login for {:?}", username);
            let form = LoginForm::invalid_credentials(username, next);
            return Ok(Json(json!({ "form": form })).into_response());
        }
    };

    let swept = db::delete_expired_sessions(&state.pool).await?;
    if swept > 0 {
        tracing::debug!("Removed {} expired sessions", swept);
    }

    let target = match next {
        Some(next) if urls::is_local_path(&next) => next,
        Some(next) => {
            tracing::warn!("Ignoring unsafe login redirect {:?}", next);
            urls::LIST.to_string()
        }
        None => urls::LIST.to_string(),
    };

    let token = start_session(&state, &user.id).await?;
    tracing::info!("User {} logged in", user.username);

    let cookie = session_cookie(&token, state.session_ttl, state.session_cookie_secure);
    Ok((
        StatusCode::FOUND,
        [(LOCATION, target), (SET_COOKIE, cookie.to_string())],
    )
        .into_response())
}

/// 로그인 여부와 관계없이 항상 200으로 응답합니다.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if end_session(&state, &headers).await? {
        tracing::info!("Session closed");
    }

    Ok((
        [(SET_COOKIE, clear_session_cookie().to_string())],
        Json(json!({ "message": "You have been logged out." })),
    )
        .into_response())
}
