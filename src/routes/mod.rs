//! # 라우트 핸들러 모듈
//!
//! 각 페이지는 템플릿이 받을 컨텍스트(`object_list`, `note`, `form` 등)를
//! JSON 문서로 응답합니다.
//!
//! - `auth`: 회원가입, 로그인, 로그아웃
//! - `health`: 헬스체크
//! - `home`: 누구나 볼 수 있는 첫 페이지
//! - `notes`: 로그인이 필요한 메모 페이지

pub mod auth;
pub mod health;
pub mod home;
pub mod notes;

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{state::AppState, urls};

/// 모든 페이지를 연결한 라우터를 만듭니다.
///
/// `.route(경로, get(핸들러).post(핸들러))`로 HTTP 메서드별 핸들러를 지정하고,
/// `TraceLayer`로 모든 요청/응답을 tracing 로그로 남깁니다.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(urls::HOME, get(home::home))
        .route(urls::LIST, get(notes::list_notes))
        .route(urls::ADD, get(notes::add_note_form).post(notes::add_note))
        .route(urls::SUCCESS, get(notes::success))
        .route(urls::DETAIL, get(notes::note_detail))
        .route(urls::EDIT, get(notes::edit_note_form).post(notes::edit_note))
        .route(
            urls::DELETE,
            get(notes::delete_note_confirm).post(notes::delete_note),
        )
        .route(urls::SIGNUP, get(auth::signup_form).post(auth::signup))
        .route(urls::LOGIN, get(auth::login_form).post(auth::login))
        .route(urls::LOGOUT, get(auth::logout).post(auth::logout))
        .route(urls::HEALTH, get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `location`으로 가는 `302 Found` 리다이렉트
///
/// `axum::response::Redirect`는 303/307/308만 제공하므로 직접 만듭니다.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
