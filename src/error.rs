//! # 에러 처리 모듈
//!
//! 핸들러가 반환할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! `AppError`가 아닌 경우:
//! - 폼 검증 실패는 값(`forms::FormErrors`)으로 다루고, 폼을 200으로 다시 보여줍니다.
//! - 로그인하지 않은 요청은 `middleware::auth::AuthRejection`이 로그인 페이지로 보냅니다.

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

// #[derive(Debug, Error)]
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 구현과
//   #[error("...")] 어트리뷰트 기반 Display 구현을 자동 생성합니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 리소스가 없거나 다른 사용자의 것임 (HTTP 404)
    /// 남의 메모도 "없음"으로 응답해 존재 여부를 드러내지 않습니다.
    #[error("Resource not found")]
    NotFound,

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환 (From 트레이트 구현).
    /// 덕분에 sqlx 함수 결과에 `?`를 바로 쓸 수 있습니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 중복 충돌 (HTTP 409). 예: 이미 있는 username
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 같은 slug의 메모가 이미 있음
    /// 핸들러가 잡아서 폼 에러로 보여주므로, 처리되지 않았을 때만 409로 나갑니다.
    #[error("Slug already exists: {0}")]
    SlugTaken(String),
}

impl AppError {
    /// UNIQUE 컬럼에서 `INSERT`/`UPDATE`가 실패하면 `on_unique`의 결과로 바꾸고,
    /// 그 밖의 DB 에러는 `AppError::Database`로 둡니다.
    pub fn from_unique_violation(err: sqlx::Error, on_unique: impl FnOnce() -> AppError) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => on_unique(),
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 응답 형식: `{"error": {"code": "...", "message": "..."}}`
    ///
    /// 내부 에러는 로그에 상세 내용을 남기고,
    /// 클라이언트에는 일반적인 메시지만 보냅니다 (내부 정보 노출 방지).
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::SlugTaken(ref slug) => (
                StatusCode::CONFLICT,
                "slug_taken",
                format!("Slug already exists: {}", slug),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
