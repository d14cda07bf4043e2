//! # 로그인 세션 모델
//!
//! 로그인할 때마다 `AuthSession` 행이 하나 생깁니다.
//! 쿠키에는 서명된 토큰이 담기고, DB에는 그 토큰의 SHA-256만 저장됩니다.
//! 로그아웃하면 행이 삭제되어, 서명이 유효한 토큰이라도 더는 쓸 수 없습니다.

use serde::{Deserialize, Serialize};

/// `auth_sessions` 테이블의 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthSession {
    pub id: String,
    pub user_id: String,
    /// 발급한 토큰의 SHA-256 (16진수)
    pub token_hash: String,
    /// `%Y-%m-%dT%H:%M:%S%.3fZ` 형식. SQLite `strftime`과 같은 형식이라
    /// 문자열 비교만으로 만료 여부를 판단할 수 있습니다.
    pub expires_at: String,
    pub created_at: String,
}
