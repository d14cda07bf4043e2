//! # 로그인 세션 쿼리
//!
//! ```text
//! 로그인 → create_session() → [expires_at까지 유효] → 로그아웃 시 delete_session()
//!                                     └─ 나머지는 delete_expired_sessions()가 정리
//! ```

use crate::error::AppError;
use crate::models::AuthSession;
use sqlx::SqlitePool;

pub async fn create_session(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO auth_sessions (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// `token_hash`에 해당하는 세션을 찾습니다. 만료된 행은 무시합니다.
pub async fn find_active_session(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<AuthSession>, AppError> {
    let session = sqlx::query_as::<_, AuthSession>(
        r#"
        SELECT id, user_id, token_hash, expires_at, created_at
        FROM auth_sessions
        WHERE token_hash = ?
          AND expires_at > strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 실제로 세션이 삭제되었는지 반환합니다.
pub async fn delete_session(pool: &SqlitePool, token_hash: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM auth_sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 만료된 세션을 모두 삭제하고, 삭제된 행 수를 반환합니다.
pub async fn delete_expired_sessions(pool: &SqlitePool) -> Result<u64, AppError> {
    let result = sqlx::query(
        "DELETE FROM auth_sessions WHERE expires_at <= strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
