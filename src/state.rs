use chrono::Duration;
use sqlx::SqlitePool;

use crate::config::Config;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc이므로 clone해도 풀이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// 세션 토큰 서명용 비밀키
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub session_cookie_secure: bool,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: config.session_ttl,
            session_cookie_secure: config.session_cookie_secure,
        }
    }
}
