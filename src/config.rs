//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `main`이 먼저 `dotenvy::dotenv()`를 호출하므로 `.env` 파일의 값도 사용됩니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 URL (필수)
//! - `JWT_SECRET`: 세션 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST`: 서버 바인딩 주소 (기본값 `0.0.0.0`)
//! - `PORT`: 서버 포트 번호 (기본값 `8000`)
//! - `SESSION_TTL_HOURS`: 로그인 세션 유지 시간 (기본값 2주)
//! - `SESSION_COOKIE_SECURE`: 세션 쿠키에 `Secure` 속성 추가 여부 (기본값 `false`)

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;

// chrono::Duration: 시간 간격 타입. 세션 만료 시각 계산에 사용합니다.
use chrono::Duration;

/// 세션 유지 시간 기본값 (시간 단위, 14일)
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 14;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// `AppState`로 옮겨져 모든 핸들러에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/yanote.db")
    pub database_url: String,
    /// 세션 토큰(JWT) 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
    /// 로그인 세션 유지 시간. 쿠키의 Max-Age와 세션 만료 시각에 함께 쓰입니다.
    pub session_ttl: Duration,
    /// true이면 세션 쿠키에 `Secure` 속성을 붙입니다 (HTTPS 전용 전송).
    pub session_cookie_secure: bool,
}

impl Config {
    /// 환경변수에서 설정을 읽어 `Config`를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`, `JWT_SECRET`이 없으면 `env::VarError`를 반환합니다.
    /// 나머지 항목은 없거나 파싱에 실패하면 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            // `?` 연산자: 환경변수가 없으면 즉시 에러를 반환합니다.
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            // unwrap_or_else: Err일 때 클로저를 실행해 기본값을 만듭니다.
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // .parse(): 문자열을 u16으로 변환. 실패하면 8000을 사용합니다.
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            // 0 이하의 값은 무시하고 기본값을 씁니다.
            session_ttl: Duration::hours(
                env::var("SESSION_TTL_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|hours: &i64| *hours > 0)
                    .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
            ),
            // "1", "true", "yes"만 참으로 인정합니다.
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}
