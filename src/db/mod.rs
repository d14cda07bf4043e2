//! # 데이터베이스 접근 계층
//!
//! SQLite와 통신하는 모든 코드가 여기에 있습니다.
//! 라우트 핸들러는 이 함수들만 호출하고, SQL을 직접 작성하지 않습니다.
//!
//! - `notes`: 메모 CRUD. 모든 조회/수정/삭제는 작성자 기준으로 제한됩니다.
//! - `users`: 계정 조회와 생성
//! - `auth_sessions`: 로그인 세션

pub mod auth_sessions;
pub mod notes;
pub mod users;

pub use auth_sessions::*;
pub use notes::*;

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// `./migrations`의 스키마 마이그레이션
///
/// `sqlx::migrate!` 매크로가 컴파일 시점에 SQL 파일을 바이너리에 포함시킵니다.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 연결 풀을 엽니다. DB 파일이 없으면 새로 만듭니다.
///
/// SQLite의 외래 키 제약은 연결마다 켜야 합니다.
/// `ON DELETE CASCADE`가 동작하려면 `foreign_keys(true)`가 필요합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// 아직 적용되지 않은 마이그레이션을 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
