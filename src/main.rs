//! # YaNote 웹 서버 진입점
//!
//! 이 파일은 YaNote 애플리케이션의 **시작점(entry point)**입니다.
//! 실제 기능은 라이브러리 크레이트(`src/lib.rs`)에 있고,
//! 여기서는 조립과 실행만 담당합니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 읽기
//! 4. SQLite 연결 풀 생성 및 마이그레이션 실행
//! 5. 라우터 구성 후 HTTP 서버 시작

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티
use yanote::{config::Config, db, router, AppState};

// #[tokio::main]: 비동기 런타임(Tokio)을 만들고 main을 그 안에서 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok(): .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
    // 환경변수가 없으면 yanote, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yanote=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // 필수 환경변수가 없으면 `?`로 에러가 전파되어 서버가 시작되지 않습니다.
    let config = Config::from_env()?;
    tracing::info!("Starting YaNote server on {}:{}", config.host, config.port);

    // ── 4단계: 데이터베이스 연결 및 마이그레이션 ──
    // 최대 5개의 연결을 유지하는 풀. DB 파일이 없으면 새로 만듭니다.
    let pool = db::connect(&config.database_url, 5).await?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool).await?;

    // ── 5단계: 라우터 구성 및 서버 시작 ──
    let app = router(AppState::new(pool, &config));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve: 연결을 받아 라우터로 요청을 넘기는 서버 루프
    axum::serve(listener, app).await?;

    Ok(())
}
