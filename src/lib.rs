//! # YaNote
//!
//! 개인 메모 서비스입니다. 로그인한 사용자는 자신만 볼 수 있는 텍스트 메모를
//! 관리하고, 각 메모는 사이트 전체에서 유일한 slug로 접근합니다.
//!
//! ## 모듈 구성
//! - `routes`: HTTP 핸들러와 라우터
//! - `middleware`: 로그인 확인용 Extractor
//! - `forms`: 폼 디코딩과 검증, slug 결정
//! - `db`: SQLite 쿼리
//! - `models`: DB 행(row)과 입력 타입
//! - `services`: 비밀번호 해싱
//!
//! 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 모두 이 라이브러리를 사용합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod urls;

pub use routes::router;
pub use state::AppState;
