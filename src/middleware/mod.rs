//! 핸들러보다 먼저 실행되는 요청 Extractor 모음

pub mod auth;
