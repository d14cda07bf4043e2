//! # 데이터 모델 모듈
//!
//! DB에서 읽어오는 행(row) 타입과 저장 계층이 받는 입력 타입을 정의합니다.
//! - `note`: 메모와 검증을 통과한 메모 입력
//! - `user`: 사용자 계정
//! - `session`: 로그인 세션
//!
//! `pub use`로 하위 모듈의 타입을 다시 내보내므로
//! `crate::models::Note`처럼 짧은 경로로 사용할 수 있습니다.

pub mod note;
pub mod session;
pub mod user;

pub use note::*;
pub use session::*;
pub use user::*;
