//! 핸들러가 사용하는 서비스 모음

pub mod password;
