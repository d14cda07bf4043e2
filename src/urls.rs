//! # URL 이름
//!
//! 라우터가 쓰는 경로 패턴과, 리다이렉트/테스트용 실제 URL을 만드는 함수들입니다.
//! 모든 페이지 경로는 `/`로 끝납니다.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const HOME: &str = "/";
pub const LIST: &str = "/notes/";
pub const ADD: &str = "/add/";
pub const SUCCESS: &str = "/done/";
pub const DETAIL: &str = "/note/{slug}/";
pub const EDIT: &str = "/edit/{slug}/";
pub const DELETE: &str = "/delete/{slug}/";
pub const LOGIN: &str = "/auth/login/";
pub const LOGOUT: &str = "/auth/logout/";
pub const SIGNUP: &str = "/auth/signup/";
pub const HEALTH: &str = "/health";

/// `next` 파라미터에서 인코딩하지 않는 문자: unreserved 문자와 `/`
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn detail(slug: &str) -> String {
    format!("/note/{}/", slug)
}

pub fn edit(slug: &str) -> String {
    format!("/edit/{}/", slug)
}

pub fn delete(slug: &str) -> String {
    format!("/delete/{}/", slug)
}

/// 로그인 후 `next`로 돌아오는 로그인 페이지 URL
pub fn login_with_next(next: &str) -> String {
    format!(
        "{}?next={}",
        LOGIN,
        utf8_percent_encode(next, NEXT_ENCODE_SET)
    )
}

/// 로그인 후 `next`로 리다이렉트해도 안전한지 확인합니다.
///
/// 이 사이트의 절대 경로여야 하고, `//host` 형태의 프로토콜 상대 URL이 아니어야 하며,
/// `Location` 헤더 값으로 쓸 수 있어야 합니다 (제어 문자 불가).
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control)
}
