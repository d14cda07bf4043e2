//! # 폼(Form)과 검증 모듈
//!
//! 폼 본문은 `application/x-www-form-urlencoded`로 들어와 `*FormData` 구조체로
//! 디코딩됩니다. 모든 필드가 `Option`이라서, 필드가 빠져도 디코딩 실패(400)가
//! 아니라 검증 메시지가 됩니다.
//!
//! 검증 실패는 요청 실패가 아닙니다. 문제는 `FormErrors`에 모아 두고,
//! 에러가 담긴 폼을 200으로 다시 보여줍니다.
//!
//! ## slug 결정 순서
//! 1. 입력한 slug가 있으면 그대로 사용 (형식/길이 검사)
//! 2. 비어 있으면 제목에서 만듦 (`slugify_title`, 비ASCII는 음역)
//! 3. 어느 쪽이든 다른 메모가 쓰고 있으면 `"<slug>" + WARNING` 에러

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::{Note, NoteInput},
};

/// 충돌한 slug 뒤에 붙여 중복 에러 메시지를 만듭니다.
pub const WARNING: &str = " - such a slug already exists, choose a unique value!";

pub const TITLE_MAX_LENGTH: usize = 100;
pub const SLUG_MAX_LENGTH: usize = 100;
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_SLUG: &str =
    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.";

/// 특정 필드가 아닌 폼 전체에 대한 에러의 키
pub const NON_FIELD_ERRORS: &str = "__all__";

/// 필드 이름 → 메시지 목록 (필드 이름 순)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 메모 제목에서 slug를 만듭니다.
///
/// 비ASCII 문자는 음역되어 `"Заметка"`는 `"zametka"`가 됩니다.
/// 결과는 `SLUG_MAX_LENGTH`자로 자릅니다.
pub fn slugify_title(title: &str) -> String {
    slug::slugify(title).chars().take(SLUG_MAX_LENGTH).collect()
}

fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 앞뒤 공백을 없애고, 빈 값은 `None`으로 바꿉니다.
fn clean_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── 메모 폼 ──

/// 디코딩된 메모 폼 본문
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteFormData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// 추가/수정 페이지에 렌더링되는 메모 폼
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: String,
    #[serde(default)]
    pub errors: FormErrors,
}

/// `NoteForm::validate`의 결과
#[derive(Debug)]
pub enum NoteValidation {
    Valid(NoteInput),
    Invalid(NoteForm),
}

impl NoteForm {
    /// 수정 페이지용. 기존 메모 내용으로 채운 폼
    pub fn for_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
            errors: FormErrors::default(),
        }
    }

    /// 제출된 폼을 검증합니다.
    ///
    /// 제목, 내용, slug 모두 앞뒤 공백을 제거한 값으로 검사하고 저장합니다.
    /// slug가 비어 있으면 제목에서 만듭니다. 결정된 slug는 다른 메모가 쓰고
    /// 있으면 안 됩니다. `instance`는 수정 중인 메모로, 이 검사에서 빠집니다.
    pub async fn validate(
        data: NoteFormData,
        pool: &SqlitePool,
        instance: Option<&Note>,
    ) -> Result<NoteValidation, AppError> {
        let title = clean_field(data.title);
        let text = clean_field(data.text);
        let slug = clean_field(data.slug);

        let mut errors = FormErrors::default();

        match &title {
            None => errors.add("title", REQUIRED),
            Some(t) if t.chars().count() > TITLE_MAX_LENGTH => errors.add(
                "title",
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    TITLE_MAX_LENGTH,
                    t.chars().count()
                ),
            ),
            Some(_) => {}
        }

        if text.is_none() {
            errors.add("text", REQUIRED);
        }

        if let Some(s) = &slug {
            if s.chars().count() > SLUG_MAX_LENGTH {
                errors.add(
                    "slug",
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        SLUG_MAX_LENGTH,
                        s.chars().count()
                    ),
                );
            } else if !is_valid_slug(s) {
                errors.add("slug", INVALID_SLUG);
            }
        }

        let resolved_slug = match (&slug, &title) {
            (Some(s), _) => Some(s.clone()),
            (None, Some(t)) => {
                let derived = slugify_title(t);
                if derived.is_empty() {
                    errors.add("slug", "Could not build a slug from the title, enter one.");
                    None
                } else {
                    Some(derived)
                }
            }
            (None, None) => None,
        };

        if let Some(s) = resolved_slug.as_deref().filter(|_| !errors.contains("slug")) {
            let exclude_id = instance.map(|n| n.id.as_str());
            if db::slug_exists(pool, s, exclude_id).await? {
                errors.add("slug", format!("{}{}", s, WARNING));
            }
        }

        match (title, text, resolved_slug) {
            (Some(title), Some(text), Some(slug)) if errors.is_empty() => {
                Ok(NoteValidation::Valid(NoteInput { title, text, slug }))
            }
            (title, text, _) => Ok(NoteValidation::Invalid(NoteForm {
                title: title.unwrap_or_default(),
                text: text.unwrap_or_default(),
                slug: slug.unwrap_or_default(),
                errors,
            })),
        }
    }

    /// INSERT 시점에 slug 경쟁에서 진 제출을 다시 보여줍니다.
    pub fn slug_taken(input: NoteInput) -> Self {
        let mut errors = FormErrors::default();
        errors.add("slug", format!("{}{}", input.slug, WARNING));
        Self {
            title: input.title,
            text: input.text,
            slug: input.slug,
            errors,
        }
    }
}

// ── 계정 폼 ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupFormData {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 검증을 통과한 회원가입 입력
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

/// 렌더링되는 회원가입 폼. 비밀번호는 되돌려 보내지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub errors: FormErrors,
}

impl SignupForm {
    /// 필드 규칙만 검사합니다. username 중복은 INSERT 때 확인됩니다.
    pub fn validate(data: SignupFormData) -> Result<NewAccount, SignupForm> {
        let username = clean_field(data.username);
        let email = clean_field(data.email);
        let password = data.password.filter(|p| !p.is_empty());

        let mut errors = FormErrors::default();

        match &username {
            None => errors.add("username", REQUIRED),
            Some(u) => {
                let len = u.chars().count();
                if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
                    errors.add(
                        "username",
                        format!(
                            "Username must be between {} and {} characters.",
                            USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
                        ),
                    );
                } else if !u
                    .chars()
                    .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
                {
                    errors.add(
                        "username",
                        "Username may contain only letters, numbers and @/./+/-/_ characters.",
                    );
                }
            }
        }

        if let Some(e) = &email {
            if !e.contains('@') {
                errors.add("email", "Enter a valid email address.");
            }
        }

        match &password {
            None => errors.add("password", REQUIRED),
            Some(p) if p.chars().count() < PASSWORD_MIN_LENGTH => errors.add(
                "password",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    PASSWORD_MIN_LENGTH
                ),
            ),
            Some(_) => {}
        }

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => Ok(NewAccount {
                username,
                email,
                password,
            }),
            (username, _) => Err(SignupForm {
                username: username.unwrap_or_default(),
                email: email.unwrap_or_default(),
                errors,
            }),
        }
    }

    pub fn username_taken(account: NewAccount) -> Self {
        let mut errors = FormErrors::default();
        errors.add("username", "A user with that username already exists.");
        Self {
            username: account.username,
            email: account.email.unwrap_or_default(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// 로그인 성공 후 이동할 경로
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub errors: FormErrors,
}

impl LoginForm {
    pub fn new(next: Option<String>) -> Self {
        Self {
            next,
            ..Self::default()
        }
    }

    /// 없는 사용자와 틀린 비밀번호에 같은 메시지를 씁니다.
    pub fn invalid_credentials(username: String, next: Option<String>) -> Self {
        let mut errors = FormErrors::default();
        errors.add(
            NON_FIELD_ERRORS,
            "Please enter a correct username and password.",
        );
        Self {
            username,
            next,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_title_transliterates_and_lowercases() {
        assert_eq!(slugify_title("Test Note"), "test-note");
        assert_eq!(slugify_title("Заметка о Rust"), "zametka-o-rust");
        assert_eq!(slugify_title("  Hello,   World!  "), "hello-world");
    }

    #[test]
    fn slugify_title_truncates() {
        let title = "a".repeat(SLUG_MAX_LENGTH + 20);
        assert_eq!(slugify_title(&title).len(), SLUG_MAX_LENGTH);
    }

    #[test]
    fn slug_charset() {
        assert!(is_valid_slug("test-note_2"));
        assert!(!is_valid_slug("test note"));
        assert!(!is_valid_slug("заметка"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn form_errors_keep_messages_per_field() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());
        errors.add("slug", "first");
        errors.add("slug", "second");
        errors.add("title", REQUIRED);

        assert_eq!(errors.get("slug"), Some(&["first".to_string(), "second".to_string()][..]));
        assert!(errors.contains("title"));
        assert!(errors.get("text").is_none());

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["slug"][1], "second");
    }

    #[test]
    fn signup_rejects_short_fields() {
        let form = SignupForm::validate(SignupFormData {
            username: Some("ab".to_string()),
            email: Some("nope".to_string()),
            password: Some("short".to_string()),
        })
        .unwrap_err();

        assert!(form.errors.contains("username"));
        assert!(form.errors.contains("email"));
        assert!(form.errors.contains("password"));
        assert_eq!(form.username, "ab");
    }

    #[test]
    fn signup_accepts_valid_account() {
        let account = SignupForm::validate(SignupFormData {
            username: Some(" author ".to_string()),
            email: None,
            password: Some("password123".to_string()),
        })
        .unwrap();

        assert_eq!(account.username, "author");
        assert!(account.email.is_none());
    }

    #[test]
    fn signup_requires_username_and_password() {
        let form = SignupForm::validate(SignupFormData::default()).unwrap_err();
        assert_eq!(form.errors.get("username"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(form.errors.get("password"), Some(&[REQUIRED.to_string()][..]));
    }
}
