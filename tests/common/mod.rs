//! Shared fixtures: an in-memory database, users, notes and request helpers.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION},
        Method, Request,
    },
    response::Response,
};
use chrono::Duration;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use yanote::{
    db::{self, users as db_users},
    forms::slugify_title,
    middleware::auth::start_session,
    models::{Note, NoteInput, User},
    router, AppState,
};

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        // One connection: every new connection to :memory: is a new database.
        let pool = db::connect("sqlite::memory:", 1)
            .await
            .expect("open in-memory database");
        db::migrate(&pool).await.expect("run migrations");

        Self {
            state: AppState {
                pool,
                jwt_secret: "test-secret".to_string(),
                session_ttl: Duration::hours(1),
                session_cookie_secure: false,
            },
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.state.pool
    }

    /// A user whose password can never match; log in with `force_login`.
    pub async fn create_user(&self, username: &str) -> User {
        db_users::create_user(
            self.pool(),
            username,
            Some(&format!("{}@example.com", username)),
            "!unusable",
        )
        .await
        .expect("create user")
    }

    /// A user who can log in through the login form with `PASSWORD`.
    pub async fn create_user_with_password(&self, username: &str) -> User {
        let hash = yanote::services::password::hash_password(PASSWORD).expect("hash password");
        db_users::create_user(self.pool(), username, None, &hash)
            .await
            .expect("create user")
    }

    /// Opens a session for `user` directly and returns a `Cookie` header value.
    pub async fn force_login(&self, user: &User) -> String {
        let token = start_session(&self.state, &user.id)
            .await
            .expect("start session");
        format!("session={}", token)
    }

    /// Inserts a note; without `slug` it is derived from the title.
    pub async fn create_note(&self, author: &User, title: &str, slug: Option<&str>) -> Note {
        let input = NoteInput {
            title: title.to_string(),
            text: "This is a test note".to_string(),
            slug: slug.map(str::to_string).unwrap_or_else(|| slugify_title(title)),
        };
        db::create_note(self.pool(), &author.id, &input)
            .await
            .expect("create note")
    }

    pub async fn note_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(self.pool())
            .await
            .expect("count notes")
    }

    pub async fn all_notes(&self) -> Vec<Note> {
        sqlx::query_as::<_, Note>(
            "SELECT id, title, text, slug, author_id, created_at, updated_at FROM notes ORDER BY rowid",
        )
        .fetch_all(self.pool())
        .await
        .expect("load notes")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Response {
        let body = fields
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, NON_ALPHANUMERIC),
                    utf8_percent_encode(v, NON_ALPHANUMERIC)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        self.send(request.body(Body::from(body)).expect("request"))
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        router(self.state.clone())
            .oneshot(request)
            .await
            .expect("response")
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header")
}
