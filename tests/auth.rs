//! Signup, login and logout.

mod common;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
};
use common::{body_json, location, TestApp, PASSWORD};
use yanote::{forms::NON_FIELD_ERRORS, urls};

fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("Set-Cookie header")
        .to_string()
}

#[tokio::test]
async fn signup_then_login_opens_the_notes() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            urls::SIGNUP,
            None,
            &[
                ("username", "newuser"),
                ("email", "new@example.com"),
                ("password", PASSWORD),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), urls::LOGIN);

    let response = app
        .post_form(
            urls::LOGIN,
            None,
            &[("username", "newuser"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), urls::LIST);

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("session="));

    let list = app.get(urls::LIST, Some(&cookie)).await;
    assert_eq!(list.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let app = TestApp::new().await;
    app.create_user("author").await;

    let response = app
        .post_form(
            urls::SIGNUP,
            None,
            &[("username", "author"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let context = body_json(response).await;
    assert!(context["form"]["errors"]["username"][0].is_string());
    assert_eq!(context["form"]["username"], "author");
}

#[tokio::test]
async fn signup_form_renders() {
    let app = TestApp::new().await;

    let response = app.get(urls::SIGNUP, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.get("form").is_some());
}

#[tokio::test]
async fn wrong_password_rerenders_login() {
    let app = TestApp::new().await;
    app.create_user_with_password("author").await;

    let response = app
        .post_form(
            urls::LOGIN,
            None,
            &[("username", "author"), ("password", "wrong-password")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_none());

    let context = body_json(response).await;
    assert!(context["form"]["errors"][NON_FIELD_ERRORS][0].is_string());
}

#[tokio::test]
async fn unknown_user_cannot_login() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            urls::LOGIN,
            None,
            &[("username", "ghost"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_returns_to_next() {
    let app = TestApp::new().await;
    app.create_user_with_password("author").await;

    let target = urls::login_with_next(urls::ADD);
    let response = app
        .post_form(
            &target,
            None,
            &[("username", "author"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), urls::ADD);

    let response = app
        .post_form(
            urls::LOGIN,
            None,
            &[
                ("username", "author"),
                ("password", PASSWORD),
                ("next", "https://evil.example/"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), urls::LIST);
}

#[tokio::test]
async fn next_with_control_characters_falls_back_to_list() {
    let app = TestApp::new().await;
    app.create_user_with_password("author").await;

    let response = app
        .post_form(
            urls::LOGIN,
            None,
            &[
                ("username", "author"),
                ("password", PASSWORD),
                ("next", "/notes/\r\nX: y"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), urls::LIST);
    assert!(response.headers().get("x").is_none());

    let cookie = session_cookie(&response);
    assert_eq!(app.get(urls::LIST, Some(&cookie)).await.status(), StatusCode::OK);

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_sessions")
        .fetch_one(app.pool())
        .await
        .expect("count sessions");
    assert_eq!(sessions, 1);
}

#[tokio::test]
async fn quoted_session_cookie_authenticates() {
    let app = TestApp::new().await;
    let user = app.create_user("author").await;
    let cookie = app.force_login(&user).await;
    let token = cookie.trim_start_matches("session=");

    let quoted = format!("theme=dark; session=\"{}\"", token);
    let response = app.get(urls::LIST, Some(&quoted)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_cookie_expires_the_session_cookie() {
    let app = TestApp::new().await;
    let user = app.create_user("author").await;
    let session = app.force_login(&user).await;

    let response = app.post_form(urls::LOGOUT, Some(&session), &[]).await;
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("Set-Cookie header");
    let parsed = cookie::Cookie::parse(set_cookie).expect("valid Set-Cookie");
    assert_eq!(parsed.name(), "session");
    assert_eq!(parsed.value(), "");
    assert_eq!(parsed.path(), Some("/"));
    assert_eq!(parsed.max_age(), Some(cookie::time::Duration::ZERO));
}

#[tokio::test]
async fn logout_revokes_session() {
    let app = TestApp::new().await;
    let user = app.create_user("author").await;
    let cookie = app.force_login(&user).await;

    assert_eq!(app.get(urls::LIST, Some(&cookie)).await.status(), StatusCode::OK);

    let response = app.post_form(urls::LOGOUT, Some(&cookie), &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).starts_with("session="));

    let after = app.get(urls::LIST, Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::FOUND);
    assert_eq!(location(&after), urls::login_with_next(urls::LIST));
}

#[tokio::test]
async fn logout_without_session_is_fine() {
    let app = TestApp::new().await;

    let response = app.get(urls::LOGOUT, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_token_authenticates() {
    let app = TestApp::new().await;
    let user = app.create_user("author").await;
    let cookie = app.force_login(&user).await;
    let token = cookie.trim_start_matches("session=");

    let request = Request::builder()
        .uri(urls::LIST)
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request");

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn sessions_of_deleted_users_are_gone() {
    let app = TestApp::new().await;
    let user = app.create_user("author").await;
    let cookie = app.force_login(&user).await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(app.pool())
        .await
        .expect("delete user");

    let response = app.get(urls::LIST, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
}
