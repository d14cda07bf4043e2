//! # 메모(Note) 라우트 핸들러
//!
//! 메모의 목록/추가/조회/수정/삭제를 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET  /notes/`          → 내 메모 목록
//! - `GET  /add/`            → 빈 메모 폼
//! - `POST /add/`            → 메모 생성 후 `/done/`으로 302
//! - `GET  /done/`           → 완료 페이지
//! - `GET  /note/{slug}/`    → 메모 하나 조회
//! - `GET  /edit/{slug}/`    → 메모 내용으로 채운 폼
//! - `POST /edit/{slug}/`    → 메모 수정 후 `/done/`으로 302
//! - `GET  /delete/{slug}/`  → 삭제 확인 페이지
//! - `POST /delete/{slug}/`  → 메모 삭제 후 `/done/`으로 302
//!
//! ## 접근 제어
//! 모든 핸들러는 첫 번째 Extractor로 `CurrentUser`를 받습니다.
//! 로그인하지 않은 요청은 핸들러 본문이 실행되기 전에 로그인 페이지로 보내집니다.
//!
//! 메모는 항상 `db::notes`의 작성자 제한 쿼리로 조회하므로,
//! 다른 사람의 메모는 없는 메모와 똑같이 404가 됩니다.
//!
//! ## Extractor
//! - `CurrentUser`: 로그인한 사용자 (`middleware::auth`)
//! - `State(state)`: 앱 전역 상태 (DB 풀 등)
//! - `Path(slug)`: URL 경로의 `{slug}`
//! - `Form(data)`: `application/x-www-form-urlencoded` 본문을 구조체로 디코딩

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    forms::{NoteForm, NoteFormData, NoteValidation},
    middleware::auth::CurrentUser,
    models::Note,
    routes::found,
    state::AppState,
    urls,
};

fn render_form(form: NoteForm, note: Option<&Note>) -> Response {
    match note {
        Some(note) => Json(json!({ "form": form, "note": note })).into_response(),
        None => Json(json!({ "form": form })).into_response(),
    }
}

/// 현재 사용자의 메모 `slug`를 가져옵니다. 없으면 404.
async fn owned_note(state: &AppState, slug: &str, author_id: &str) -> Result<Note, AppError> {
    db::get_note_for_author(&state.pool, slug, author_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Note {:?} not found for author {}", slug, author_id);
            AppError::NotFound
        })
}

/// `GET /notes/`: `{ "object_list": [...] }`. 본인 메모만 담깁니다.
pub async fn list_notes(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let notes = db::list_notes_for_author(&state.pool, &user.id).await?;
    Ok(Json(json!({ "object_list": notes })))
}

/// `GET /add/`
pub async fn add_note_form(_user: CurrentUser) -> Json<Value> {
    Json(json!({ "form": NoteForm::default() }))
}

/// `POST /add/`: 현재 사용자 소유의 메모를 만듭니다.
///
/// 검증에 실패하면 에러가 담긴 폼을 200으로 다시 보여줍니다.
pub async fn add_note(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
    Form(data): Form<NoteFormData>,
) -> Result<Response, AppError> {
    let input = match NoteForm::validate(data, &state.pool, None).await? {
        NoteValidation::Valid(input) => input,
        NoteValidation::Invalid(form) => return Ok(render_form(form, None)),
    };

    match db::create_note(&state.pool, &user.id, &input).await {
        Ok(note) => {
            tracing::info!("User {} created note {}", user.username, note.slug);
            Ok(found(urls::SUCCESS))
        }
        // 검증과 INSERT 사이에 다른 요청이 같은 slug를 가져간 경우
        Err(AppError::SlugTaken(_)) => Ok(render_form(NoteForm::slug_taken(input), None)),
        Err(e) => Err(e),
    }
}

/// `GET /done/`
pub async fn success(_user: CurrentUser) -> Json<Value> {
    Json(json!({ "message": "Your changes have been saved." }))
}

/// `GET /note/{slug}/`
pub async fn note_detail(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let note = owned_note(&state, &slug, &user.id).await?;
    Ok(Json(json!({ "note": note })))
}

/// `GET /edit/{slug}/`
pub async fn edit_note_form(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &slug, &user.id).await?;
    Ok(render_form(NoteForm::for_note(&note), Some(&note)))
}

/// `POST /edit/{slug}/`: 제목, 내용, slug를 바꿉니다.
///
/// 메모의 현재 slug를 그대로 두는 것은 충돌이 아닙니다.
pub async fn edit_note(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(data): Form<NoteFormData>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &slug, &user.id).await?;

    let input = match NoteForm::validate(data, &state.pool, Some(&note)).await? {
        NoteValidation::Valid(input) => input,
        NoteValidation::Invalid(form) => return Ok(render_form(form, Some(&note))),
    };

    match db::update_note_for_author(&state.pool, &note.id, &user.id, &input).await {
        Ok(Some(updated)) => {
            tracing::info!(
                "User {} updated note {} (now {})",
                user.username,
                note.slug,
                updated.slug
            );
            Ok(found(urls::SUCCESS))
        }
        // 동시에 들어온 다른 요청이 이미 삭제함
        Ok(None) => Err(AppError::NotFound),
        Err(AppError::SlugTaken(_)) => {
            Ok(render_form(NoteForm::slug_taken(input), Some(&note)))
        }
        Err(e) => Err(e),
    }
}

/// `GET /delete/{slug}/`: 삭제 확인 페이지
pub async fn delete_note_confirm(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let note = owned_note(&state, &slug, &user.id).await?;
    Ok(Json(json!({ "note": note })))
}

/// `POST /delete/{slug}/`: 즉시, 영구적으로 삭제합니다.
pub async fn delete_note(
    CurrentUser { user }: CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    if !db::delete_note_for_author(&state.pool, &slug, &user.id).await? {
        tracing::debug!("Note {:?} not found for author {}", slug, user.id);
        return Err(AppError::NotFound);
    }

    tracing::info!("User {} deleted note {}", user.username, slug);
    Ok(found(urls::SUCCESS))
}
