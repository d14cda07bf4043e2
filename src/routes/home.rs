use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{db, error::AppError, middleware::auth::MaybeUser, state::AppState};

/// `GET /`: 누구나 볼 수 있는 첫 페이지
///
/// 로그인한 사용자에게는 이름과 메모 개수를, 아니면 `"user": null`을 돌려줍니다.
pub async fn home(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    match user {
        Some(user) => {
            let note_count = db::count_notes_for_author(&state.pool, &user.id).await?;
            Ok(Json(json!({ "user": user.username, "note_count": note_count })))
        }
        None => Ok(Json(json!({ "user": null }))),
    }
}
