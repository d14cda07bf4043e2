//! # 메모(Note) 데이터베이스 쿼리
//!
//! `notes` 테이블의 CRUD 작업을 담당합니다.
//!
//! 요청에 따라 메모 하나를 읽거나 바꾸는 쿼리는 모두 작성자 id를 받아
//! `author_id`로 필터링합니다. 그래서 다른 사람의 메모는 존재하지 않는 메모와
//! 구별되지 않고, 라우트 핸들러는 둘 다 404로 응답합니다.
//!
//! 작성자 제한이 없는 쿼리는 `get_note`와 `slug_exists`뿐입니다.
//! slug는 모든 작성자를 통틀어 유일해야 하기 때문입니다.
//!
//! ## sqlx 사용 패턴
//! - `query_as::<_, Note>`: 결과 행을 `Note` 구조체로 매핑 (`FromRow` derive 필요)
//! - `.bind(value)`: SQL의 `?` 자리에 값을 순서대로 채움 (SQL 인젝션 방지)
//! - `fetch_all` / `fetch_optional` / `fetch_one`: 여러 행 / 0~1행 / 정확히 1행

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// `author_id`가 작성한 모든 메모를 추가된 순서대로 조회합니다.
///
/// `rowid`는 SQLite가 행마다 자동으로 붙이는 정수 키로, 삽입 순서를 따릅니다.
pub async fn list_notes_for_author(
    pool: &SqlitePool,
    author_id: &str,
) -> Result<Vec<Note>, AppError> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, text, slug, author_id, created_at, updated_at
        FROM notes
        WHERE author_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

pub async fn count_notes_for_author(pool: &SqlitePool, author_id: &str) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// id로 메모를 조회합니다. 작성자와 무관합니다.
pub async fn get_note(pool: &SqlitePool, id: &str) -> Result<Option<Note>, AppError> {
    let note = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, text, slug, author_id, created_at, updated_at
        FROM notes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(note)
}

/// slug로 메모를 조회하되, `author_id`의 메모 중에서만 찾습니다.
///
/// # 반환값
/// - `Ok(Some(Note))`: 메모가 있고 `author_id`가 작성자
/// - `Ok(None)`: 그런 slug가 없거나, 다른 사람의 메모
pub async fn get_note_for_author(
    pool: &SqlitePool,
    slug: &str,
    author_id: &str,
) -> Result<Option<Note>, AppError> {
    let note = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, text, slug, author_id, created_at, updated_at
        FROM notes
        WHERE slug = ? AND author_id = ?
        "#,
    )
    .bind(slug)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(note)
}

/// 작성자와 관계없이 `slug`를 이미 쓰는 메모가 있는지 확인합니다.
///
/// `exclude_id`로 지정한 메모는 검사에서 빠집니다.
/// 수정 중인 메모가 자기 자신의 slug와 충돌하지 않게 하기 위함입니다.
pub async fn slug_exists(
    pool: &SqlitePool,
    slug: &str,
    exclude_id: Option<&str>,
) -> Result<bool, AppError> {
    let exists: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM notes
            WHERE slug = ? AND (? IS NULL OR id <> ?)
        )
        "#,
    )
    .bind(slug)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(exists != 0)
}

/// `author_id` 소유의 새 메모를 추가합니다.
///
/// slug가 기존 메모와 겹치면 `AppError::SlugTaken`을 반환합니다.
/// 검증 이후 INSERT 시점에야 충돌이 드러나는 경우도 UNIQUE 인덱스가 잡아냅니다.
pub async fn create_note(
    pool: &SqlitePool,
    author_id: &str,
    input: &NoteInput,
) -> Result<Note, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO notes (id, title, text, slug, author_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&input.title)
    .bind(&input.text)
    .bind(&input.slug)
    .bind(author_id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_unique_violation(e, || AppError::SlugTaken(input.slug.clone())))?;

    get_note(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created note".to_string()))
}

/// `author_id`가 작성한 메모 `id`의 제목, 내용, slug를 덮어씁니다.
///
/// `author_id`는 WHERE 조건에만 쓰이고, 컬럼 값 자체는 바뀌지 않습니다.
///
/// # 반환값
/// - `Ok(Some(Note))`: 수정된 메모
/// - `Ok(None)`: 이 작성자의 해당 메모가 없음
pub async fn update_note_for_author(
    pool: &SqlitePool,
    id: &str,
    author_id: &str,
    input: &NoteInput,
) -> Result<Option<Note>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE notes
        SET title = ?, text = ?, slug = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND author_id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.text)
    .bind(&input.slug)
    .bind(id)
    .bind(author_id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_unique_violation(e, || AppError::SlugTaken(input.slug.clone())))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_note(pool, id).await
}

/// `author_id`가 작성한 메모 `slug`를 삭제합니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제됨
/// - `Ok(false)`: 일치하는 메모 없음. 저장소는 그대로입니다.
pub async fn delete_note_for_author(
    pool: &SqlitePool,
    slug: &str,
    author_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM notes WHERE slug = ? AND author_id = ?")
        .bind(slug)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
