use serde::{Deserialize, Serialize};

/// 메모 행. 작성자 본인만 볼 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// UUIDv7
    pub id: String,
    pub title: String,
    pub text: String,
    /// 작성자별이 아니라 전체 메모에서 유일
    pub slug: String,
    /// 생성 시 한 번만 설정되고 수정되지 않음
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 폼 검증을 통과한 메모 필드. slug는 이미 결정된 상태입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub text: String,
    pub slug: String,
}
