//! # 헬스체크(Health Check) 핸들러
//!
//! 서버가 정상적으로 동작하는지 확인하는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "ok" }`

use axum::Json;                // JSON 응답 래퍼
use serde_json::{json, Value}; // JSON 생성 유틸리티

/// `GET /health`: 서버 상태를 확인합니다.
///
/// State도 로그인도 필요 없는 가장 단순한 핸들러입니다.
/// `Result`를 반환하지 않으므로 실패하지 않고 항상 200을 돌려줍니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
