pub mod authentication;
pub mod authorization;
pub mod health;

use axum::http::HeaderMap;
use hubgate_core::http::EXEC_ID_HEADER;
use uuid::Uuid;

/// The caller's exec id, or a fresh one when absent or not valid text.
pub fn exec_id(headers: &HeaderMap) -> String {
    headers
        .get(EXEC_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
