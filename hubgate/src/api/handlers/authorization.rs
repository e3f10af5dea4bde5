use axum::{extract::State, http::HeaderMap, Json};
use hubgate_core::access::AuthorizationRequest;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::exec_id;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub allowed: bool,
    pub actions: Vec<String>,
}

#[instrument(
    skip_all,
    fields(exec_id = %exec_id(&headers), account = %request.account, repository = %request.name)
)]
pub async fn authorization_handler(
    State(state): State<SharedAppState>,
    headers: HeaderMap,
    Json(request): Json<AuthorizationRequest>,
) -> Result<Json<AuthorizationResponse>, AppError> {
    match state.policy.allowed_actions(&request).await? {
        Some(actions) => Ok(Json(AuthorizationResponse {
            allowed: true,
            actions,
        })),
        None => Err(AppError::AccessDenied),
    }
}
