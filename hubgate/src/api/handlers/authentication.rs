use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use hubgate_core::access::{LabelEnvelope, PresentedCredential};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::exec_id;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;
use crate::services::authentication::LoginVerdict;

#[derive(Debug, Deserialize)]
pub struct AuthenticationQuery {
    #[serde(rename = "uName")]
    pub user_name: String,
    pub token: String,
}

/// Registry login. Soft failures still answer `200` with a negative label so
/// the auth server can fall through to anonymous pulls.
#[instrument(skip_all, fields(exec_id = %exec_id(&headers), user = %query.user_name))]
pub async fn authentication_handler(
    State(state): State<SharedAppState>,
    headers: HeaderMap,
    Query(query): Query<AuthenticationQuery>,
) -> Result<Json<LabelEnvelope>, AppError> {
    let credential = PresentedCredential::new(query.user_name, &query.token);
    debug!("Login with token {}", credential.token_hint());

    match state.authenticator.authenticate_login(&credential).await? {
        LoginVerdict::Forward(result) => Ok(Json(result.envelope())),
        LoginVerdict::PingRejected => Err(AppError::PingRejected),
    }
}
