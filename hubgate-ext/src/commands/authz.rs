use anyhow::Context;
use hubgate::app_state::build_policy_engine;
use hubgate_core::access::AuthorizationRequest;
use hubgate_core::exit_status::ExitStatus;
use hubgate_core::http::{HttpClient, HttpError};
use reqwest::StatusCode;
use tokio::io::AsyncRead;
use tracing::info;

use super::read_input;
use crate::context::{Backend, RemoteServer};

pub async fn run_authz<R>(backend: &Backend, input: R) -> anyhow::Result<ExitStatus>
where
    R: AsyncRead + Unpin,
{
    let raw = read_input(input).await?;
    let request: AuthorizationRequest =
        serde_json::from_str(raw.trim()).context("Invalid authorization request")?;
    info!(
        "Authorizing {} for {:?} on {}",
        request.account, request.actions, request.name
    );

    let allowed = match backend {
        Backend::InProcess(settings) => {
            let engine = build_policy_engine(&settings.database).await?;
            engine.authorize(&request).await?
        }
        Backend::Remote(server) => remote_authorize(server, &request).await?,
    };

    Ok(ExitStatus::from(allowed))
}

async fn remote_authorize(
    server: &RemoteServer,
    request: &AuthorizationRequest,
) -> Result<bool, HttpError> {
    let response = server
        .client()
        .post_json(&server.url("authorization"), request)
        .await?;

    match response.status() {
        StatusCode::OK => Ok(true),
        StatusCode::UNAUTHORIZED => Ok(false),
        status => Err(HttpError::from_status(
            status,
            HttpClient::error_message(response).await,
        )),
    }
}
