use std::time::Duration;

use hubgate_core::http::{HttpClient, HttpError};
use hubgate_core::settings::credentials::IntrospectionSettings;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::error::{AuthenticationError, Rejection, TokenCheck};

/// Token introspection reply. `username` and `exp` are absent for inactive
/// tokens.
#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    exp: Option<f64>,
}

/// Validates opaque access tokens against the identity provider.
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    client: HttpClient,
    endpoint: String,
    username: String,
    password: SecretString,
}

impl IntrospectionClient {
    pub fn from_settings(settings: &IntrospectionSettings) -> Result<Self, AuthenticationError> {
        let endpoint = settings.endpoint_url().ok_or_else(|| {
            AuthenticationError::configuration(
                "auth.introspection.idp_endpoint and auth.introspection.introspection_path must be set",
            )
        })?;
        let username = settings
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AuthenticationError::configuration("auth.introspection.username is not set"))?;
        let password = settings
            .password
            .clone()
            .ok_or_else(|| AuthenticationError::configuration("auth.introspection.password is not set"))?;

        let client = HttpClient::builder()
            .with_timeout(Duration::from_secs(settings.timeout_secs))
            .accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            username,
            password,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the identity provider whether `token` is an active token owned by
    /// `username`.
    pub async fn verify(&self, username: &str, token: &str) -> Result<TokenCheck, AuthenticationError> {
        let response = self
            .client
            .post_form_with_basic_auth(
                &self.endpoint,
                &[("token", token)],
                &self.username,
                self.password.expose_secret(),
            )
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::BAD_REQUEST => {
                debug!("Identity provider answered 400 for token of {}", username);
                return Ok(TokenCheck::Rejected(Rejection::NotAccepted));
            }
            status => {
                let message = HttpClient::error_message(response).await;
                return Err(HttpError::from_status(status, message).into());
            }
        }

        let reply: IntrospectionResponse = HttpClient::read_json(response).await?;
        Ok(evaluate(&reply, username, chrono::Utc::now().timestamp() as f64))
    }
}

fn evaluate(reply: &IntrospectionResponse, username: &str, now: f64) -> TokenCheck {
    if !reply.active {
        return TokenCheck::Rejected(Rejection::Inactive);
    }

    match reply.exp {
        Some(exp) if exp > now => {}
        _ => return TokenCheck::Rejected(Rejection::Expired),
    }

    let local_part = reply
        .username
        .as_deref()
        .and_then(|name| name.split('@').next());

    if local_part != Some(username) {
        return TokenCheck::Rejected(Rejection::UsernameMismatch);
    }

    TokenCheck::Valid
}
