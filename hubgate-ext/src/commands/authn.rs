use std::io::Write;

use anyhow::Context;
use hubgate::app_state::build_authenticator;
use hubgate::services::authentication::LoginVerdict;
use hubgate_core::access::{LabelEnvelope, PresentedCredential};
use hubgate_core::exit_status::ExitStatus;
use hubgate_core::http::{HttpClient, HttpError};
use reqwest::StatusCode;
use tokio::io::AsyncRead;
use tracing::{info, warn};

use super::read_input;
use crate::context::{Backend, RemoteServer};

enum LoginOutcome {
    Forward(LabelEnvelope),
    PingRejected,
}

/// Registry login helper. Forwarded outcomes print the label blob and exit
/// successfully, a rejected ping exits with `Denied`.
pub async fn run_authn<R, W>(backend: &Backend, input: R, output: &mut W) -> anyhow::Result<ExitStatus>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let line = read_input(input).await?;
    let credential = PresentedCredential::from_helper_line(&line)
        .context("Invalid credential helper input")?;
    info!("Authenticating {:?}", credential);

    let outcome = match backend {
        Backend::InProcess(settings) => {
            let validator = build_authenticator(&settings.auth)?;
            match validator.authenticate_login(&credential).await? {
                LoginVerdict::Forward(result) => LoginOutcome::Forward(result.envelope()),
                LoginVerdict::PingRejected => LoginOutcome::PingRejected,
            }
        }
        Backend::Remote(server) => remote_login(server, &credential).await?,
    };

    match outcome {
        LoginOutcome::Forward(envelope) => {
            writeln!(output, "{}", envelope.to_json()?)?;
            Ok(ExitStatus::Allowed)
        }
        LoginOutcome::PingRejected => {
            warn!("Ping login rejected for {}", credential.username);
            Ok(ExitStatus::Denied)
        }
    }
}

async fn remote_login(
    server: &RemoteServer,
    credential: &PresentedCredential,
) -> Result<LoginOutcome, HttpError> {
    let token = credential.wire_token();
    let query = [
        ("uName", credential.username.as_str()),
        ("token", token.as_str()),
    ];
    let response = server
        .client()
        .get_with_query(&server.url("authentication"), &query)
        .await?;

    match response.status() {
        StatusCode::OK => Ok(LoginOutcome::Forward(HttpClient::read_json(response).await?)),
        StatusCode::UNAUTHORIZED => Ok(LoginOutcome::PingRejected),
        status => Err(HttpError::from_status(
            status,
            HttpClient::error_message(response).await,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubgate::settings::config::Settings;
    use hubgate_core::settings::credentials::{AuthSettings, CredentialMode, JwtSettings};
    use serde_json::json;
    use std::path::Path;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn in_process() -> Backend {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../hubgate/tests/fixtures");
        let settings = Settings {
            auth: AuthSettings {
                mode: Some(CredentialMode::Jwt),
                jwt: JwtSettings {
                    internal_issuer: Some("hub-token-service".into()),
                    internal_key_path: Some(fixtures.join("internal_public.pem")),
                    external_key_path: Some(fixtures.join("external_public.pem")),
                },
                ..Default::default()
            },
            ..Default::default()
        };
        Backend::InProcess(Box::new(settings))
    }

    #[tokio::test]
    async fn test_failed_login_prints_negative_label() {
        let mut output = Vec::new();
        let status = run_authn(&in_process(), &b"alice not-a-jwt\n"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(status, ExitStatus::Allowed);
        assert_eq!(
            String::from_utf8(output).unwrap().trim(),
            r#"{"labels":{"isAuthSuccess":["false"]}}"#
        );
    }

    #[tokio::test]
    async fn test_failed_ping_exits_denied() {
        let mut output = Vec::new();
        let status = run_authn(&in_process(), &b"alice not-a-jwt:ping"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(status, ExitStatus::Denied);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_input_is_an_error() {
        let mut output = Vec::new();
        let result = run_authn(&in_process(), &b"alice"[..], &mut output).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_mode_is_an_error() {
        let backend = Backend::InProcess(Box::default());
        let mut output = Vec::new();
        let result = run_authn(&backend, &b"alice token"[..], &mut output).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_remote_login_forwards_label() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/authentication"))
            .and(query_param("uName", "alice"))
            .and(query_param("token", "opaque:ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"labels": {"isAuthSuccess": ["true"]}})),
            )
            .mount(&mock_server)
            .await;

        let backend = Backend::Remote(RemoteServer::new(&mock_server.uri()).unwrap());
        let mut output = Vec::new();
        let status = run_authn(&backend, &b"alice opaque:ping"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(status, ExitStatus::Allowed);
        assert_eq!(
            String::from_utf8(output).unwrap().trim(),
            r#"{"labels":{"isAuthSuccess":["true"]}}"#
        );
    }

    #[tokio::test]
    async fn test_remote_unauthorized_is_denied() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/authentication"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let backend = Backend::Remote(RemoteServer::new(&mock_server.uri()).unwrap());
        let mut output = Vec::new();
        let status = run_authn(&backend, &b"alice opaque:ping"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(status, ExitStatus::Denied);
    }

    #[tokio::test]
    async fn test_remote_server_error_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": true, "message": "idp down"})),
            )
            .mount(&mock_server)
            .await;

        let backend = Backend::Remote(RemoteServer::new(&mock_server.uri()).unwrap());
        let mut output = Vec::new();
        let err = run_authn(&backend, &b"alice opaque"[..], &mut output)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("idp down"));
    }
}
