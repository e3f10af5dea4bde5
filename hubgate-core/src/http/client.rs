use reqwest::{header::HeaderMap, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::HttpError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around `reqwest::Client` with a bounded timeout on every
/// request. No retries: callers decide what to do with a failed call.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    default_timeout: Duration,
}

#[derive(Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    headers: Option<HeaderMap>,
    accept_invalid_certs: bool,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Skip TLS certificate verification. Only meant for identity providers
    /// running with self-signed certificates in development setups.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<HttpClient, HttpError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let mut client_builder = reqwest::Client::builder().timeout(timeout);

        if let Some(headers) = self.headers {
            client_builder = client_builder.default_headers(headers);
        }

        if self.accept_invalid_certs {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build()?;

        Ok(HttpClient {
            client,
            default_timeout: timeout,
        })
    }
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        Self::builder().with_timeout(timeout).build()
    }

    /// POST an url-encoded form using HTTP basic auth. The response is
    /// returned as-is so callers can interpret the status themselves.
    pub async fn post_form_with_basic_auth<F>(
        &self,
        url: &str,
        form: &F,
        username: &str,
        password: &str,
    ) -> Result<Response, HttpError>
    where
        F: Serialize + ?Sized,
    {
        debug!("POST form request to {}", url);
        let response = self
            .client
            .post(url)
            .timeout(self.default_timeout)
            .basic_auth(username, Some(password))
            .form(form)
            .send()
            .await?;
        Ok(response)
    }

    pub async fn get_with_query<Q>(&self, url: &str, query: &Q) -> Result<Response, HttpError>
    where
        Q: Serialize + ?Sized,
    {
        debug!("GET request to {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.default_timeout)
            .query(query)
            .send()
            .await?;
        Ok(response)
    }

    pub async fn post_json<T>(&self, url: &str, body: &T) -> Result<Response, HttpError>
    where
        T: Serialize + ?Sized,
    {
        debug!("POST request to {}", url);
        let response = self
            .client
            .post(url)
            .timeout(self.default_timeout)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// Read a response body and decode it as JSON. Shape mismatches are
    /// reported as `HttpError::ParseError`.
    pub async fn read_json<T>(response: Response) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| HttpError::ParseError(e.to_string()))
    }

    /// Best-effort error message from a non-success response body.
    pub async fn error_message(response: Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(body) => {
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
                    if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                        return format!("{}: {}", status, message);
                    }
                }
                if !body.is_empty() && body.len() < 500 {
                    return format!("{}: {}", status, body);
                }
                format!("HTTP error: {}", status)
            }
            Err(_) => format!("HTTP error: {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::{
        matchers::{body_string, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    #[derive(Debug, Deserialize)]
    struct Reply {
        ok: bool,
    }

    #[tokio::test]
    async fn test_post_form_sends_basic_auth() {
        let mock_server = MockServer::start().await;

        // "admin:secret" base64 encoded
        Mock::given(method("POST"))
            .and(path("/introspect"))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("token=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        let url = format!("{}/introspect", mock_server.uri());
        let response = client
            .post_form_with_basic_auth(&url, &[("token", "abc")], "admin", "secret")
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let reply: Reply = HttpClient::read_json(response).await.unwrap();
        assert!(reply.ok);
    }

    #[tokio::test]
    async fn test_get_with_query_encodes_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/authentication"))
            .and(query_param("uName", "alice"))
            .and(query_param("token", "a b"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = HttpClient::builder().build().unwrap();
        let url = format!("{}/authentication", mock_server.uri());
        let response = client
            .get_with_query(&url, &[("uName", "alice"), ("token", "a b")])
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_default_headers_sent_on_every_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/authorization"))
            .and(header(crate::http::EXEC_ID_HEADER, "run-42"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(
            crate::http::EXEC_ID_HEADER,
            reqwest::header::HeaderValue::from_static("run-42"),
        );
        let client = HttpClient::builder()
            .with_default_headers(headers)
            .build()
            .unwrap();
        let url = format!("{}/authorization", mock_server.uri());
        let response = client
            .post_json(&url, &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_read_json_reports_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::builder().build().unwrap();
        let url = format!("{}/broken", mock_server.uri());
        let response = client
            .post_json(&url, &serde_json::json!({}))
            .await
            .unwrap();

        let err = HttpClient::read_json::<Reply>(response).await.unwrap_err();
        assert!(matches!(err, HttpError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = HttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is closed in test environments.
        let err = client
            .post_json("http://127.0.0.1:9/nothing", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Network(_) | HttpError::Timeout));
    }
}
