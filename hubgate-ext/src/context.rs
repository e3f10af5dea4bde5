use anyhow::Context;
use hubgate::settings::config::Settings;
use hubgate_core::http::{HttpClient, EXEC_ID_HEADER};
use reqwest::header::{HeaderMap, HeaderValue};
use uuid::Uuid;

/// A hubgate server reached over HTTP. Every request of one run carries the
/// same exec id header.
#[derive(Debug, Clone)]
pub struct RemoteServer {
    base_url: String,
    exec_id: String,
    client: HttpClient,
}

impl RemoteServer {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_exec_id(base_url, &Uuid::new_v4().to_string())
    }

    pub fn with_exec_id(base_url: &str, exec_id: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            EXEC_ID_HEADER,
            HeaderValue::from_str(exec_id).context("Invalid exec id")?,
        );

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            exec_id: exec_id.to_string(),
            client: HttpClient::builder().with_default_headers(headers).build()?,
        })
    }

    pub fn exec_id(&self) -> &str {
        &self.exec_id
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

/// Where decisions are made.
#[derive(Debug)]
pub enum Backend {
    /// Build the validator or policy engine from local settings.
    InProcess(Box<Settings>),
    /// Ask a running hubgate server.
    Remote(RemoteServer),
}

impl Backend {
    /// Settings are only loaded when deciding in-process.
    pub fn from_server(server: Option<&str>) -> anyhow::Result<Self> {
        match server {
            Some(url) if !url.is_empty() => Ok(Backend::Remote(RemoteServer::new(url)?)),
            _ => Ok(Backend::InProcess(Box::new(Settings::new()?))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_paths() {
        let server = RemoteServer::new("http://hubgate:8080/").unwrap();
        assert_eq!(server.url("/authorization"), "http://hubgate:8080/authorization");
        assert_eq!(server.url("authentication"), "http://hubgate:8080/authentication");
    }

    #[test]
    fn test_each_server_gets_its_own_exec_id() {
        let first = RemoteServer::new("http://hubgate:8080").unwrap();
        let second = RemoteServer::new("http://hubgate:8080").unwrap();
        assert!(Uuid::parse_str(first.exec_id()).is_ok());
        assert_ne!(first.exec_id(), second.exec_id());
    }

    #[test]
    fn test_exec_id_must_be_a_valid_header_value() {
        assert!(RemoteServer::with_exec_id("http://hubgate:8080", "bad\nid").is_err());
    }

    #[test]
    fn test_server_selects_remote_backend() {
        let backend = Backend::from_server(Some("http://hubgate:8080")).unwrap();
        assert!(matches!(backend, Backend::Remote(_)));
    }
}
