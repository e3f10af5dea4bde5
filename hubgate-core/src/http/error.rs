//! HTTP error types that keep the upstream status code.
//!
//! Callers of the identity provider need to tell "the provider said no"
//! (a 4xx) apart from "the provider is broken or unreachable", so the status
//! survives as data instead of being folded into a message string.
//!
//! ```
//! use hubgate_core::http::HttpError;
//!
//! let err = HttpError::http(503, "Service Unavailable");
//! assert_eq!(err.status_code(), Some(503));
//! assert!(!err.is_timeout());
//! ```

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Upstream answered with an unexpected status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, DNS or TLS failure
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl HttpError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::http(status.as_u16(), message)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout) || matches!(self, Self::Network(e) if e.is_timeout())
    }
}
