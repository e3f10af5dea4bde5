use std::path::PathBuf;

use hubgate_core::http::HttpError;
use thiserror::Error;

/// Failures that prevent an authentication decision. A credential that is
/// simply not valid is a [`Rejection`], not an error.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("Authentication is misconfigured: {0}")]
    Configuration(String),

    #[error("Failed to read verification key {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Verification key {} is not a PEM encoded RSA public key: {source}", path.display())]
    InvalidKey {
        path: PathBuf,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("Identity provider request failed: {0}")]
    Upstream(#[from] HttpError),
}

impl AuthenticationError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::KeyFile { .. } | Self::InvalidKey { .. }
        )
    }
}

/// Why a credential was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("subject mismatch")]
    SubjectMismatch,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("token algorithm is not RSA")]
    UnsupportedAlgorithm,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("identity provider rejected the token")]
    NotAccepted,
    #[error("token is not active")]
    Inactive,
    #[error("username mismatch")]
    UsernameMismatch,
}

/// Result of checking a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    Rejected(Rejection),
}

impl TokenCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenCheck::Valid)
    }
}
