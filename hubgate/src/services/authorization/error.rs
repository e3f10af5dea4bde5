use hubgate_core::access::RepositoryPathError;
use thiserror::Error;

use crate::directory::DirectoryError;

/// Reasons an authorization decision could not be made. A plain "no" is
/// `Ok(false)`, never one of these.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("unrecognized task requested: {0:?}")]
    UnrecognizedTask(Vec<String>),

    #[error(transparent)]
    InvalidRepositoryPath(#[from] RepositoryPathError),

    #[error("directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),
}

impl AuthorizationError {
    /// Whether the request itself was at fault, as opposed to the backend.
    pub fn is_malformed_request(&self) -> bool {
        matches!(
            self,
            AuthorizationError::UnrecognizedTask(_) | AuthorizationError::InvalidRepositoryPath(_)
        )
    }
}
