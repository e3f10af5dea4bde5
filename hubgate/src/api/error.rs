use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::services::authentication::AuthenticationError;
use crate::services::authorization::AuthorizationError;

#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("Ping login failed")]
    PingRejected,

    #[error("Access denied")]
    AccessDenied,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn get_error_msg(&self) -> (StatusCode, String) {
        let status = match self {
            AppError::PingRejected => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied => StatusCode::UNAUTHORIZED,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DirectoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string())
    }
}

impl From<AuthenticationError> for AppError {
    fn from(e: AuthenticationError) -> Self {
        error!("Authentication could not be completed: {}", e);
        AppError::InternalServerError(e.to_string())
    }
}

impl From<AuthorizationError> for AppError {
    fn from(e: AuthorizationError) -> Self {
        if e.is_malformed_request() {
            return AppError::InvalidRequest(e.to_string());
        }
        error!("Authorization could not be completed: {}", e);
        match &e {
            AuthorizationError::Directory(_) => AppError::DirectoryUnavailable(e.to_string()),
            _ => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.get_error_msg();
        let body = serde_json::json!({ "error": true, "message": body });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryError;
    use hubgate_core::access::RepositoryPath;

    #[test]
    fn test_authorization_errors_map_to_statuses() {
        let malformed: AppError =
            AuthorizationError::UnrecognizedTask(vec!["push".into()]).into();
        assert_eq!(malformed.get_error_msg().0, StatusCode::BAD_REQUEST);

        let bad_path: AppError = AuthorizationError::from(
            RepositoryPath::parse("no-slash").unwrap_err(),
        )
        .into();
        assert_eq!(bad_path.get_error_msg().0, StatusCode::BAD_REQUEST);

        let directory: AppError = AuthorizationError::Directory(DirectoryError::Query(
            sqlx::Error::PoolTimedOut,
        ))
        .into();
        assert_eq!(directory.get_error_msg().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_authentication_error_is_internal() {
        let err: AppError = AuthenticationError::configuration("no key").into();
        let (status, message) = err.get_error_msg();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("no key"));
    }
}
