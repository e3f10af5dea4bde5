//! Request-level access types shared by the server and the credential-helper.
//!
//! Everything in here is pure data handling: parsing what the registry auth
//! server hands us and classifying it. Decisions are made in the `hubgate`
//! crate.

mod credential;
mod intent;
mod label;
mod repository;
mod request;

pub use credential::{CredentialParseError, PresentedCredential, PING_MARKER};
pub use intent::{Intent, ACTION_DELETE, ACTION_PULL, ACTION_PUSH};
pub use label::{AuthLabel, AuthenticationResult, LabelEnvelope, Labels, AUTH_SUCCESS_LABEL};
pub use repository::{RepositoryPath, RepositoryPathError};
pub use request::AuthorizationRequest;
