//! Credential validation for registry logins.
//!
//! Two deployment-wide modes exist: JWTs verified locally against RSA
//! public keys, and opaque tokens checked through the identity provider's
//! introspection endpoint.

pub mod error;
pub mod introspection;
pub mod jwt;
pub mod keys;
pub mod service;

pub use error::{AuthenticationError, Rejection, TokenCheck};
pub use service::{CredentialValidator, LoginVerdict};
