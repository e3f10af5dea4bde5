pub mod authentication;
pub mod authorization;

pub use authentication::CredentialValidator;
pub use authorization::PolicyEngine;
