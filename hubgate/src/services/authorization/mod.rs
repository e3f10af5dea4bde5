//! Authorization for registry requests.
//!
//! The rules are fixed: public images can be pulled by anyone, organization
//! members can pull everything in their organization, `admin` and `push`
//! roles may push, and only `admin` may delete.

pub mod engine;
pub mod error;


pub use engine::PolicyEngine;
pub use error::AuthorizationError;
