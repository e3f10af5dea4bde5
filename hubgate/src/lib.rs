//! hubgate library
//!
//! Credential validation and authorization decisions for a container
//! registry, shared by the API server and the credential-helper binary.

pub mod api;
pub mod app_state;
pub mod directory;
pub mod http;
pub mod init_telemetry;
pub mod services;
pub mod settings;
pub mod stop_flag;

pub use app_state::AppState;
