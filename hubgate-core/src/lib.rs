pub mod access;
pub mod exit_status;
pub mod http;
pub mod settings;
