mod client;
mod error;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::HttpError;

/// Correlates one credential-helper run with the server's request span.
pub const EXEC_ID_HEADER: &str = "x-cellery-hub-exec-id";
