pub mod api_server;
pub mod credentials;
pub mod database;
pub mod logging;
mod secret;

pub use secret::deserialize_optional_secret;
