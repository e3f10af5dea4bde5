use serde::Deserialize;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: default_bind_address(),
        }
    }
}
