use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::secret::deserialize_optional_secret;

pub const DEFAULT_DATABASE_NAME: &str = "CELLERY_HUB";

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
#[readonly::make]
pub struct DatabaseSettings {
    /// Full connection URL. Takes precedence over the individual parts.
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub url: Option<SecretString>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub password: Option<SecretString>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_max_open_connections")]
    pub max_open_connections: u32,
    #[serde(default)]
    pub max_idle_connections: u32,
    /// Maximum connection lifetime in minutes, 0 disables recycling.
    #[serde(default)]
    pub max_lifetime_minutes: u64,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

fn default_max_open_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            user: String::new(),
            password: None,
            name: default_name(),
            max_open_connections: default_max_open_connections(),
            max_idle_connections: 0,
            max_lifetime_minutes: 0,
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseSettings {
    /// Connection URL for the directory database. Built from the individual
    /// parts as a MySQL URL unless `url` is set.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.expose_secret().to_string();
        }

        let password = self
            .password
            .as_ref()
            .map(|p| format!(":{}", urlencoding::encode(p.expose_secret())))
            .unwrap_or_default();

        format!(
            "mysql://{}{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            password,
            self.host,
            self.port,
            self.name
        )
    }

    /// Connection URL with the password replaced, for logging.
    pub fn redacted_url(&self) -> String {
        if self.url.is_some() {
            return "<configured url>".to_string();
        }
        format!(
            "mysql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_from_parts() {
        let settings: DatabaseSettings = serde_json::from_str(
            r#"{"host": "db", "port": 3307, "user": "hub", "password": "p@ss:word"}"#,
        )
        .unwrap();
        assert_eq!(
            settings.connection_url(),
            "mysql://hub:p%40ss%3Aword@db:3307/CELLERY_HUB"
        );
        assert!(!settings.redacted_url().contains("p@ss"));
    }

    #[test]
    fn test_url_overrides_parts() {
        let settings: DatabaseSettings =
            serde_json::from_str(r#"{"url": "sqlite::memory:", "host": "db"}"#).unwrap();
        assert_eq!(settings.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn test_defaults() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.port, 3306);
        assert_eq!(settings.name, DEFAULT_DATABASE_NAME);
        assert_eq!(settings.max_open_connections, 10);
    }
}
