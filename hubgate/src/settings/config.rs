use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use hubgate_core::settings::{
    api_server::{ApiServer, DEFAULT_BIND_ADDRESS},
    credentials::AuthSettings,
    database::{DatabaseSettings, DEFAULT_DATABASE_NAME},
    logging::LoggingSettings,
};
use serde::Deserialize;
use std::env;

/// Flat variable names the registry deployment has always used, mapped onto
/// the structured keys. They win over config files and `HUBGATE__` variables.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("IS_JWT", "auth.mode"),
    ("REGISTRY_AUTH_TOKEN_ISSUER", "auth.jwt.internal_issuer"),
    ("REGISTRY_AUTH_TOKEN_ROOTCERTBUNDLE", "auth.jwt.internal_key_path"),
    ("IDP_CERT", "auth.jwt.external_key_path"),
    ("IDP_END_POINT", "auth.introspection.idp_endpoint"),
    ("INTROSPECTION_END_POINT", "auth.introspection.introspection_path"),
    ("USERNAME", "auth.introspection.username"),
    ("PASSWORD", "auth.introspection.password"),
    ("MYSQL_USER", "database.user"),
    ("MYSQL_PASSWORD", "database.password"),
    ("MYSQL_HOST", "database.host"),
    ("MYSQL_PORT", "database.port"),
    ("MAX_OPEN_CONNECTIONS", "database.max_open_connections"),
    ("MAX_IDLE_CONNECTIONS", "database.max_idle_connections"),
    ("MAX_LIFE_TIME", "database.max_lifetime_minutes"),
];

#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiServer,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("HUBGATE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Builder preloaded with defaults. Sources are layered on top by the caller.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("database.name", DEFAULT_DATABASE_NAME)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("HUBGATE_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let builder = Self::apply_legacy_env(builder, |name| env::var(name).ok())?;

        builder.build()?.try_deserialize()
    }

    /// Override keys from the legacy variables. Unset or empty variables
    /// leave the lower layers untouched.
    pub fn apply_legacy_env<F>(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, key) in LEGACY_ENV_KEYS {
            let value = lookup(name).filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }
        Ok(builder)
    }
}
