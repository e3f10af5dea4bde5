use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{de, Deserialize, Deserializer};

use super::secret::deserialize_optional_secret;

/// How presented registry credentials are validated. Deployment-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Tokens are JWTs verified locally against RSA public keys.
    Jwt,
    /// Tokens are opaque and checked against the identity provider.
    Introspection,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid credential mode '{0}': expected true/false or jwt/introspection")]
pub struct CredentialModeError(pub String);

impl CredentialMode {
    /// Accepts the legacy boolean flag (`true` selects JWT) as well as the
    /// mode names. Anything else is rejected, there is no fallback mode.
    pub fn parse(raw: &str) -> Result<Self, CredentialModeError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "jwt" => Ok(CredentialMode::Jwt),
            "false" | "introspection" => Ok(CredentialMode::Introspection),
            _ => Err(CredentialModeError(raw.to_string())),
        }
    }
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialMode::Jwt => f.write_str("jwt"),
            CredentialMode::Introspection => f.write_str("introspection"),
        }
    }
}

impl<'de> Deserialize<'de> for CredentialMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(CredentialMode::Jwt),
            Raw::Flag(false) => Ok(CredentialMode::Introspection),
            Raw::Name(name) => CredentialMode::parse(&name).map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwtSettings {
    /// Issuer name of tokens minted by the registry's own token service.
    pub internal_issuer: Option<String>,
    /// PEM encoded RSA public key for internally issued tokens.
    pub internal_key_path: Option<PathBuf>,
    /// PEM encoded RSA public key of the external identity provider.
    pub external_key_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionSettings {
    pub idp_endpoint: Option<String>,
    pub introspection_path: Option<String>,
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    pub password: Option<SecretString>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for IntrospectionSettings {
    fn default() -> Self {
        Self {
            idp_endpoint: None,
            introspection_path: None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

impl IntrospectionSettings {
    /// Endpoint base and path are joined verbatim.
    pub fn endpoint_url(&self) -> Option<String> {
        match (&self.idp_endpoint, &self.introspection_path) {
            (Some(base), Some(path)) if !base.is_empty() => Some(format!("{base}{path}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// Left optional so that a missing mode surfaces as an error when the
    /// credential validator is built, not when unrelated commands start.
    pub mode: Option<CredentialMode>,
    #[serde(default)]
    pub jwt: JwtSettings,
    #[serde(default)]
    pub introspection: IntrospectionSettings,
}
