use std::fmt;
use std::path::{Path, PathBuf};

use hubgate_core::settings::credentials::JwtSettings;
use jsonwebtoken::DecodingKey;
use tracing::info;

use super::error::AuthenticationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Internal,
    External,
}

/// RSA public keys used to verify registry JWTs, selected by issuer.
#[derive(Clone)]
pub struct VerificationKeys {
    internal_issuer: String,
    internal: DecodingKey,
    external: DecodingKey,
}

impl fmt::Debug for VerificationKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationKeys")
            .field("internal_issuer", &self.internal_issuer)
            .finish_non_exhaustive()
    }
}

impl VerificationKeys {
    /// Load both keys from the configured paths. Every missing setting or
    /// unreadable file is an error.
    pub fn load(settings: &JwtSettings) -> Result<Self, AuthenticationError> {
        let internal_issuer = settings
            .internal_issuer
            .clone()
            .filter(|issuer| !issuer.is_empty())
            .ok_or_else(|| AuthenticationError::configuration("auth.jwt.internal_issuer is not set"))?;

        let internal_path = required_path(&settings.internal_key_path, "auth.jwt.internal_key_path")?;
        let external_path = required_path(&settings.external_key_path, "auth.jwt.external_key_path")?;

        let keys = Self {
            internal_issuer,
            internal: read_key(internal_path)?,
            external: read_key(external_path)?,
        };

        info!(
            "Loaded JWT verification keys (internal issuer '{}')",
            keys.internal_issuer
        );
        Ok(keys)
    }

    pub fn from_pem(
        internal_issuer: impl Into<String>,
        internal_pem: &[u8],
        external_pem: &[u8],
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        Ok(Self {
            internal_issuer: internal_issuer.into(),
            internal: DecodingKey::from_rsa_pem(internal_pem)?,
            external: DecodingKey::from_rsa_pem(external_pem)?,
        })
    }

    pub fn select(&self, issuer: Option<&str>) -> (&DecodingKey, KeySource) {
        if issuer == Some(self.internal_issuer.as_str()) {
            (&self.internal, KeySource::Internal)
        } else {
            (&self.external, KeySource::External)
        }
    }
}

fn required_path<'a>(
    path: &'a Option<PathBuf>,
    setting: &str,
) -> Result<&'a Path, AuthenticationError> {
    path.as_deref()
        .ok_or_else(|| AuthenticationError::configuration(format!("{setting} is not set")))
}

fn read_key(path: &Path) -> Result<DecodingKey, AuthenticationError> {
    let pem = std::fs::read(path).map_err(|source| AuthenticationError::KeyFile {
        path: path.to_path_buf(),
        source,
    })?;
    DecodingKey::from_rsa_pem(&pem).map_err(|source| AuthenticationError::InvalidKey {
        path: path.to_path_buf(),
        source,
    })
}
