use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Deserialize an optional plain string into a `SecretString`. Empty strings
/// count as unset so that `PASSWORD=` in the environment does not produce a
/// blank credential.
pub fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.is_empty())
        .map(|v| SecretString::new(v.into_boxed_str())))
}
