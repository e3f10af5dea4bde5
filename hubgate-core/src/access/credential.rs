use std::fmt;

/// Suffix appended to a token by liveness probes.
pub const PING_MARKER: &str = "ping";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialParseError {
    #[error("expected '<username> <token>', got {0} field(s)")]
    FieldCount(usize),
}

/// A username/token pair as presented by a registry client.
#[derive(Clone, PartialEq, Eq)]
pub struct PresentedCredential {
    pub username: String,
    pub token: String,
    /// Set when the caller only probes whether the credential is valid.
    pub ping: bool,
}

impl PresentedCredential {
    /// Build a credential from a raw token that may carry a `:ping` suffix.
    pub fn new(username: impl Into<String>, raw_token: &str) -> Self {
        let (token, ping) = split_ping(raw_token);
        Self {
            username: username.into(),
            token: token.to_string(),
            ping,
        }
    }

    /// Parse the credential-helper input line `"<username> <token>[:ping]"`.
    pub fn from_helper_line(line: &str) -> Result<Self, CredentialParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [username, raw_token] = fields.as_slice() else {
            return Err(CredentialParseError::FieldCount(fields.len()));
        };
        Ok(Self::new(*username, raw_token))
    }

    /// The token as it travels to the login endpoint, ping marker included.
    pub fn wire_token(&self) -> String {
        if self.ping {
            format!("{}:{}", self.token, PING_MARKER)
        } else {
            self.token.clone()
        }
    }

    /// A short, log-safe prefix of the token.
    pub fn token_hint(&self) -> String {
        let prefix: String = self.token.chars().take(6).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for PresentedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentedCredential")
            .field("username", &self.username)
            .field("token", &self.token_hint())
            .field("ping", &self.ping)
            .finish()
    }
}

fn split_ping(raw_token: &str) -> (&str, bool) {
    match raw_token.split_once(':') {
        Some((token, marker)) => (token, marker == PING_MARKER),
        None => (raw_token, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_line() {
        let credential = PresentedCredential::from_helper_line("alice abc.def.ghi\n").unwrap();
        assert_eq!(credential.username, "alice");
        assert_eq!(credential.token, "abc.def.ghi");
        assert!(!credential.ping);
    }

    #[test]
    fn test_parse_ping_suffix() {
        let credential = PresentedCredential::from_helper_line("alice opaque-token:ping").unwrap();
        assert_eq!(credential.token, "opaque-token");
        assert!(credential.ping);
    }

    #[test]
    fn test_wire_token_keeps_ping_marker() {
        let ping = PresentedCredential::new("alice", "opaque-token:ping");
        assert_eq!(ping.wire_token(), "opaque-token:ping");

        let plain = PresentedCredential::new("alice", "opaque-token");
        assert_eq!(plain.wire_token(), "opaque-token");
    }

    #[test]
    fn test_other_suffix_is_stripped_without_ping() {
        let credential = PresentedCredential::new("alice", "opaque-token:other");
        assert_eq!(credential.token, "opaque-token");
        assert!(!credential.ping);
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert_eq!(
            PresentedCredential::from_helper_line("alice"),
            Err(CredentialParseError::FieldCount(1))
        );
        assert_eq!(
            PresentedCredential::from_helper_line("alice token extra"),
            Err(CredentialParseError::FieldCount(3))
        );
        assert_eq!(
            PresentedCredential::from_helper_line(""),
            Err(CredentialParseError::FieldCount(0))
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let credential = PresentedCredential::new("alice", "supersecrettoken");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("supersecrettoken"));
        assert!(debug.contains("supers..."));
    }
}
