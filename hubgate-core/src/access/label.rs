use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Label key carrying the authentication outcome between pipeline stages.
pub const AUTH_SUCCESS_LABEL: &str = "isAuthSuccess";

pub type Labels = HashMap<String, Vec<String>>;

/// Outcome of validating a presented credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub is_authenticated: bool,
    pub username: String,
}

impl AuthenticationResult {
    pub fn authenticated(username: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            username: username.into(),
        }
    }

    pub fn rejected(username: impl Into<String>) -> Self {
        Self {
            is_authenticated: false,
            username: username.into(),
        }
    }

    pub fn labels(&self) -> Labels {
        HashMap::from([(
            AUTH_SUCCESS_LABEL.to_string(),
            vec![self.is_authenticated.to_string()],
        )])
    }

    pub fn envelope(&self) -> LabelEnvelope {
        LabelEnvelope {
            labels: self.labels(),
        }
    }
}

/// Wire form written by the authentication step and merged into the
/// authorization request by the registry auth server:
/// `{"labels":{"isAuthSuccess":["true"]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEnvelope {
    #[serde(default)]
    pub labels: Labels,
}

impl LabelEnvelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl From<&AuthenticationResult> for LabelEnvelope {
    fn from(result: &AuthenticationResult) -> Self {
        result.envelope()
    }
}

/// What the labels on an authorization request say about authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthLabel {
    /// No labels at all: the authentication step never ran.
    Missing,
    Authenticated,
    Unauthenticated,
}

impl AuthLabel {
    /// Only a first value of exactly `"true"` counts as authenticated. A
    /// missing key or an empty value list is treated as a failed login.
    pub fn from_labels(labels: &Labels) -> Self {
        if labels.is_empty() {
            return AuthLabel::Missing;
        }

        match labels
            .get(AUTH_SUCCESS_LABEL)
            .and_then(|values| values.first())
        {
            Some(value) if value == "true" => AuthLabel::Authenticated,
            _ => AuthLabel::Unauthenticated,
        }
    }
}
