use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::label::{AuthLabel, AuthenticationResult, Labels};

/// An authorization request as handed over by the registry auth server.
///
/// The JSON shape mirrors the auth server's request info, which uses
/// PascalCase keys and an upper-case `IP`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorizationRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default, rename = "Type")]
    pub kind: String,
    /// Repository name, `<organization>/<image>`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub service: String,
    #[serde(default, rename = "IP", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub labels: Labels,
}

impl AuthorizationRequest {
    pub fn new(
        account: impl Into<String>,
        repository_name: impl Into<String>,
        actions: Vec<String>,
        labels: Labels,
    ) -> Self {
        Self {
            account: account.into(),
            kind: "repository".to_string(),
            name: repository_name.into(),
            actions,
            labels,
            ..Default::default()
        }
    }

    /// Build a request whose labels carry a typed authentication outcome.
    pub fn with_authentication(
        repository_name: impl Into<String>,
        actions: Vec<String>,
        authentication: &AuthenticationResult,
    ) -> Self {
        Self::new(
            authentication.username.clone(),
            repository_name,
            actions,
            authentication.labels(),
        )
    }

    pub fn intent(&self) -> Option<Intent> {
        Intent::classify(&self.actions)
    }

    pub fn auth_label(&self) -> AuthLabel {
        AuthLabel::from_labels(&self.labels)
    }
}
