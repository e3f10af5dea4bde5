use hubgate_core::access::{AuthenticationResult, PresentedCredential};
use hubgate_core::settings::credentials::{AuthSettings, CredentialMode};
use tracing::{info, warn};

use super::error::{AuthenticationError, TokenCheck};
use super::introspection::IntrospectionClient;
use super::jwt::JwtVerifier;
use super::keys::VerificationKeys;

#[derive(Debug, Clone)]
enum Verifier {
    Jwt(JwtVerifier),
    Introspection(IntrospectionClient),
}

/// What the registry login flow should do after checking a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginVerdict {
    /// Continue to authorization with this outcome attached as the label.
    Forward(AuthenticationResult),
    /// A liveness probe failed; stop without consulting authorization.
    PingRejected,
}

/// Validates presented registry credentials in the configured mode.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    verifier: Verifier,
}

impl CredentialValidator {
    /// Build the validator for the configured mode, loading keys or
    /// resolving the introspection endpoint up front.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthenticationError> {
        let mode = settings.mode.ok_or_else(|| {
            AuthenticationError::configuration("auth.mode is not set, expected jwt or introspection")
        })?;

        let validator = match mode {
            CredentialMode::Jwt => {
                Self::jwt(JwtVerifier::new(VerificationKeys::load(&settings.jwt)?))
            }
            CredentialMode::Introspection => {
                Self::introspection(IntrospectionClient::from_settings(&settings.introspection)?)
            }
        };

        info!("Credential validation mode: {}", mode);
        Ok(validator)
    }

    pub fn jwt(verifier: JwtVerifier) -> Self {
        Self {
            verifier: Verifier::Jwt(verifier),
        }
    }

    pub fn introspection(client: IntrospectionClient) -> Self {
        Self {
            verifier: Verifier::Introspection(client),
        }
    }

    pub fn mode(&self) -> CredentialMode {
        match self.verifier {
            Verifier::Jwt(_) => CredentialMode::Jwt,
            Verifier::Introspection(_) => CredentialMode::Introspection,
        }
    }

    /// Check `token` for `username`. A bad credential yields an
    /// unauthenticated result; `Err` means no decision could be made.
    pub async fn authenticate(
        &self,
        username: &str,
        token: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let check = match &self.verifier {
            Verifier::Jwt(verifier) => verifier.verify(username, token),
            Verifier::Introspection(client) => client.verify(username, token).await?,
        };

        match check {
            TokenCheck::Valid => {
                info!("User {} authenticated", username);
                Ok(AuthenticationResult::authenticated(username))
            }
            TokenCheck::Rejected(reason) => {
                info!("Authentication failed for {}: {}", username, reason);
                Ok(AuthenticationResult::rejected(username))
            }
        }
    }

    /// Registry login flow. Failed logins are forwarded with a negative
    /// label so anonymous pulls of public images keep working; only a failed
    /// ping is terminal.
    pub async fn authenticate_login(
        &self,
        credential: &PresentedCredential,
    ) -> Result<LoginVerdict, AuthenticationError> {
        let result = self
            .authenticate(&credential.username, &credential.token)
            .await?;

        if credential.ping && !result.is_authenticated {
            warn!("Ping login failed for {}", credential.username);
            return Ok(LoginVerdict::PingRejected);
        }

        Ok(LoginVerdict::Forward(result))
    }
}
