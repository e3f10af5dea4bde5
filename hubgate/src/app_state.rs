use std::sync::Arc;

use hubgate_core::settings::{credentials::AuthSettings, database::DatabaseSettings};

use crate::directory::{connect_pool, DirectoryError, SqlDirectory};
use crate::services::authentication::{AuthenticationError, CredentialValidator};
use crate::services::authorization::PolicyEngine;
use crate::settings::config::Settings;
use crate::stop_flag;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub authenticator: Arc<CredentialValidator>,
    pub policy: PolicyEngine,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<SharedAppState> {
        let authenticator = build_authenticator(&settings.auth)?;
        let policy = build_policy_engine(&settings.database).await?;

        let state = Self::from_parts(settings, authenticator, policy);
        stop_flag::register_signal_handler(&state.stop_flag);

        Ok(state)
    }

    /// Assemble state from already built services, without signal handling.
    pub fn from_parts(
        settings: Settings,
        authenticator: CredentialValidator,
        policy: PolicyEngine,
    ) -> SharedAppState {
        Arc::new(AppState {
            settings,
            stop_flag: stop_flag::StopFlag::new(),
            authenticator: Arc::new(authenticator),
            policy,
        })
    }
}

pub fn build_authenticator(settings: &AuthSettings) -> Result<CredentialValidator, AuthenticationError> {
    CredentialValidator::from_settings(settings)
}

/// Connect the directory database and wrap it in a policy engine.
pub async fn build_policy_engine(settings: &DatabaseSettings) -> Result<PolicyEngine, DirectoryError> {
    let pool = connect_pool(settings).await?;
    Ok(PolicyEngine::new(Arc::new(SqlDirectory::new(pool))))
}
