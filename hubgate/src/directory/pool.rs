use std::time::Duration;

use hubgate_core::settings::database::DatabaseSettings;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::{debug, info};

use super::DirectoryError;

/// Open the directory connection pool and check connectivity.
///
/// The driver is picked from the URL scheme, so production runs against
/// MySQL while tests can point `database.url` at SQLite.
pub async fn connect_pool(settings: &DatabaseSettings) -> Result<AnyPool, DirectoryError> {
    sqlx::any::install_default_drivers();

    let max_connections = settings.max_open_connections.max(1);
    let max_lifetime = (settings.max_lifetime_minutes > 0)
        .then(|| Duration::from_secs(settings.max_lifetime_minutes * 60));

    if settings.max_idle_connections > 0 {
        // sqlx has no idle cap. The pool keeps no connections warm.
        debug!(
            "Ignoring max_idle_connections={}",
            settings.max_idle_connections
        );
    }

    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .max_lifetime(max_lifetime)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&settings.connection_url())
        .await
        .map_err(DirectoryError::Connect)?;

    info!(
        "Connected to directory database {} (max {} connections)",
        settings.redacted_url(),
        max_connections
    );

    Ok(pool)
}
