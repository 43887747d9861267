use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, warn};

use crate::error::BootstrapError;

pub const PING_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 10;

/// Builds the shared pool and checks the database answers within [`PING_TIMEOUT`].
///
/// The pool is closed before returning an error, so nothing leaks on a failed
/// startup.
pub async fn connect(database_url: &str) -> Result<PgPool, BootstrapError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(PING_TIMEOUT)
        .connect_lazy(database_url)
        .map_err(BootstrapError::DatabaseUrl)?;

    let result = match tokio::time::timeout(PING_TIMEOUT, ping(&pool)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(BootstrapError::DatabasePing(e)),
        Err(_) => Err(BootstrapError::Timeout {
            what: "database",
            secs: PING_TIMEOUT.as_secs(),
        }),
    };

    if let Err(e) = result {
        warn!(error = %e, "database ping failed; closing pool");
        pool.close().await;
        return Err(e);
    }

    debug!(max_connections = MAX_CONNECTIONS, "database pool ready");
    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Applies the embedded migrations. Failure is logged, not fatal.
pub async fn migrate(pool: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        warn!(error = %e, "migration failed; continuing");
    }
}
