//! Ephemeral stores for exercising the model layer without HTTP.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool};

/// A migrated in-memory store private to the caller. Dropping the pool
/// discards every record.
pub async fn fresh_store() -> Result<DbPool> {
    let pool = platform_db::connect(&DatabaseSettings::in_memory())
        .await
        .context("in-memory store unavailable")?;
    Migrator::up(&pool, None)
        .await
        .context("migrating in-memory store")?;
    Ok(pool)
}
