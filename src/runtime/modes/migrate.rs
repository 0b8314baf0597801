//! Migrate mode
//!
//! Applies pending schema migrations to the configured database and exits.

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::storage::SeaOrmStorage;
use crate::storage::backend::infer_backend_from_url;

pub async fn run_migrate(config: &AppConfig) -> Result<()> {
    if config.store.backend != StoreBackend::Database {
        bail!("Migrations only apply to store.backend = \"database\"");
    }

    let backend_type = infer_backend_from_url(&config.store.database_url)?;
    // 连接时即执行迁移
    SeaOrmStorage::new(&config.store.database_url, &backend_type, 1)
        .await
        .context("Failed to migrate database")?;

    info!("Database migrations applied ({})", backend_type);
    Ok(())
}
