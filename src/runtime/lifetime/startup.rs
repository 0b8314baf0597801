use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::StorageFactory;

pub struct StartupContext {
    pub state: AppState,
}

/// 准备服务器启动的上下文：TLS provider、存储后端、共享状态
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let store = StorageFactory::create(&config.store)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    if config.admin.token.trim().is_empty() {
        warn!(
            "Admin API is disabled (admin.token not set), {} returns 404",
            config.admin.route_prefix
        );
    } else {
        info!("Admin API available at: {}", config.admin.route_prefix);
    }

    let state = AppState::new(Arc::clone(&store), config);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { state })
}
