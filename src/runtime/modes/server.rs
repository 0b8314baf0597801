//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::configure;
use crate::api::middleware::RequestIdMiddleware;
use crate::config::AppConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// 1. Prepares the storage backend and shared state
/// 2. Configures and starts the HTTP server
/// 3. Stops gracefully on Ctrl+C / SIGTERM
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: AppConfig) -> Result<()> {
    let startup = lifetime::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let state = startup.state;
    let workers = config.server.workers.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(|cfg| configure(cfg, &state))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(workers)
    .disable_signals()
    .bind(&bind_address)?
    .run();

    warn!(
        "Starting server at http://{} with {} workers",
        bind_address, workers
    );
    info!(
        "Referral links served under {}/{{code}}",
        config.referral.route_prefix
    );

    let handle = server.handle();
    tokio::spawn(async move {
        lifetime::shutdown::listen_for_shutdown().await;
        handle.stop(true).await;
    });

    server.await?;
    warn!("Graceful shutdown complete");

    Ok(())
}
