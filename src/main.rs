//! Upcheck - Website Uptime Monitor
//!
//! Registers URLs with a per-target check interval, probes the due ones with
//! timed HEAD requests on a fixed cycle, and keeps a bounded outcome history
//! per target.

mod config;
mod db;
mod probe;
mod scheduler;
mod web;

use config::ServerConfig;
use db::Store;
use scheduler::CycleRunner;
use web::Server;

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("upcheck=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting Upcheck on port {}...", cfg.http_port);
    tracing::info!("Using database at {}", cfg.db_path);

    // Initialize database
    let store = Arc::new(Store::new(&cfg.db_path)?);
    tracing::info!("Database initialized successfully");

    // Start the probe cycle runner
    let runner = Arc::new(CycleRunner::new(
        store.clone(),
        Duration::from_millis(cfg.probe_timeout_ms),
    ));
    runner.start(Duration::from_secs(cfg.cycle_interval_secs));

    // Start web server
    let server = Server::new(cfg, store, runner);
    server.start().await?;

    Ok(())
}
