mod app;
mod form;

use anyhow::{Context, Result};
use std::{
    env,
    fs::{self, OpenOptions},
    sync::Mutex,
};

use gamezone_core::{
    config::{self, AppConfig},
    HttpCatalog, MemoryCatalog,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let mut config = AppConfig::load()?;
    if env::args().skip(1).any(|arg| arg == "--offline") {
        config.offline = true;
    }

    if config.offline {
        info!("Using the offline sample catalog");
        app::CatalogApp::new(MemoryCatalog::seeded()).run().await
    } else {
        info!(endpoint = %config.endpoint, "Using remote catalog");
        let remote = HttpCatalog::new(config.endpoint.clone(), config.request_timeout())
            .context("failed to build HTTP client")?;
        app::CatalogApp::new(remote).run().await
    }
}

fn init_logging() -> Result<()> {
    let log_dir = env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamezone.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal UI owns stdout, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
