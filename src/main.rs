//! Invoice API server
//!
//! Usage: `invoice-api [CONFIG]`
//!
//! The configuration file may also be given through `INVOICE_API_CONFIG`.
//! Without one, defaults apply (in-memory storage on 127.0.0.1:3000).

use anyhow::Result;
use invoice_api::config::AppConfig;
use invoice_api::server::ServerBuilder;
use invoice_api::storage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the configuration file
const ENV_CONFIG: &str = "INVOICE_API_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG).ok())
        .map(PathBuf::from);

    let config = AppConfig::load(config_path.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(path) = &config_path {
        tracing::info!("Loaded configuration from {}", path.display());
    }

    let repository = storage::open(&config.storage).await?;
    tracing::info!(backend = ?config.storage.backend, "storage ready");

    if config.seed > 0 {
        storage::seed::seed(repository.as_ref(), config.seed).await?;
    }

    ServerBuilder::new()
        .with_shared_repository(repository)
        .with_api_prefix(config.server.api_prefix.clone())
        .serve(&config.server.addr())
        .await
}
