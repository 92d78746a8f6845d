use anyhow::Result;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod config;
mod core;
mod models;
mod ui;
mod utils;

use crate::core::Panel;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::load()?;
    init_logging(&config)?;

    let panel = Panel::new(config)?;
    panel.run().await?;

    Ok(())
}

// The terminal is owned by the panel, so logs go to a file instead of stdout.
fn init_logging(config: &config::Config) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let log_file = std::fs::File::create(config.log_dir.join("chain-panel.log"))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}
