use anyhow::Result;
use config::{Config as ConfigSource, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Node base URLs, polled in declared order.
    pub endpoints: Vec<String>,
    pub poll_interval_secs: u64,
    /// No per-request deadline unless set; a hung node stalls only the poll task.
    pub request_timeout_secs: Option<u64>,
    pub log_dir: PathBuf,
}

impl Config {
    /// Defaults < `panel.toml` < `PANEL_*` environment variables.
    pub fn load() -> Result<Self> {
        let source = ConfigSource::builder()
            .set_default(
                "endpoints",
                vec![
                    "http://127.0.0.1:5000".to_string(),
                    "http://127.0.0.1:5001".to_string(),
                    "http://127.0.0.1:5002".to_string(),
                ],
            )?
            .set_default("poll_interval_secs", 5)?
            .set_default("log_dir", "./logs")?
            .add_source(File::with_name("panel").required(false))
            .add_source(Environment::with_prefix("PANEL"))
            .build()?;

        Ok(source.try_deserialize()?)
    }
}
