mod client;
mod poller;
mod submit;

pub use client::{NodeApi, NodeClient};
pub use poller::{ChainState, NodeSnapshot, PanelSnapshot, Poller};
pub use submit::{NoticeLevel, StatusNotice, SubmitRequest};

use crate::config::Config;
use crate::ui;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::info;

pub struct Panel {
    config: Config,
    client: NodeClient,
}

impl Panel {
    pub fn new(config: Config) -> Result<Self> {
        let client = NodeClient::new(config.request_timeout_secs.map(Duration::from_secs))?;
        Ok(Self { config, client })
    }

    pub async fn run(self) -> Result<()> {
        let (snapshot_tx, snapshot_rx) = watch::channel(PanelSnapshot::empty());
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        let poller = Poller::new(&self.config, self.client.clone(), snapshot_tx);
        let poll_handle = tokio::spawn(poller.run());

        let submit_handle = tokio::spawn(submit::run_worker(
            self.client.clone(),
            submit_rx,
            notice_tx,
        ));

        let endpoints = self.config.endpoints.clone();
        let ui_handle =
            tokio::task::spawn_blocking(move || ui::run(endpoints, snapshot_rx, submit_tx, notice_rx));

        // The terminal UI decides the process lifetime; once it returns the
        // background tasks have no consumer left.
        let result = ui_handle.await?;

        poll_handle.abort();
        submit_handle.abort();

        info!(event = "panel_stopped", message = "Panel shut down");
        result
    }
}
