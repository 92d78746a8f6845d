use crate::config::Config;
use crate::core::client::NodeApi;
use crate::models::Block;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub enum ChainState {
    Chain(Vec<Block>),
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    pub endpoint: String,
    pub state: ChainState,
}

/// Result of one complete poll cycle over every configured node. Rebuilt from
/// scratch each cycle and published whole; the previous snapshot is discarded,
/// never diffed.
#[derive(Debug, Clone)]
pub struct PanelSnapshot {
    pub taken_at: Option<DateTime<Utc>>,
    pub nodes: Vec<NodeSnapshot>,
}

impl PanelSnapshot {
    pub fn empty() -> Self {
        Self {
            taken_at: None,
            nodes: Vec::new(),
        }
    }
}

pub struct Poller<A> {
    api: A,
    endpoints: Vec<String>,
    interval: Duration,
    snapshots: watch::Sender<PanelSnapshot>,
}

impl<A: NodeApi> Poller<A> {
    pub fn new(config: &Config, api: A, snapshots: watch::Sender<PanelSnapshot>) -> Self {
        Self {
            api,
            endpoints: config.endpoints.clone(),
            interval: Duration::from_secs(config.poll_interval_secs),
            snapshots,
        }
    }

    /// Cycles are strictly sequential: the next sleep starts only after the
    /// current cycle has finished, so two cycles can never be in flight at once.
    pub async fn run(self) {
        info!(
            event = "poller_started",
            message = "Starting chain poll loop",
            interval_secs = self.interval.as_secs(),
            nodes = self.endpoints.len(),
        );

        loop {
            let snapshot = self.poll_cycle().await;
            // watch delivery is last-writer-wins; a closed channel means the UI is gone
            if self.snapshots.send(snapshot).is_err() {
                break;
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    async fn poll_cycle(&self) -> PanelSnapshot {
        let mut nodes = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            let state = match self.api.fetch_chain(endpoint).await {
                Ok(response) => {
                    info!(
                        event = "chain_fetched",
                        endpoint = %endpoint,
                        blocks = response.chain.len(),
                        reported_length = ?response.length,
                    );
                    ChainState::Chain(response.chain)
                }
                Err(e) => {
                    error!(
                        event = "chain_fetch_failed",
                        message = "Skipping node for this cycle",
                        endpoint = %endpoint,
                        error = %e,
                    );
                    ChainState::Unreachable
                }
            };
            nodes.push(NodeSnapshot {
                endpoint: endpoint.clone(),
                state,
            });
        }

        PanelSnapshot {
            taken_at: Some(Utc::now()),
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, ChainResponse, MineResponse, SubmitResponse, Transaction};
    use crate::utils::error::PanelError;

    struct FakeApi {
        failing: Vec<&'static str>,
    }

    impl NodeApi for FakeApi {
        async fn fetch_chain(&self, endpoint: &str) -> Result<ChainResponse, PanelError> {
            if self.failing.iter().any(|f| endpoint.contains(f)) {
                return Err(PanelError::Transport("connection refused".into()));
            }
            Ok(ChainResponse {
                chain: vec![Block {
                    index: 1,
                    previous_hash: "1".into(),
                    transactions: Vec::new(),
                    timestamp: None,
                    proof: Some(100),
                }],
                length: Some(1),
            })
        }

        async fn submit_transaction(
            &self,
            _endpoint: &str,
            _tx: &Transaction,
        ) -> Result<SubmitResponse, PanelError> {
            unreachable!("poller never submits");
        }

        async fn trigger_mine(&self, _endpoint: &str) -> Result<MineResponse, PanelError> {
            unreachable!("poller never mines");
        }
    }

    fn poller(failing: Vec<&'static str>) -> Poller<FakeApi> {
        let (tx, _rx) = watch::channel(PanelSnapshot::empty());
        Poller {
            api: FakeApi { failing },
            endpoints: vec![
                "http://127.0.0.1:5000".into(),
                "http://127.0.0.1:5001".into(),
                "http://127.0.0.1:5002".into(),
            ],
            interval: Duration::from_secs(5),
            snapshots: tx,
        }
    }

    #[tokio::test]
    async fn cycle_records_every_node_in_declared_order() {
        let snapshot = poller(Vec::new()).poll_cycle().await;
        let endpoints: Vec<_> = snapshot.nodes.iter().map(|n| n.endpoint.as_str()).collect();
        assert_eq!(
            endpoints,
            vec![
                "http://127.0.0.1:5000",
                "http://127.0.0.1:5001",
                "http://127.0.0.1:5002",
            ]
        );
        assert!(snapshot.taken_at.is_some());
    }

    #[tokio::test]
    async fn failed_node_is_marked_unreachable_without_affecting_others() {
        let snapshot = poller(vec![":5001"]).poll_cycle().await;
        assert!(matches!(snapshot.nodes[0].state, ChainState::Chain(_)));
        assert!(matches!(snapshot.nodes[1].state, ChainState::Unreachable));
        assert!(matches!(snapshot.nodes[2].state, ChainState::Chain(_)));
    }
}
