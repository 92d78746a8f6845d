use crate::models::{ChainResponse, MineResponse, SubmitResponse, Transaction};
use crate::utils::error::PanelError;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// The node HTTP surface the panel consumes. A trait so the submit worker and
/// poller can be exercised against a recording fake.
#[allow(async_fn_in_trait)]
pub trait NodeApi {
    async fn fetch_chain(&self, endpoint: &str) -> Result<ChainResponse, PanelError>;
    async fn submit_transaction(
        &self,
        endpoint: &str,
        tx: &Transaction,
    ) -> Result<SubmitResponse, PanelError>;
    async fn trigger_mine(&self, endpoint: &str) -> Result<MineResponse, PanelError>;
}

#[derive(Clone)]
pub struct NodeClient {
    http: Client,
}

impl NodeClient {
    pub fn new(request_timeout: Option<Duration>) -> Result<Self, PanelError> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl NodeApi for NodeClient {
    async fn fetch_chain(&self, endpoint: &str) -> Result<ChainResponse, PanelError> {
        let response = self.http.get(format!("{endpoint}/chain")).send().await?;
        if !response.status().is_success() {
            return Err(PanelError::Rejected(response.status().to_string()));
        }
        Ok(response.json::<ChainResponse>().await?)
    }

    async fn submit_transaction(
        &self,
        endpoint: &str,
        tx: &Transaction,
    ) -> Result<SubmitResponse, PanelError> {
        let response = self
            .http
            .post(format!("{endpoint}/transactions/new"))
            .json(tx)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PanelError::Rejected(response.status().to_string()));
        }

        // The acceptance message is informational; a non-JSON body is not an error.
        let body = response
            .json::<SubmitResponse>()
            .await
            .unwrap_or_default();
        Ok(body)
    }

    async fn trigger_mine(&self, endpoint: &str) -> Result<MineResponse, PanelError> {
        let response = self.http.get(format!("{endpoint}/mine")).send().await?;
        if !response.status().is_success() {
            return Err(PanelError::Rejected(response.status().to_string()));
        }

        let body = response.json::<MineResponse>().await.unwrap_or_default();
        info!(
            event = "mine_response",
            endpoint = %endpoint,
            mined_index = ?body.index,
            node_message = ?body.message,
        );
        Ok(body)
    }
}
