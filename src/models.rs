use serde::{Deserialize, Serialize};

/// A transfer as posted to and reported by the nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    // Epoch seconds and proof-of-work value; older nodes omit them.
    pub timestamp: Option<f64>,
    pub proof: Option<u64>,
}

/// Payload of `GET /chain`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: Option<u64>,
}

/// Payload of `GET /mine`, used for logging only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MineResponse {
    pub message: Option<String>,
    pub index: Option<u64>,
}

/// Acceptance notice from `POST /transactions/new`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    pub message: Option<String>,
}
