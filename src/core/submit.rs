use crate::core::client::NodeApi;
use crate::models::Transaction;
use crate::utils::error::PanelError;
use tokio::sync::mpsc;
use tracing::{error, info};

/// A submission as captured from the form, still unparsed.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub endpoint: String,
    pub amount: String,
    pub sender: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing outcome shown in the status line.
#[derive(Debug, Clone)]
pub struct StatusNotice {
    pub level: NoticeLevel,
    pub text: String,
}

impl StatusNotice {
    fn info(text: String) -> Self {
        Self {
            level: NoticeLevel::Info,
            text,
        }
    }

    fn error(text: String) -> Self {
        Self {
            level: NoticeLevel::Error,
            text,
        }
    }
}

/// Validates the raw form fields and parses the amount. All three fields must
/// be non-empty; nothing is sent on the wire when this fails.
pub fn build_transaction(
    amount: &str,
    sender: &str,
    recipient: &str,
) -> Result<Transaction, PanelError> {
    if amount.is_empty() || sender.is_empty() || recipient.is_empty() {
        return Err(PanelError::InvalidInput(
            "amount, sender and recipient are all required".into(),
        ));
    }

    let amount = amount
        .parse::<f64>()
        .map_err(|_| PanelError::InvalidInput(format!("amount is not a number: {amount}")))?;

    Ok(Transaction {
        sender: sender.to_string(),
        recipient: recipient.to_string(),
        amount,
    })
}

/// Submits one transaction and, on acceptance, triggers exactly one mine
/// request against the same node. Mine failures are logged and swallowed.
pub async fn handle_submission<A: NodeApi>(api: &A, request: &SubmitRequest) -> StatusNotice {
    let tx = match build_transaction(&request.amount, &request.sender, &request.recipient) {
        Ok(tx) => tx,
        Err(e) => return StatusNotice::error(e.to_string()),
    };

    match api.submit_transaction(&request.endpoint, &tx).await {
        Ok(response) => {
            info!(
                event = "transaction_accepted",
                endpoint = %request.endpoint,
                amount = tx.amount,
                node_message = ?response.message,
            );

            if let Err(e) = api.trigger_mine(&request.endpoint).await {
                error!(
                    event = "mine_failed",
                    endpoint = %request.endpoint,
                    error = %e,
                );
            }

            let text = response
                .message
                .unwrap_or_else(|| format!("transaction sent to {}", request.endpoint));
            StatusNotice::info(text)
        }
        Err(PanelError::Rejected(status)) => {
            error!(
                event = "transaction_rejected",
                endpoint = %request.endpoint,
                status = %status,
            );
            StatusNotice::error(format!(
                "node {} rejected the transaction ({status})",
                request.endpoint
            ))
        }
        Err(e) => {
            error!(
                event = "transaction_send_failed",
                endpoint = %request.endpoint,
                error = %e,
            );
            StatusNotice::error(format!("could not reach node {}", request.endpoint))
        }
    }
}

/// Drains submissions from the UI and reports each outcome back to it.
pub async fn run_worker<A: NodeApi>(
    api: A,
    mut requests: mpsc::UnboundedReceiver<SubmitRequest>,
    notices: mpsc::UnboundedSender<StatusNotice>,
) {
    while let Some(request) = requests.recv().await {
        let notice = handle_submission(&api, &request).await;
        if notices.send(notice).is_err() {
            break;
        }
    }
}
