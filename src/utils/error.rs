use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("node returned error status: {0}")]
    Rejected(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for PanelError {
    fn from(value: reqwest::Error) -> Self {
        PanelError::Transport(value.to_string())
    }
}
