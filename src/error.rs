//! Error types for the bot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Negative or non-finite rate handed to the simulator. Indicates an
    /// upstream data or extraction bug, so the fixture is skipped rather
    /// than simulated.
    #[error("invalid simulation rate: {0}")]
    InvalidRate(f64),

    #[error("ledger persistence failed at {path}: {source}")]
    Ledger {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger encoding failed: {0}")]
    LedgerEncode(#[from] serde_json::Error),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
