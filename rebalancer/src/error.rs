//! Error types for the rebalancer.

use std::path::PathBuf;

use qtbalance_broker::BrokerError;

/// All errors that can occur during a rebalance run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Target percentages add up to more than 100%.
    #[error("Cannot have total portfolio percent over 1! (total {total:.4})")]
    Allocation { total: f64 },

    #[error("portfolio file error: {0}")]
    Target(String),

    #[error("failed to read portfolio file {path}: {source}")]
    TargetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse portfolio JSON: {0}")]
    TargetParse(#[from] serde_json::Error),

    #[error("expected exactly 1 account, found {0}")]
    AccountCount(usize),

    #[error("no {0} balance reported for the account")]
    MissingCurrency(String),

    #[error("symbol lookup for {symbol}: {detail}")]
    SymbolLookup { symbol: String, detail: String },

    #[error("failed to render plan: {0}")]
    Output(String),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

pub type Result<T> = std::result::Result<T, Error>;
