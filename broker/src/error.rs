//! Broker error types.

use std::path::PathBuf;

/// Errors that can occur during broker operations.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("{endpoint} returned {status}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("failed to decode {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },

    #[error("invalid broker data: {0}")]
    Data(#[from] qtbalance::ValidationError),

    #[error("not connected")]
    NotConnected,

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("token file {0} is empty")]
    EmptyToken(PathBuf),

    #[error("order error: {0}")]
    Order(String),
}
