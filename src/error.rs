//! Error types shared by the ledger, its stores and its consumers

use thiserror::Error;

/// Failures reported by a durable key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage rejected write for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },

    #[error("Value for key {key} is {len} bytes, quota is {quota}")]
    QuotaExceeded { key: String, len: usize, quota: usize },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures surfaced by ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("round ledger must be used inside a RoundsProvider")]
    MissingProvider,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
