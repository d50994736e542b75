//! Storage abstraction. The engine persists everything through this
//! key-value port so backends (in-memory, file, browser local storage behind
//! a binding) stay interchangeable underneath the domain layer.

use thiserror::Error;

/// Typed error surfaced at the storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid child entry: {0}")]
    InvalidEntry(String),
}

/// Key-value store port. Values are JSON strings; keys are fixed constants
/// owned by the callers.
pub trait RecordStore: Send + Sync {
    /// Read the value under `key`. `None` when the key has never been
    /// written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
