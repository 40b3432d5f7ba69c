//! Sink Error Types
//!
//! Faults are split the way the host pipeline reacts to them:
//!
//! - Per-record faults (a failed take, resolve, or append) never surface
//!   here; [`crate::ArchiveSink::process`] rolls the transaction back and
//!   reports `Backoff` instead.
//! - `Storage` wrapping `CapacityExhausted` is fatal: the sink instance must
//!   be stopped by the host's lifecycle layer.
//! - `Channel` and `Config` faults surface to the caller that owns the
//!   channel or the configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Archive-writer subsystem fault.
    #[error("Storage error: {0}")]
    Storage(#[from] ziphouse_storage::Error),

    /// Upstream channel or transaction fault.
    #[error("Channel error: {0}")]
    Channel(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SinkError {
    /// Whether the host must stop this sink instance rather than retry.
    pub fn is_fatal(&self) -> bool {
        match self {
            SinkError::Storage(e) => e.is_fatal(),
            SinkError::Channel(_) | SinkError::Config(_) => false,
        }
    }
}
