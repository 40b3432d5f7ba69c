//! Storage Error Types
//!
//! This module defines all error types that can occur in the archive-writer
//! subsystem.
//!
//! ## Error Categories
//!
//! ### Capacity Errors
//! - `CapacityExhausted`: no configured storage root is below the disk-usage
//!   threshold at the moment a new archive must be opened. This is the one
//!   fatal condition in the subsystem: continuing would either drop data or
//!   write past a disk-full boundary, so the owning sink must stop.
//!
//! ### Topic Errors
//! - `InvalidTopic`: the topic name failed validation. Topic names become
//!   filename and archive-entry components verbatim, so they are restricted
//!   to a safe character set.
//!
//! ### I/O and Container Errors
//! - `Io`: directory creation, file open, write, or flush failed.
//! - `Archive`: the ZIP container could not be written or finalized.
//!
//! ## Usage
//!
//! All storage operations return `Result<T>` which is aliased to
//! `Result<T, Error>`. This allows clean error propagation with `?`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("No storage root is below the disk-usage threshold")]
    CapacityExhausted,

    #[error("Invalid topic name: {0:?}")]
    InvalidTopic(String),
}

impl Error {
    /// Whether this error is unrecoverable for the owning sink instance.
    ///
    /// Capacity exhaustion is the only fatal condition: the sink must stop
    /// accepting work rather than silently drop records.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::CapacityExhausted)
    }
}
