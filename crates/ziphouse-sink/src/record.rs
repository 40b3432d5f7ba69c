//! Record Type
//!
//! The unit of data flowing through the sink: an opaque byte payload tagged
//! with the topic that names its logical stream. The topic determines both
//! the archive filename and the registry key; payload bytes are written
//! verbatim (plus a newline terminator) into the topic's archive entry.
//!
//! Uses `bytes::Bytes` so channel implementations can hand out cheap clones
//! of the same payload (rollback requeues without copying).

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single topic-tagged record delivered to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkRecord {
    /// Logical stream this record belongs to.
    pub topic: String,

    /// Opaque payload bytes.
    pub payload: Bytes,
}

impl SinkRecord {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}
