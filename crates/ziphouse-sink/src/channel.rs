//! Event Channel Abstraction
//!
//! Defines the transactional contract the sink expects from the upstream
//! event channel, plus [`MemoryChannel`], an in-process implementation used
//! by tests and by hosts that feed the sink directly.
//!
//! The contract mirrors take/commit/rollback channel semantics: a record
//! taken inside a transaction is not lost if processing fails before
//! commit - rollback (or dropping the transaction without committing)
//! returns it to the channel for redelivery.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{Result, SinkError};
use crate::record::SinkRecord;

/// Upstream source of records, consumed one transaction at a time.
pub trait EventChannel: Send {
    /// Begin a transaction against the channel.
    ///
    /// The transaction is released when the returned value is dropped;
    /// dropping without a commit must behave like a rollback.
    fn begin(&mut self) -> Result<Box<dyn ChannelTransaction + '_>>;
}

/// One unit of work against the channel.
pub trait ChannelTransaction {
    /// Take at most one record. `None` is an empty poll, not a fault.
    fn take_one(&mut self) -> Result<Option<SinkRecord>>;

    /// Mark every taken record as consumed.
    fn commit(&mut self) -> Result<()>;

    /// Return every taken record to the channel for redelivery.
    fn rollback(&mut self) -> Result<()>;
}

/// In-process FIFO channel with transactional take semantics.
///
/// Clones share the same queue, so a producer half can keep pushing while
/// the sink owns another clone for consumption.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    queue: Arc<Mutex<VecDeque<SinkRecord>>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: SinkRecord) {
        self.queue.lock().expect("channel lock").push_back(record);
    }

    pub fn len(&self) -> usize {
        self.queue.lock().expect("channel lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventChannel for MemoryChannel {
    fn begin(&mut self) -> Result<Box<dyn ChannelTransaction + '_>> {
        Ok(Box::new(MemoryTransaction {
            queue: Arc::clone(&self.queue),
            taken: Vec::new(),
            completed: false,
        }))
    }
}

/// Transaction over a [`MemoryChannel`].
///
/// Taken records are buffered until commit; rollback pushes them back to
/// the front of the queue in their original order.
pub struct MemoryTransaction {
    queue: Arc<Mutex<VecDeque<SinkRecord>>>,
    taken: Vec<SinkRecord>,
    completed: bool,
}

impl ChannelTransaction for MemoryTransaction {
    fn take_one(&mut self) -> Result<Option<SinkRecord>> {
        if self.completed {
            return Err(SinkError::Channel(
                "take after transaction completion".to_string(),
            ));
        }
        let record = self.queue.lock().expect("channel lock").pop_front();
        if let Some(record) = &record {
            self.taken.push(record.clone());
        }
        Ok(record)
    }

    fn commit(&mut self) -> Result<()> {
        self.taken.clear();
        self.completed = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut queue = self.queue.lock().expect("channel lock");
        for record in self.taken.drain(..).rev() {
            queue.push_front(record);
        }
        self.completed = true;
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        // Release-on-drop: an abandoned transaction rolls back.
        if !self.completed {
            let _ = self.rollback();
        }
    }
}
