//! Ziphouse Sink
//!
//! The consume side of ziphouse: a sink that pulls topic-tagged records from
//! an upstream transactional event channel and hands them to the
//! archive-writer subsystem in `ziphouse-storage`.
//!
//! ## One iteration
//!
//! ```text
//! process()
//!     ↓
//! rotate_if_day_changed(today)   ← day check first, every iteration
//!     ↓
//! channel.begin()                ← upstream transaction
//!     ↓
//! txn.take_one()                 ← at most one record per iteration
//!     ↓
//! registry.resolve(topic)        ← lazy writer creation
//!     ↓
//! writer.append(payload)
//!     ↓
//! txn.commit()   /   txn.rollback() + Backoff on fault
//! ```
//!
//! The sink is iteration-driven: the host pipeline calls [`ArchiveSink::process`]
//! repeatedly and owns the polling cadence. A [`SinkStatus::Backoff`] return
//! asks the host to slow down (empty poll or a rolled-back fault); a fatal
//! error (capacity exhaustion) asks it to stop the sink entirely.

pub mod channel;
pub mod config;
pub mod error;
pub mod record;
pub mod sink;

pub use channel::{ChannelTransaction, EventChannel, MemoryChannel};
pub use config::ArchiveSinkConfig;
pub use error::{Result, SinkError};
pub use record::SinkRecord;
pub use sink::{ArchiveSink, ArchiveStore, DayClock, LocalDayClock, SinkStatus};
