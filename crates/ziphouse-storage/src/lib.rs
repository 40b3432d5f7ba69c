//! Ziphouse Storage Layer
//!
//! This crate implements the archive-writer subsystem for the ziphouse sink -
//! the component responsible for persisting topic-tagged records into
//! per-topic, date-partitioned ZIP archives spread across a set of
//! operator-configured storage roots.
//!
//! ## Architecture Overview
//!
//! ```text
//! resolve(topic)
//!     ↓
//! ArchiveRegistry        ← topic → open writer map, active day
//!     ↓ (writer absent)
//! LocationSelector       ← first root below the disk-usage threshold
//!     ↓
//! DiskUsageProbe         ← (total - available) / total vs threshold
//!     ↓
//! ArchiveWriter          ← <root>/<YYYYMMDD>/<topic>.zip, one entry
//! ```
//!
//! ## Main Components
//!
//! ### ArchiveRegistry
//! Owns every open [`ArchiveWriter`]. Lazily opens writers on first write for
//! a topic, and performs the coordinated close-all/reopen-all when the active
//! day changes.
//!
//! ### LocationSelector / CapacityProbe
//! First-fit scan over the ordered storage roots; a root qualifies when its
//! used-space fraction is below the configured threshold. First-fit keeps a
//! day's archives colocated on one root as long as it has room.
//!
//! ### ArchiveWriter
//! One open ZIP container bound to exactly one topic and one calendar day.
//! Payloads land newline-delimited in a single entry named after the topic,
//! readable with standard archive tools once the writer is closed.
//!
//! ## Concurrency
//!
//! The registry is single-writer: every mutating operation takes `&mut self`,
//! so rotation is atomic with respect to resolution by construction. Hosts
//! that want parallel sinks run one registry per worker, on disjoint roots.

pub mod archive;
pub mod capacity;
pub mod error;
pub mod registry;
pub mod selector;

pub use archive::ArchiveWriter;
pub use capacity::{CapacityProbe, DiskUsageProbe, DEFAULT_DISK_USAGE_THRESHOLD};
pub use error::{Error, Result};
pub use registry::ArchiveRegistry;
pub use selector::LocationSelector;
