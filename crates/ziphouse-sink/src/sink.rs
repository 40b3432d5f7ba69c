//! Archive Sink
//!
//! The transactional consume step. Each [`ArchiveSink::process`] call
//! handles at most one record: check the day and rotate if it changed,
//! begin a transaction, take one record, resolve its topic's writer, append
//! the payload, commit. Any fault while taking or writing rolls the
//! transaction back - the record stays on the channel - and the iteration
//! reports [`SinkStatus::Backoff`] so the host slows its polling cadence.
//!
//! The sink never loops on its own; the host pipeline owns invocation
//! cadence, backoff, and lifecycle. Capacity exhaustion surfaces as a fatal
//! error ([`SinkError::is_fatal`]) that the host answers by stopping the
//! sink, not as a process exit from inside the component.

use chrono::Local;
use ziphouse_storage::{ArchiveRegistry, DiskUsageProbe, LocationSelector};

use crate::channel::{ChannelTransaction, EventChannel};
use crate::config::ArchiveSinkConfig;
use crate::error::Result;

/// Outcome of one iteration, reported to the host's scheduling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// A record was delivered; poll again immediately.
    Ready,
    /// Empty poll or rolled-back fault; slow down before the next poll.
    Backoff,
}

/// Source of the current calendar day, `YYYYMMDD`.
///
/// Injectable so tests can drive rotation without waiting for midnight.
pub trait DayClock: Send {
    fn today(&self) -> String;
}

/// Local wall clock, day granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDayClock;

impl DayClock for LocalDayClock {
    fn today(&self) -> String {
        Local::now().format("%Y%m%d").to_string()
    }
}

/// Destination the sink delivers records into.
///
/// [`ArchiveRegistry`] is the production implementation; the trait exists
/// so hosts and tests can substitute stand-ins, e.g. to simulate an I/O
/// fault between a successful writer resolution and the append.
pub trait ArchiveStore: Send {
    /// Close and re-provision streams if `day` differs from the active day.
    fn rotate_if_day_changed(&mut self, day: &str);

    /// Append `payload`, newline-terminated, to the archive for `topic`,
    /// opening it if absent.
    fn archive(&mut self, topic: &str, payload: &[u8]) -> ziphouse_storage::Result<()>;

    /// Flush and close every open archive.
    fn close_all(&mut self);
}

impl ArchiveStore for ArchiveRegistry {
    fn rotate_if_day_changed(&mut self, day: &str) {
        ArchiveRegistry::rotate_if_day_changed(self, day);
    }

    fn archive(&mut self, topic: &str, payload: &[u8]) -> ziphouse_storage::Result<()> {
        self.resolve(topic)?.append(payload)
    }

    fn close_all(&mut self) {
        ArchiveRegistry::close_all(self);
    }
}

/// A sink instance: one registry, one channel, one worker.
///
/// Not safe for concurrent use; hosts wanting parallelism run one sink per
/// worker on disjoint storage roots.
pub struct ArchiveSink<C: EventChannel, S: ArchiveStore = ArchiveRegistry> {
    name: String,
    channel: C,
    registry: S,
    clock: Box<dyn DayClock>,
}

impl<C: EventChannel, S: ArchiveStore> std::fmt::Debug for ArchiveSink<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveSink")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<C: EventChannel> ArchiveSink<C> {
    /// Build a sink from configuration, probing real disk usage.
    pub fn new(name: impl Into<String>, config: &ArchiveSinkConfig, channel: C) -> Result<Self> {
        config.validate()?;
        let probe = DiskUsageProbe::new(config.disk_usage_threshold);
        let selector = LocationSelector::new(config.storage_roots.clone(), Box::new(probe));
        let clock = LocalDayClock;
        let registry = ArchiveRegistry::new(selector, clock.today(), config.warm_rotation);
        Ok(Self::with_registry(name, channel, registry, Box::new(clock)))
    }
}

impl<C: EventChannel, S: ArchiveStore> ArchiveSink<C, S> {
    /// Build a sink around a pre-assembled archive store and clock.
    ///
    /// This is the seam tests and embedding hosts use to inject probe stubs,
    /// a fixed day, or a fault-injecting store.
    pub fn with_registry(
        name: impl Into<String>,
        channel: C,
        registry: S,
        clock: Box<dyn DayClock>,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            registry,
            clock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &S {
        &self.registry
    }

    /// Run one iteration: at most one record is consumed and archived.
    ///
    /// Returns `Err` only for faults the host must act on (a channel that
    /// cannot open a transaction, or fatal capacity exhaustion); everything
    /// else rolls back and reports [`SinkStatus::Backoff`].
    pub fn process(&mut self) -> Result<SinkStatus> {
        self.registry.rotate_if_day_changed(&self.clock.today());

        let registry = &mut self.registry;
        let mut txn = self.channel.begin()?;
        match Self::deliver(registry, txn.as_mut()) {
            Ok(status) => match txn.commit() {
                Ok(()) => Ok(status),
                Err(e) => {
                    tracing::warn!(sink = %self.name, error = %e, "commit failed, rolling back");
                    if let Err(re) = txn.rollback() {
                        tracing::error!(sink = %self.name, error = %re, "rollback failed");
                    }
                    Ok(SinkStatus::Backoff)
                }
            },
            Err(e) => {
                if let Err(re) = txn.rollback() {
                    tracing::error!(sink = %self.name, error = %re, "rollback failed");
                }
                if e.is_fatal() {
                    tracing::error!(sink = %self.name, error = %e, "fatal sink error");
                    return Err(e);
                }
                tracing::warn!(sink = %self.name, error = %e, "record delivery failed, backing off");
                Ok(SinkStatus::Backoff)
            }
        }
    }

    fn deliver(registry: &mut S, txn: &mut dyn ChannelTransaction) -> Result<SinkStatus> {
        let Some(record) = txn.take_one()? else {
            return Ok(SinkStatus::Backoff);
        };
        registry.archive(&record.topic, &record.payload)?;
        Ok(SinkStatus::Ready)
    }

    /// Flush and close every open archive. Called by the host at sink stop.
    pub fn stop(&mut self) {
        tracing::info!(sink = %self.name, "stopping sink, closing all archives");
        self.registry.close_all();
    }
}
