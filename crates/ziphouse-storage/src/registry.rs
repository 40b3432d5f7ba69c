//! Archive Registry
//!
//! Owns the mapping from topic name to its currently open [`ArchiveWriter`]
//! and the active-day marker. Per topic the lifecycle is a two-state
//! machine: `Absent -> open() -> Open -> close() -> Absent`, with no other
//! transitions. Writers are created lazily on the first write for a topic
//! and torn down as a group, either when the active day changes or at
//! shutdown - there is no per-entry eviction.
//!
//! ## Rotation
//!
//! `rotate_if_day_changed` closes every open writer (continuing past
//! individual close faults), advances the active day, then warm-reopens a
//! fresh writer for every topic that was open a moment before. Warm
//! rotation re-provisions streams for topics known to be active instead of
//! waiting for their next write; it can be disabled, in which case rotation
//! leaves every topic absent and lazy creation takes over.
//!
//! ## Fatal conditions
//!
//! When a writer must be opened and no storage root is below the disk-usage
//! threshold, `resolve` returns [`Error::CapacityExhausted`]. The owning
//! sink treats that as terminal: stopping cleanly beats silently dropping
//! records or writing into a full disk.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::archive::ArchiveWriter;
use crate::error::{Error, Result};
use crate::selector::LocationSelector;

/// Validate a topic name for use as a filename and archive-entry component.
///
/// Topic names are operator-controlled but still pass through the
/// filesystem verbatim, so they are restricted to `[A-Za-z0-9._-]` and must
/// be non-empty.
pub fn validate_topic(topic: &str) -> Result<()> {
    let safe = !topic.is_empty()
        && topic
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if safe {
        Ok(())
    } else {
        Err(Error::InvalidTopic(topic.to_string()))
    }
}

/// Topic -> open writer map with day-rotation coordination.
///
/// Single-writer: every operation takes `&mut self`, so rotation is atomic
/// with respect to resolution. One registry per sink instance; registries
/// must not share topic/day file names across workers.
#[derive(Debug)]
pub struct ArchiveRegistry {
    selector: LocationSelector,
    active_day: String,
    warm_rotation: bool,
    writers: HashMap<String, ArchiveWriter>,
}

impl ArchiveRegistry {
    pub fn new(selector: LocationSelector, active_day: String, warm_rotation: bool) -> Self {
        Self {
            selector,
            active_day,
            warm_rotation,
            writers: HashMap::new(),
        }
    }

    /// The day every currently open writer was opened for.
    pub fn active_day(&self) -> &str {
        &self.active_day
    }

    pub fn is_open(&self, topic: &str) -> bool {
        self.writers.contains_key(topic)
    }

    pub fn open_topics(&self) -> Vec<String> {
        self.writers.keys().cloned().collect()
    }

    /// Return the open writer for `topic`, creating it if absent.
    ///
    /// Lazy creation selects a storage root first-fit; if no root qualifies
    /// this fails with the fatal [`Error::CapacityExhausted`].
    pub fn resolve(&mut self, topic: &str) -> Result<&mut ArchiveWriter> {
        validate_topic(topic)?;
        match self.writers.entry(topic.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let root = self.selector.select().ok_or(Error::CapacityExhausted)?;
                let writer = ArchiveWriter::open(root, &self.active_day, topic)?;
                Ok(entry.insert(writer))
            }
        }
    }

    /// Close every open writer and, when the day advanced, re-provision the
    /// previously active topics under the new day.
    ///
    /// Close faults are logged and skipped so rotation always completes; a
    /// topic whose warm reopen fails reverts to absent and is lazily
    /// recreated on its next write.
    pub fn rotate_if_day_changed(&mut self, current_day: &str) {
        if current_day == self.active_day {
            return;
        }
        tracing::info!(
            from = %self.active_day,
            to = current_day,
            topics = self.writers.len(),
            "day changed, rotating archives"
        );

        let was_open: Vec<String> = self.writers.keys().cloned().collect();
        self.close_all();
        self.active_day = current_day.to_string();

        if !self.warm_rotation {
            return;
        }
        for topic in was_open {
            match self.selector.select() {
                Some(root) => match ArchiveWriter::open(root, &self.active_day, &topic) {
                    Ok(writer) => {
                        self.writers.insert(topic, writer);
                    }
                    Err(e) => {
                        tracing::error!(topic = %topic, error = %e, "failed to reopen archive after rotation");
                    }
                },
                None => {
                    tracing::error!(topic = %topic, "no storage root available to reopen archive after rotation");
                }
            }
        }
    }

    /// Close every open writer, ignoring per-writer faults.
    ///
    /// Used at rotation and shutdown; termination is never blocked by a
    /// single stuck stream.
    pub fn close_all(&mut self) {
        for (topic, writer) in self.writers.drain() {
            if let Err(e) = writer.close() {
                tracing::error!(topic = %topic, error = %e, "failed to close archive writer");
            }
        }
    }
}
