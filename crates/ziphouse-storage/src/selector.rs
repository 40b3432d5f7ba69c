//! Storage Location Selector
//!
//! First-fit selection over the ordered list of configured storage roots.
//! The scan order is the configured order, so placement is deterministic
//! rather than load-balanced: all of a topic's archives for a day stay on
//! the first root for as long as it has room, which keeps read-back simple
//! for downstream consumers.

use std::path::{Path, PathBuf};

use crate::capacity::CapacityProbe;

/// Picks the storage root new archives are written to.
pub struct LocationSelector {
    roots: Vec<PathBuf>,
    probe: Box<dyn CapacityProbe>,
}

impl LocationSelector {
    pub fn new(roots: Vec<PathBuf>, probe: Box<dyn CapacityProbe>) -> Self {
        Self { roots, probe }
    }

    /// Return the first root the probe accepts, in configured order.
    ///
    /// `None` means every root is above the disk-usage threshold - the
    /// caller treats that as capacity exhaustion.
    pub fn select(&self) -> Option<&Path> {
        self.roots
            .iter()
            .find(|root| self.probe.is_available(root))
            .map(PathBuf::as_path)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl std::fmt::Debug for LocationSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSelector")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}
