//! Disk Capacity Probe
//!
//! Decides whether a storage root has room for new archives. A root
//! qualifies when its used-space fraction, `(total - available) / total`,
//! is strictly below the configured threshold percentage.
//!
//! A probe fault (root cannot be created or the filesystem cannot be
//! statted) is logged and reported as "not available" - one bad root must
//! never block evaluation of the remaining roots.

use std::fs;
use std::path::Path;

/// Default disk-usage threshold percentage.
pub const DEFAULT_DISK_USAGE_THRESHOLD: u8 = 90;

/// Reports whether a storage root is eligible to receive new archives.
///
/// Implemented by [`DiskUsageProbe`] in production; tests inject stubs to
/// script availability per root.
pub trait CapacityProbe: Send {
    fn is_available(&self, root: &Path) -> bool;
}

/// Filesystem-backed probe comparing used-space percentage to a threshold.
#[derive(Debug, Clone)]
pub struct DiskUsageProbe {
    threshold_percent: u8,
}

impl DiskUsageProbe {
    pub fn new(threshold_percent: u8) -> Self {
        Self { threshold_percent }
    }

    pub fn threshold_percent(&self) -> u8 {
        self.threshold_percent
    }

    fn used_percent(root: &Path) -> std::io::Result<f64> {
        let total = fs2::total_space(root)?;
        let available = fs2::available_space(root)?;
        if total == 0 {
            // Zero-capacity filesystem: report full.
            return Ok(100.0);
        }
        Ok((total - available) as f64 / total as f64 * 100.0)
    }
}

impl Default for DiskUsageProbe {
    fn default() -> Self {
        Self::new(DEFAULT_DISK_USAGE_THRESHOLD)
    }
}

impl CapacityProbe for DiskUsageProbe {
    fn is_available(&self, root: &Path) -> bool {
        // Roots are created on demand so a freshly provisioned mount point
        // can be probed before its first write.
        if let Err(e) = fs::create_dir_all(root) {
            tracing::error!(root = %root.display(), error = %e, "failed to create storage root");
            return false;
        }
        match Self::used_percent(root) {
            Ok(used) => used < f64::from(self.threshold_percent),
            Err(e) => {
                tracing::error!(root = %root.display(), error = %e, "failed to query disk usage");
                false
            }
        }
    }
}
