//! Sink Configuration
//!
//! Controls where archives land and when a storage root is considered full:
//!
//! - **storage_roots**: ordered candidate write targets; selection always
//!   scans in this order (first-fit, deterministic placement).
//! - **disk_usage_threshold**: a root qualifies while its used-space
//!   percentage is strictly below this value (default: 90).
//! - **warm_rotation**: eagerly reopen every previously-active topic when
//!   the day changes (default: true).
//!
//! ## Usage
//!
//! ```ignore
//! use ziphouse_sink::ArchiveSinkConfig;
//!
//! // From the comma-delimited form used in deployment properties
//! let config = ArchiveSinkConfig::from_root_spec("/data/a,/data/b")?;
//!
//! // Or explicitly
//! let config = ArchiveSinkConfig {
//!     storage_roots: vec!["/data/a".into()],
//!     disk_usage_threshold: 85,
//!     ..Default::default()
//! };
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SinkError};

fn default_disk_usage_threshold() -> u8 {
    ziphouse_storage::DEFAULT_DISK_USAGE_THRESHOLD
}

fn default_warm_rotation() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSinkConfig {
    /// Ordered candidate storage roots.
    pub storage_roots: Vec<PathBuf>,

    /// Disk-usage threshold percentage (default: 90).
    #[serde(default = "default_disk_usage_threshold")]
    pub disk_usage_threshold: u8,

    /// Reopen previously-active topics eagerly on day rotation (default: true).
    #[serde(default = "default_warm_rotation")]
    pub warm_rotation: bool,
}

impl Default for ArchiveSinkConfig {
    fn default() -> Self {
        Self {
            storage_roots: Vec::new(),
            disk_usage_threshold: default_disk_usage_threshold(),
            warm_rotation: default_warm_rotation(),
        }
    }
}

impl ArchiveSinkConfig {
    /// Parse the comma-delimited root list used in deployment properties,
    /// e.g. `"/data/archive/a,/data/archive/b"`.
    pub fn from_root_spec(spec: &str) -> Result<Self> {
        let storage_roots: Vec<PathBuf> = spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        if storage_roots.is_empty() {
            return Err(SinkError::Config(format!(
                "no storage roots in spec {spec:?}"
            )));
        }
        Ok(Self {
            storage_roots,
            ..Self::default()
        })
    }

    /// Validate the configuration before building a sink from it.
    pub fn validate(&self) -> Result<()> {
        if self.storage_roots.is_empty() {
            return Err(SinkError::Config(
                "at least one storage root is required".to_string(),
            ));
        }
        if self.disk_usage_threshold > 100 {
            return Err(SinkError::Config(format!(
                "disk_usage_threshold must be 0..=100, got {}",
                self.disk_usage_threshold
            )));
        }
        Ok(())
    }
}
