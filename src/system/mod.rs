//! System resource detection.
//!
//! Provides cgroup-aware resource detection for containerized environments.
//! Detection runs once, at startup, and produces an immutable
//! [`ResourceSnapshot`] with no side effects beyond filesystem reads.
//!
//! # Cgroup Support
//!
//! - **cgroup v2**: Modern unified hierarchy (default on newer kernels)
//! - **cgroup v1**: Legacy hierarchy (still common in production)
//!
//! # Example
//!
//! ```rust,ignore
//! use worker_sizer::system::ResourceSnapshot;
//!
//! let snapshot = ResourceSnapshot::detect();
//! println!("container limit: {:?}", snapshot.container_memory_limit);
//! ```

mod cgroup;
mod memory;

pub use cgroup::{container_memory_limit, CGROUP_V1_MEMORY_LIMIT, CGROUP_V2_MEMORY_MAX};
pub use memory::HostMemory;

use serde::Serialize;

/// Immutable snapshot of the resources bounding this process.
///
/// Produced once per process lifetime; consumed read-only.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSnapshot {
    /// Total physical memory visible to the OS, in bytes.
    pub host_memory_bytes: u64,
    /// Currently-available physical memory, in bytes (host mode basis).
    pub free_memory_bytes: u64,
    /// Finite cgroup memory limit, when one was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_memory_limit: Option<u64>,
    /// Number of logical processors.
    pub cpu_count: usize,
}

impl ResourceSnapshot {
    /// Detect the resources bounding this process.
    pub fn detect() -> Self {
        let mem = HostMemory::detect();

        Self {
            host_memory_bytes: mem.total_bytes,
            free_memory_bytes: mem.available_bytes,
            container_memory_limit: container_memory_limit(),
            cpu_count: num_cpus::get(),
        }
    }

    /// True iff a finite cgroup memory limit bounds this process.
    pub fn is_container_constrained(&self) -> bool {
        self.container_memory_limit.is_some()
    }

    /// Which ceiling the sizing arithmetic will use.
    pub fn memory_source(&self) -> &'static str {
        if self.is_container_constrained() {
            "container"
        } else {
            "host"
        }
    }
}

/// Format a byte count in human-readable form.
pub fn display_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_snapshot() -> ResourceSnapshot {
        ResourceSnapshot {
            host_memory_bytes: 8_589_934_592,
            free_memory_bytes: 4_294_967_296,
            container_memory_limit: None,
            cpu_count: 4,
        }
    }

    #[test]
    fn test_memory_source() {
        let host = host_snapshot();
        assert!(!host.is_container_constrained());
        assert_eq!(host.memory_source(), "host");

        let container = ResourceSnapshot {
            container_memory_limit: Some(1_073_741_824),
            ..host
        };
        assert!(container.is_container_constrained());
        assert_eq!(container.memory_source(), "container");
    }

    #[test]
    fn test_display_bytes() {
        assert_eq!(display_bytes(1_073_741_824), "1.0 GB");
        assert_eq!(display_bytes(536_870_912), "512.0 MB");
        assert_eq!(display_bytes(512), "512 bytes");
    }
}
