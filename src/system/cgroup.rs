//! Cgroup memory-limit detection.
//!
//! Supports both cgroup v1 and v2 for detecting the container memory ceiling
//! (Docker, Kubernetes). Every probe is best-effort: a missing, unreadable,
//! or malformed file is a miss at that tier, never an error.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

/// cgroup v2 memory limit (unified hierarchy). Content: bytes or "max".
pub const CGROUP_V2_MEMORY_MAX: &str = "/sys/fs/cgroup/memory.max";

/// cgroup v1 memory limit (legacy hierarchy). Content: bytes.
pub const CGROUP_V1_MEMORY_LIMIT: &str = "/sys/fs/cgroup/memory/memory.limit_in_bytes";

// cgroup v1 reports ~9.2 exabytes (close to i64::MAX rounded to the page
// size) when no limit is configured.
const CGROUP_V1_UNLIMITED: u64 = 9_000_000_000_000_000_000;

/// Detect the container memory limit, if any.
///
/// Checks cgroup v2 first, then cgroup v1. Returns `None` on bare metal,
/// when the limit is the "unlimited" sentinel, or when the cgroup files
/// cannot be read.
pub fn container_memory_limit() -> Option<u64> {
    detect_at(
        Path::new(CGROUP_V2_MEMORY_MAX),
        Path::new(CGROUP_V1_MEMORY_LIMIT),
    )
}

fn detect_at(v2_path: &Path, v1_path: &Path) -> Option<u64> {
    if let Some(limit) = read_v2_limit(v2_path) {
        debug!("Detected cgroup v2 memory limit: {} bytes", limit);
        return Some(limit);
    }

    if let Some(limit) = read_v1_limit(v1_path) {
        debug!("Detected cgroup v1 memory limit: {} bytes", limit);
        return Some(limit);
    }

    debug!("No container memory limit detected");
    None
}

/// Read the cgroup v2 limit. Format: bytes or "max" (unlimited).
fn read_v2_limit(path: &Path) -> Option<u64> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();

    if trimmed == "max" {
        trace!("cgroup v2 memory.max reports unlimited");
        return None;
    }

    trimmed.parse::<u64>().ok()
}

/// Read the cgroup v1 limit. Very large values mean unlimited.
fn read_v1_limit(path: &Path) -> Option<u64> {
    let content = fs::read_to_string(path).ok()?;
    let value = content.trim().parse::<u64>().ok()?;

    if value >= CGROUP_V1_UNLIMITED {
        trace!("cgroup v1 memory.limit_in_bytes reports unlimited");
        return None;
    }

    Some(value)
}
