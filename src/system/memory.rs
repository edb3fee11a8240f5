//! Host memory detection.
//!
//! Reads total and currently-available physical memory from `/proc/meminfo`,
//! falling back to `sysconf` where procfs is not available.

use std::fs;

use tracing::trace;

/// Total and available physical memory visible to the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostMemory {
    /// Total physical memory in bytes.
    pub total_bytes: u64,
    /// Currently-available physical memory in bytes.
    pub available_bytes: u64,
}

impl HostMemory {
    /// Detect host memory from the OS.
    pub fn detect() -> Self {
        // Best-effort: on non-Linux the read simply fails and we fall
        // through to sysconf.
        if let Ok(content) = fs::read_to_string("/proc/meminfo") {
            let mem = Self::parse_meminfo(&content);
            if mem.total_bytes > 0 {
                trace!(
                    "Host memory from /proc/meminfo: {} total, {} available",
                    mem.total_bytes,
                    mem.available_bytes
                );
                return mem;
            }
        }

        Self::from_sysconf()
    }

    fn parse_meminfo(content: &str) -> Self {
        let mut mem = Self::default();

        for line in content.lines() {
            if line.starts_with("MemTotal:") {
                mem.total_bytes = parse_meminfo_kb(line) * 1024;
            } else if line.starts_with("MemAvailable:") {
                mem.available_bytes = parse_meminfo_kb(line) * 1024;
            }
        }

        // MemAvailable is missing on kernels before 3.14
        if mem.available_bytes == 0 {
            mem.available_bytes = mem.total_bytes;
        }

        mem
    }

    fn from_sysconf() -> Self {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };

        let total = if pages > 0 && page_size > 0 {
            pages as u64 * page_size as u64
        } else {
            0
        };

        #[cfg(target_os = "linux")]
        let available = {
            let avail_pages = unsafe { libc::sysconf(libc::_SC_AVPHYS_PAGES) };
            if avail_pages > 0 && page_size > 0 {
                avail_pages as u64 * page_size as u64
            } else {
                total
            }
        };

        #[cfg(not(target_os = "linux"))]
        let available = total;

        trace!(
            "Host memory from sysconf: {} total, {} available",
            total,
            available
        );

        Self {
            total_bytes: total,
            available_bytes: available,
        }
    }
}

/// Parse a line like "MemTotal:       16384000 kB" and return the value in KB
fn parse_meminfo_kb(line: &str) -> u64 {
    line.split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "MemTotal:       16384000 kB\n\
                           MemFree:         1024000 kB\n\
                           MemAvailable:    8192000 kB\n\
                           Buffers:          512000 kB\n";

    #[test]
    fn test_parse_meminfo() {
        let mem = HostMemory::parse_meminfo(MEMINFO);
        assert_eq!(mem.total_bytes, 16_384_000 * 1024);
        assert_eq!(mem.available_bytes, 8_192_000 * 1024);
    }

    #[test]
    fn test_missing_mem_available_falls_back_to_total() {
        let mem = HostMemory::parse_meminfo("MemTotal:       4096000 kB\n");
        assert_eq!(mem.total_bytes, 4_096_000 * 1024);
        assert_eq!(mem.available_bytes, mem.total_bytes);
    }

    #[test]
    fn test_parse_meminfo_kb_malformed() {
        assert_eq!(parse_meminfo_kb("MemTotal: garbage kB"), 0);
        assert_eq!(parse_meminfo_kb("MemTotal:"), 0);
    }

    #[test]
    fn test_detect_returns_nonzero_total() {
        let mem = HostMemory::detect();
        assert!(mem.total_bytes > 0);
        assert!(mem.available_bytes > 0);
        assert!(mem.available_bytes <= mem.total_bytes);
    }
}
