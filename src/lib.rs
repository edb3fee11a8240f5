//! worker_sizer - Resource-aware worker sizing for browser-automation test runs.
//!
//! This crate decides, once at process start, how many parallel test workers
//! the execution engine should launch: enough to saturate available compute
//! without exhausting memory, especially inside memory-constrained containers.
//!
//! # How it works
//!
//! - **Resource detection**: cgroup v2/v1 memory limits for containers,
//!   `/proc/meminfo` (with a `sysconf` fallback) for host memory, `num_cpus`
//!   for logical processors.
//! - **Sizing**: a threshold-and-clamp formula converts the detected ceiling
//!   into a worker count, honoring a manual override and mode-specific caps.
//!
//! The result is a single positive integer consumed by the external test
//! runner to size its worker pool; nothing is re-evaluated mid-run.
//!
//! # Example
//!
//! ```rust,ignore
//! use worker_sizer::sizing::{compute, DeploymentMode, SizingPolicy};
//! use worker_sizer::system::ResourceSnapshot;
//!
//! let snapshot = ResourceSnapshot::detect();
//! let mode = DeploymentMode::for_snapshot(&snapshot, false);
//! let policy = SizingPolicy::for_mode(mode);
//! let decision = compute(&snapshot, mode, &policy, None);
//! println!("workers: {}", decision.workers);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod sizing;
pub mod system;

// Re-exports for convenience
pub use config::Config;
pub use sizing::{compute, DeploymentMode, SizingDecision, SizingPolicy};
pub use system::ResourceSnapshot;
