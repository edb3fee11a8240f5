//! Deployment modes and sizing policy constants.

use serde::Serialize;

use crate::system::ResourceSnapshot;

const MB: u64 = 1024 * 1024;

/// Which external constraint dominates this deployment.
///
/// Selected once at startup; never re-evaluated mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// No cgroup limit: higher ceiling, CPU-based candidate active.
    Host,
    /// Finite cgroup memory limit: lower ceiling, memory is the binding
    /// constraint so the CPU candidate is disabled.
    Container,
    /// The remote execution target permits a single concurrent browser
    /// session; worker count is pinned regardless of resources.
    SessionLimited,
}

impl DeploymentMode {
    /// Select the deployment mode from the detected resources.
    ///
    /// A session-limited target (remote-grid credentials configured) wins
    /// over everything else; otherwise a detected cgroup limit selects
    /// container mode.
    pub fn for_snapshot(snapshot: &ResourceSnapshot, session_limited: bool) -> Self {
        if session_limited {
            Self::SessionLimited
        } else if snapshot.is_container_constrained() {
            Self::Container
        } else {
            Self::Host
        }
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Container => write!(f, "container"),
            Self::SessionLimited => write!(f, "session-limited"),
        }
    }
}

/// Sizing constants for one deployment mode.
///
/// One parameterized policy; mode differences are data, not duplicated
/// logic. All defaults are tunable through configuration.
#[derive(Debug, Clone)]
pub struct SizingPolicy {
    /// Estimated footprint of one worker plus its browser session.
    pub memory_per_worker_bytes: u64,
    /// Fraction of the detected ceiling considered safe to use.
    pub utilization_threshold: f64,
    /// Hard lower bound; the result is never below this.
    pub min_workers: usize,
    /// Hard upper bound; the result (and any override) never exceeds this.
    pub max_workers: usize,
    /// Whether the CPU-based candidate participates (host mode only).
    pub use_cpu_candidate: bool,
    /// Pin the worker count to 1, ignoring all arithmetic.
    pub forced_sequential: bool,
    /// Optional conservative cap on the host free-memory basis, to avoid
    /// over-provisioning on large uncontained hosts.
    pub host_memory_cap_bytes: Option<u64>,
}

impl SizingPolicy {
    /// Default policy constants for a deployment mode.
    pub fn for_mode(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Host => Self {
                memory_per_worker_bytes: 200 * MB,
                utilization_threshold: 0.8,
                min_workers: 1,
                max_workers: 10,
                use_cpu_candidate: true,
                forced_sequential: false,
                host_memory_cap_bytes: None,
            },
            DeploymentMode::Container => Self {
                memory_per_worker_bytes: 250 * MB,
                utilization_threshold: 0.8,
                min_workers: 1,
                max_workers: 3,
                use_cpu_candidate: false,
                forced_sequential: false,
                host_memory_cap_bytes: None,
            },
            DeploymentMode::SessionLimited => Self {
                memory_per_worker_bytes: 250 * MB,
                utilization_threshold: 0.8,
                min_workers: 1,
                max_workers: 1,
                use_cpu_candidate: false,
                forced_sequential: true,
                host_memory_cap_bytes: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(limit: Option<u64>) -> ResourceSnapshot {
        ResourceSnapshot {
            host_memory_bytes: 8_589_934_592,
            free_memory_bytes: 4_294_967_296,
            container_memory_limit: limit,
            cpu_count: 4,
        }
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(
            DeploymentMode::for_snapshot(&snapshot(None), false),
            DeploymentMode::Host
        );
        assert_eq!(
            DeploymentMode::for_snapshot(&snapshot(Some(1 << 30)), false),
            DeploymentMode::Container
        );
        // Session-limited wins even when a cgroup limit is present
        assert_eq!(
            DeploymentMode::for_snapshot(&snapshot(Some(1 << 30)), true),
            DeploymentMode::SessionLimited
        );
    }

    #[test]
    fn test_host_policy_defaults() {
        let policy = SizingPolicy::for_mode(DeploymentMode::Host);
        assert_eq!(policy.memory_per_worker_bytes, 200 * MB);
        assert_eq!(policy.max_workers, 10);
        assert!(policy.use_cpu_candidate);
        assert!(!policy.forced_sequential);
    }

    #[test]
    fn test_container_policy_defaults() {
        let policy = SizingPolicy::for_mode(DeploymentMode::Container);
        assert_eq!(policy.memory_per_worker_bytes, 250 * MB);
        assert_eq!(policy.max_workers, 3);
        assert!(!policy.use_cpu_candidate);
    }

    #[test]
    fn test_session_limited_policy_is_sequential() {
        let policy = SizingPolicy::for_mode(DeploymentMode::SessionLimited);
        assert!(policy.forced_sequential);
        assert_eq!(policy.max_workers, 1);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(DeploymentMode::Host.to_string(), "host");
        assert_eq!(DeploymentMode::Container.to_string(), "container");
        assert_eq!(
            DeploymentMode::SessionLimited.to_string(),
            "session-limited"
        );
    }
}
