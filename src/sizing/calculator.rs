//! Worker-count calculation.
//!
//! Converts a [`ResourceSnapshot`] and a [`SizingPolicy`] into a single
//! worker count. Priority order: manual override, forced-sequential pin,
//! then the minimum of the memory- and CPU-based candidates, clamped to the
//! policy bounds. There is no failure path: every degenerate input collapses
//! to a safe count of at least one.

use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::debug;

use super::policy::{DeploymentMode, SizingPolicy};
use crate::system::{display_bytes, ResourceSnapshot};

/// The outcome of one sizing computation.
///
/// `workers` is the sole programmatic contract; the remaining fields exist
/// for the diagnostic log line and the optional JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct SizingDecision {
    /// Final worker count, always within the policy bounds.
    pub workers: NonZeroUsize,
    /// Deployment mode the policy was selected for.
    pub mode: DeploymentMode,
    /// Which ceiling bounded the arithmetic ("container" or "host").
    pub memory_source: &'static str,
    /// The memory ceiling the arithmetic used, in bytes.
    pub effective_memory_bytes: u64,
    /// Memory-based candidate before clamping, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_candidate: Option<usize>,
    /// CPU-based candidate before clamping, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_candidate: Option<usize>,
    /// True when a manual override decided the count.
    pub overridden: bool,
}

/// Compute the worker count for one process lifetime.
///
/// `override_workers` (when positive) wins over all arithmetic but is still
/// clamped to `policy.max_workers`; zero or negative override values never
/// reach this function (configuration discards them).
pub fn compute(
    snapshot: &ResourceSnapshot,
    mode: DeploymentMode,
    policy: &SizingPolicy,
    override_workers: Option<usize>,
) -> SizingDecision {
    let effective = effective_memory(snapshot, policy);
    let memory_source = snapshot.memory_source();

    if let Some(requested) = override_workers.filter(|&v| v > 0) {
        let workers = requested.min(policy.max_workers);
        debug!(
            "Worker override: requested {}, using {} (max {})",
            requested, workers, policy.max_workers
        );
        return SizingDecision {
            workers: non_zero(workers),
            mode,
            memory_source,
            effective_memory_bytes: effective,
            memory_candidate: None,
            cpu_candidate: None,
            overridden: true,
        };
    }

    if policy.forced_sequential {
        debug!("Forced sequential execution: 1 worker");
        return SizingDecision {
            workers: NonZeroUsize::MIN,
            mode,
            memory_source,
            effective_memory_bytes: effective,
            memory_candidate: None,
            cpu_candidate: None,
            overridden: false,
        };
    }

    let memory_candidate = ((effective as f64 * policy.utilization_threshold)
        / policy.memory_per_worker_bytes as f64)
        .floor() as usize;

    let cpu_candidate = policy
        .use_cpu_candidate
        .then(|| (snapshot.cpu_count as f64 * policy.utilization_threshold).floor() as usize);

    let raw = match cpu_candidate {
        Some(cpu) => memory_candidate.min(cpu),
        None => memory_candidate,
    };

    let workers = raw.max(policy.min_workers).min(policy.max_workers);

    debug!(
        "Auto-tuned workers: {} (source: {}, effective memory: {}, memory candidate: {}, cpu candidate: {:?})",
        workers,
        memory_source,
        display_bytes(effective),
        memory_candidate,
        cpu_candidate
    );

    SizingDecision {
        workers: non_zero(workers),
        mode,
        memory_source,
        effective_memory_bytes: effective,
        memory_candidate: Some(memory_candidate),
        cpu_candidate,
        overridden: false,
    }
}

/// The memory ceiling that actually bounds this process: container limit
/// when constrained, else host free memory (optionally capped).
fn effective_memory(snapshot: &ResourceSnapshot, policy: &SizingPolicy) -> u64 {
    match snapshot.container_memory_limit {
        Some(limit) => limit,
        None => match policy.host_memory_cap_bytes {
            Some(cap) => snapshot.free_memory_bytes.min(cap),
            None => snapshot.free_memory_bytes,
        },
    }
}

fn non_zero(workers: usize) -> NonZeroUsize {
    NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN)
}
