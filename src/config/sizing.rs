//! Sizing configuration.
//!
//! Tuning knobs for the worker calculation, loaded from environment
//! variables. The manual override (`TEST_WORKERS`) never fails: non-numeric
//! or non-positive values are discarded in favor of automatic calculation.
//! Explicitly-set tuning constants, by contrast, are validated and reported
//! at startup when malformed.

use tracing::debug;

use super::parse::{env_opt, env_or};
use super::ConfigError;
use crate::sizing::{DeploymentMode, SizingPolicy};
use crate::system::ResourceSnapshot;

const MB: u64 = 1024 * 1024;

/// How the binary reports the result on stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain integer (the programmatic contract).
    #[default]
    Plain,
    /// Full decision as a JSON object, for operators.
    Json,
}

/// Sizing configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct SizingConfig {
    /// Manual worker-count override (TEST_WORKERS), already validated.
    pub override_workers: Option<usize>,
    /// Per-worker footprint override in bytes (MEMORY_PER_WORKER_MB).
    pub memory_per_worker_bytes: Option<u64>,
    /// Ceiling override (MAX_WORKERS).
    pub max_workers: Option<usize>,
    /// Conservative host free-memory cap in bytes (HOST_MEMORY_CAP_MB).
    pub host_memory_cap_bytes: Option<u64>,
    /// True when remote-grid credentials are configured; the target permits
    /// one concurrent session, so execution is forced sequential.
    pub session_limited: bool,
    /// Output format for the binary (OUTPUT_FORMAT).
    pub output_format: OutputFormat,
}

impl SizingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            override_workers: parse_override(env_opt("TEST_WORKERS").as_deref()),
            memory_per_worker_bytes: parse_mb_var("MEMORY_PER_WORKER_MB")?,
            max_workers: parse_max_workers()?,
            host_memory_cap_bytes: parse_mb_var("HOST_MEMORY_CAP_MB")?,
            session_limited: env_opt("GRID_URL").is_some() && env_opt("GRID_ACCESS_KEY").is_some(),
            output_format: parse_output_format(&env_or("OUTPUT_FORMAT", "plain")),
        })
    }

    /// Select the deployment mode for the detected resources.
    pub fn select_mode(&self, snapshot: &ResourceSnapshot) -> DeploymentMode {
        DeploymentMode::for_snapshot(snapshot, self.session_limited)
    }

    /// Build the policy for a mode, with configured overrides applied.
    pub fn policy_for(&self, mode: DeploymentMode) -> SizingPolicy {
        let mut policy = SizingPolicy::for_mode(mode);

        if let Some(bytes) = self.memory_per_worker_bytes {
            policy.memory_per_worker_bytes = bytes;
        }
        if let Some(max) = self.max_workers {
            policy.max_workers = max;
        }
        if self.host_memory_cap_bytes.is_some() {
            policy.host_memory_cap_bytes = self.host_memory_cap_bytes;
        }

        policy
    }
}

/// Parse the manual override. Non-numeric or non-positive values are
/// ignored, never an error.
fn parse_override(raw: Option<&str>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            debug!("Ignoring invalid TEST_WORKERS value: {:?}", raw);
            None
        }
    }
}

/// Parse a megabyte-valued tuning variable into bytes.
fn parse_mb_var(key: &str) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = env_opt(key) else {
        return Ok(None);
    };

    let mb: u64 = raw.parse().map_err(|e| ConfigError::Parse {
        key: key.into(),
        value: raw.clone(),
        error: format!("{e}"),
    })?;

    if mb == 0 {
        return Err(ConfigError::Invalid {
            key: key.into(),
            message: "cannot be zero".into(),
        });
    }

    Ok(Some(mb * MB))
}

fn parse_max_workers() -> Result<Option<usize>, ConfigError> {
    let Some(raw) = env_opt("MAX_WORKERS") else {
        return Ok(None);
    };

    let max: usize = raw.parse().map_err(|e| ConfigError::Parse {
        key: "MAX_WORKERS".into(),
        value: raw.clone(),
        error: format!("{e}"),
    })?;

    if max == 0 {
        return Err(ConfigError::Invalid {
            key: "MAX_WORKERS".into(),
            message: "worker ceiling cannot be zero".into(),
        });
    }

    Ok(Some(max))
}

fn parse_output_format(raw: &str) -> OutputFormat {
    match raw.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Plain, // "plain" or any other value defaults to Plain
    }
}
