//! Configuration module for worker_sizer.
//!
//! This module provides centralized configuration loading from environment
//! variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use worker_sizer::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Override: {:?}", config.sizing.override_workers);
//! ```

mod error;
mod logging;
mod parse;
mod sizing;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use sizing::{OutputFormat, SizingConfig};

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Sizing configuration.
    pub sizing: SizingConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            sizing: SizingConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        use crate::system::display_bytes;

        info!("Configuration loaded:");

        if let Some(workers) = self.sizing.override_workers {
            info!("  Worker override: {}", workers);
        }

        if let Some(bytes) = self.sizing.memory_per_worker_bytes {
            info!("  Memory per worker: {}", display_bytes(bytes));
        }

        if let Some(max) = self.sizing.max_workers {
            info!("  Max workers: {}", max);
        }

        if let Some(cap) = self.sizing.host_memory_cap_bytes {
            info!("  Host memory cap: {}", display_bytes(cap));
        }

        if self.sizing.session_limited {
            info!("  Session-limited target: configured");
        }

        info!("  Output format: {:?}", self.sizing.output_format);
    }
}
