use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worker_sizer::config::{Config, LoggingConfig, OutputFormat, SizingConfig};
use worker_sizer::sizing::compute;
use worker_sizer::system::{display_bytes, ResourceSnapshot};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging before the rest of the configuration so that
    // discarded-override and probe diagnostics are visible.
    let logging = LoggingConfig::from_env()?;

    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_new(&logging.filter)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("worker_sizer=info")),
    );
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let sizing = SizingConfig::from_env()?;
    let config = Config { sizing, logging };
    config.log_summary();

    // One-shot: detect once, compute once, print, exit.
    let snapshot = ResourceSnapshot::detect();
    let mode = config.sizing.select_mode(&snapshot);
    let policy = config.sizing.policy_for(mode);
    let decision = compute(&snapshot, mode, &policy, config.sizing.override_workers);

    info!(
        "Worker sizing: {} workers (mode: {}, memory source: {}, effective memory: {}, cpus: {})",
        decision.workers,
        decision.mode,
        decision.memory_source,
        display_bytes(decision.effective_memory_bytes),
        snapshot.cpu_count
    );

    match config.sizing.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&decision)?),
        OutputFormat::Plain => println!("{}", decision.workers),
    }

    Ok(())
}
