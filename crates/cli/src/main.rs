mod metrics;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use form22_core::{
    load_config, load_config_from_env, validate_config, Code128Encoder, Config,
    JobOrchestrator, PochtaResolver, RunPlan, TemplateAssembler, TrackingResolver,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Used when `FORM22_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "form22.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = load();

    // Initialize logging
    let quiet = config.as_ref().map(|c| c.run.quiet).unwrap_or(false);
    let default_filter = if quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config?;
    validate_config(&config).context("Configuration validation failed")?;
    info!(version = VERSION, "form22 starting");

    let extra_codes: Vec<String> = std::env::args().skip(1).collect();
    let plan = RunPlan::from_config(&config.run, &extra_codes);
    debug!(?plan, "Run planned");

    let session = config
        .recipient
        .to_field_map(Local::now().date_naive());

    let resolver: Arc<dyn TrackingResolver> = Arc::new(
        PochtaResolver::new(config.resolver.clone(), config.run.offline)
            .context("Failed to create tracking resolver")?,
    );
    info!(
        "Using resolver: {} (offline: {})",
        resolver.name(),
        resolver.is_offline()
    );

    let assembler = Arc::new(TemplateAssembler::new(config.template.clone()));
    info!("Template directory: {:?}", config.template.dir);
    info!("Output directory: {:?}", config.run.output_dir);

    let orchestrator = JobOrchestrator::new(
        config.orchestrator.clone(),
        resolver,
        Arc::new(Code128Encoder::default()),
        assembler,
        config.run.output_dir.clone(),
    );

    metrics::NOTICES_REQUESTED.set(plan.tracking_codes.len().max(1) as i64);
    let summary = orchestrator.run(plan, session).await;

    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(_) => info!("Created {}", outcome.output.display()),
            Err(e) => warn!("Failed {}: {}", outcome.output.display(), e),
        }
    }
    if summary.timed_out {
        warn!(
            "{} notice(s) still being written when the run ended",
            summary.unfinished()
        );
    }
    debug!("Metrics:\n{}", metrics::encode_metrics());

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} notice(s) could not be generated",
            summary.failed,
            summary.submitted
        );
    }

    Ok(())
}

/// Load configuration from `FORM22_CONFIG`, `form22.toml`, or the environment.
fn load() -> Result<Config> {
    match std::env::var("FORM22_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                load_config(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))
            } else {
                load_config_from_env().context("Failed to load config from environment")
            }
        }
    }
}
