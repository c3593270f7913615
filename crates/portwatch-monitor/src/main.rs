//! CLI entry point for the portwatch monitor daemon.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use portwatch_core::ConfigStore;
use portwatch_intel::ShodanClient;
use portwatch_monitor::monitor::Monitor;
use portwatch_monitor::registry::ServiceRegistry;
use portwatch_monitor::{reconcile, settings, status};
use portwatch_notify::{Notifier, SmtpNotifier};

#[derive(Parser)]
#[command(name = "portwatch")]
#[command(about = "Watches network ranges for newly appearing services")]
struct Cli {
    /// Path to the monitor config file.
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Persist newly discovered services back into the config file.
    #[arg(long)]
    learn: bool,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,

    /// Print account and alert status, then exit.
    #[arg(long)]
    status: bool,

    /// Settings file prefix (default: portwatch).
    #[arg(short, long, default_value = "portwatch")]
    settings: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt().with_env_filter(filter).init();

    let settings = settings::load(&cli.settings)?;

    let store = ConfigStore::new(&cli.config);
    let config = store
        .load()
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    tracing::info!(
        path = %cli.config,
        ranges = config.watch_ranges.len(),
        known = config.known.len(),
        learning = cli.learn,
        "Config loaded"
    );

    let intel = ShodanClient::new(&settings.api_base, &settings.stream_base, &config.api_key)?;

    status::report(&intel).await;
    if cli.status {
        return Ok(());
    }

    reconcile::reconcile_alerts(&intel, &config.ranges()).await?;

    let notifier = SmtpNotifier::new(&config.notification, settings.smtp_port)?;
    let registry = ServiceRegistry::new(config, store, cli.learn);

    if let Err(e) = notifier.notify_startup(registry.services(), cli.learn).await {
        tracing::warn!(error = %e, "Failed to send startup notification");
    }

    let cooldown = Duration::from_secs(settings.cooldown_secs);
    let mut monitor = Monitor::new(intel, notifier, registry, cooldown);

    // Loops until the process is killed; returns only on a fatal
    // stream-open failure.
    monitor.run().await?;
    Ok(())
}
