// src/main.rs
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use status_probe::{
    config::{self, Config, LogFormat, LoggingConfig},
    metrics::MetricsRegistry,
    HealthProbe, StatusView,
};

/// Check an API health endpoint once and report what a status panel would show.
#[derive(Parser, Debug)]
#[command(name = "status-probe", version)]
struct Cli {
    /// YAML or JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the API, e.g. http://localhost:8000
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    /// Give up on the health request after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Append probe metrics in Prometheus text format
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path).await?,
        None => Config::default(),
    };
    config.apply_overrides(cli.api_url.as_deref(), cli.timeout_secs, cli.log_format);
    config.validate()?;

    init_tracing(&config.logging)?;
    info!("Probing {}", config.endpoint.health_url());

    let metrics_registry = MetricsRegistry::new()?;
    let probe = HealthProbe::new(config.endpoint.clone(), config.probe.clone())?;
    let view = StatusView::new(probe).with_metrics(metrics_registry.collector());

    let handle = view.activate();
    info!("Activation {} started", handle.id());
    tokio::select! {
        _ = handle.wait() => {}
        _ = shutdown_signal() => {
            view.teardown().await;
        }
    }

    let report = view.render().await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    if cli.metrics {
        print!("{}", String::from_utf8_lossy(&metrics_registry.gather()?));
    }

    view.teardown().await;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("status_probe={},reqwest=warn", logging.level))
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
