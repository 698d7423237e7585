use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use logger_redacted::LoggerConfig;
use tokio::signal;
use tracing::info;

use patient_server::{create_app, PatientServer};

/// Patient registry HTTP server
#[derive(Parser, Debug)]
#[command(name = "patient-server")]
#[command(about = "Patient demographics web UI and REST API")]
struct Args {
    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, env = "PATIENT_REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Server bind address, overrides the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Server port, overrides the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // An explicitly named file must exist; without one, defaults and the
    // environment are enough.
    let mut config = config_engine::load(args.config.as_deref(), args.config.is_some())
        .context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let redactor = logger_redacted::init(
        &LoggerConfig::default()
            .with_level(level)
            .with_json(config.logging.json)
            .with_redaction(config.logging.redact_pii),
    )
    .context("Failed to initialise logging")?;

    info!("Starting {}", config.server.name);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(backend = ?config.database.backend, "Patient store");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let server = PatientServer::new(config, redactor).await?;
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Patient registry running on http://{}", addr);
    info!("Health check available at: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Patient registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
