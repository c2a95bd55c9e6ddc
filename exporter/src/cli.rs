//! CLI argument parsing with clap derive, and process wiring.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use script_exporter_common::{
    DEFAULT_CONFIG_FILE, DEFAULT_LISTEN_ADDR, DEFAULT_LOG_LEVEL, DEFAULT_SHELL,
    DEFAULT_TELEMETRY_PATH,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::application::services::ExecutionEngine;
use crate::infra::{ShellRunner, config, spawn_reaper};
use crate::server::{AppState, PROBE_PATH, router};

/// Prometheus exporter that runs shell scripts as probes
#[derive(Debug, Parser)]
#[command(name = "script_exporter", version)]
pub struct Cli {
    /// Script exporter configuration file
    #[arg(long = "config.file", env = "SCRIPT_EXPORTER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// The address to listen on for HTTP requests
    #[arg(long = "web.listen-address", env = "SCRIPT_EXPORTER_LISTEN_ADDRESS", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", env = "SCRIPT_EXPORTER_TELEMETRY_PATH", default_value = DEFAULT_TELEMETRY_PATH)]
    pub telemetry_path: String,

    /// Shell to execute scripts with
    #[arg(long = "config.shell", env = "SCRIPT_EXPORTER_SHELL", default_value = DEFAULT_SHELL)]
    pub shell: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log.level", env = "SCRIPT_EXPORTER_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

/// Immutable runtime settings, built once from the parsed flags.
#[derive(Debug, Clone)]
pub struct ExporterSettings {
    pub config_file: PathBuf,
    pub listen_address: SocketAddr,
    pub telemetry_path: String,
    pub shell: PathBuf,
}

impl ExporterSettings {
    /// Validate flag values that cannot be checked by clap alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the telemetry path is not absolute or collides
    /// with another route.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        validate_telemetry_path(&cli.telemetry_path)?;
        Ok(Self {
            config_file: cli.config_file.clone(),
            listen_address: cli.listen_address,
            telemetry_path: cli.telemetry_path.clone(),
            shell: cli.shell.clone(),
        })
    }
}

/// Reject telemetry paths the router could not mount.
///
/// # Errors
///
/// Returns an error if `path` does not start with `/`, is `/` itself, or is
/// the probe path.
pub fn validate_telemetry_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        anyhow::bail!("--web.telemetry-path must start with '/': {path}");
    }
    if path == "/" || path == PROBE_PATH {
        anyhow::bail!("--web.telemetry-path must not be '{path}'");
    }
    Ok(())
}

/// Initialise tracing. `RUST_LOG` takes precedence over `--log.level`.
pub fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();
}

impl Cli {
    /// Load configuration, start the reaper and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, the SIGCHLD
    /// handler cannot be installed, or the listener fails.
    pub async fn run(self) -> Result<()> {
        init_tracing(&self.log_level);
        let settings = ExporterSettings::from_cli(&self)?;

        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting script_exporter");

        let scripts = config::load_scripts(&settings.config_file)?;
        tracing::info!("Loaded {} script configurations", scripts.len());

        let runner = ShellRunner::new(&settings.shell);
        let shutdown = CancellationToken::new();
        let reaper = spawn_reaper(runner.children(), shutdown.clone())
            .context("failed to install SIGCHLD handler")?;
        tracing::info!(pid = std::process::id(), init = std::process::id() == 1, "orphan reaper started");

        let state = AppState {
            scripts,
            engine: ExecutionEngine::new(runner),
            metrics_path: settings.telemetry_path.clone(),
        };

        let listener = tokio::net::TcpListener::bind(settings.listen_address)
            .await
            .with_context(|| format!("Error starting HTTP server on {}", settings.listen_address))?;
        tracing::info!("Listening on {}", settings.listen_address);

        let served = axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
            .await
            .context("HTTP server error");

        shutdown.cancel();
        if let Err(e) = reaper.await {
            tracing::warn!(error = %e, "orphan reaper task failed");
        }
        tracing::info!("script_exporter shut down");
        served
    }
}

/// Wait for SIGINT or SIGTERM, then cancel `token`.
async fn shutdown_signal(token: CancellationToken) {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
        () = token.cancelled() => {}
    }

    tracing::info!("received shutdown signal");
    token.cancel();
}
