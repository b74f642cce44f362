//! # vsure — Verisure to Domoticz bridge
//!
//! Composition root that wires all adapters together and runs the selected
//! trigger mode.
//!
//! ## Responsibilities
//! - Parse the command line and load configuration (file, env vars)
//! - Initialize logging
//! - Construct the Domoticz and Verisure clients and the sync service
//! - Run one pass, poll on an interval, or watch the mailbox
//! - Stop long-running modes on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;

use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vsure_adapter_domoticz::{DomoticzClient, DomoticzError};
use vsure_adapter_imap::{ImapError, ImapNotifier};
use vsure_adapter_verisure::{VerisureClient, VerisureError};
use vsure_app::services::sync_service::SyncService;
use vsure_app::trigger;
use vsure_domain::error::VsureError;

use crate::cli::{Cli, Mode};
use crate::config::{Config, ConfigError, LogLevel};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to set up the Domoticz client")]
    Domoticz(#[from] DomoticzError),
    #[error("failed to set up the Verisure client")]
    Verisure(#[from] VerisureError),
    #[error("failed to open the mailbox")]
    Mailbox(#[from] ImapError),
    #[error(transparent)]
    Sync(#[from] VsureError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mode = cli.mode();

    let config = match Config::load(&cli.config, mode == Mode::Watch) {
        Ok(config) => config,
        Err(ConfigError::TemplateWritten(path)) => {
            init_tracing(cli.log, LogLevel::Warning);
            tracing::warn!(
                path = %path.display(),
                "config file not found, wrote a template; fill it in and run again"
            );
            return ExitCode::FAILURE;
        }
        Err(err) => {
            init_tracing(cli.log, LogLevel::Warning);
            tracing::error!(error = %error_chain(&err), "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.log, config.global.loglevel);

    match run(mode, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %error_chain(&err), "vsure stopped");
            ExitCode::FAILURE
        }
    }
}

/// Precedence: `--log`, then `VSURE_LOG`, then `RUST_LOG`, then the
/// configured level.
fn init_tracing(explicit: Option<LogLevel>, configured: LogLevel) {
    let filter = match explicit {
        Some(level) => EnvFilter::new(level.directives()),
        None => EnvFilter::try_from_env("VSURE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(configured.directives())),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(mode: Mode, config: Config) -> Result<(), AppError> {
    let timezone = config.hub_timezone()?;
    let sensors = config.sensor_index_map()?;
    let hub = DomoticzClient::new(&config.domoticz, timezone)?;
    let provider = VerisureClient::new(config.verisure)?;
    let service = SyncService::new(provider, hub, sensors);

    tracing::info!(?mode, hub = %config.domoticz.base_url(), "vsure starting");

    match mode {
        Mode::Sync => {
            trigger::run_once(&service).await?;
        }
        Mode::Poll { interval } => {
            tokio::select! {
                () = trigger::run_interval(&service, Duration::from_secs(interval)) => {}
                () = shutdown_signal() => {}
            }
        }
        Mode::Watch => {
            let Some(email) = config.email.as_ref() else {
                return Err(ConfigError::MissingSection("email").into());
            };
            let mut notifier = ImapNotifier::connect(email).await?;
            tokio::select! {
                result = trigger::run_on_notifications(&service, &mut notifier) => result?,
                () = shutdown_signal() => {}
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!(error = %err, "cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Render an error and all of its sources on one line.
fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
