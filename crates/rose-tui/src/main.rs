//! `rose-tui`: live terminal dashboard for a rose device.
//!
//! Shows decay and battery gauges, the display toggle state, and when the
//! last reading arrived. `d`/`r`/`t` fire the device's controls, `R`
//! re-reads immediately, `q` quits.
//!
//! Logs are written to a file (default `/tmp/rose-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod dashboard;
mod event;
mod theme;
mod tui;
mod view;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rose_core::PollerConfig;

use crate::app::App;

/// Terminal dashboard for a rose device.
#[derive(Parser, Debug)]
#[command(name = "rose-tui", version, about)]
struct Cli {
    /// Device profile to use
    #[arg(short = 'p', long, env = "ROSE_PROFILE")]
    profile: Option<String>,

    /// Device base URL (overrides profile)
    #[arg(short = 'S', long, env = "ROSE_SERVER")]
    server: Option<String>,

    /// Seconds between readings (overrides profile)
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/rose-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rose_tui={log_level},rose_core={log_level},rose_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("rose-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the device from flags and the shared config file.
///
/// Priority: `--server` > active profile. A `--server` without a matching
/// profile uses the device's stock paths.
fn build_config(cli: &Cli) -> Result<PollerConfig> {
    let cfg = rose_config::load_config_or_default();
    let profile_name = rose_config::active_profile_name(cli.profile.as_deref(), &cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), cli.server.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => rose_config::Profile::for_server(server),
        (None, None) => {
            return Err(eyre!(
                "no profile '{profile_name}' in {} and no --server given",
                rose_config::config_path().display()
            ));
        }
    };
    if let Some(ref server) = cli.server {
        profile.server.clone_from(server);
    }
    if let Some(secs) = cli.interval {
        profile.poll_interval_secs = secs;
    }
    profile.timeout = profile.timeout.or(Some(cfg.defaults.timeout));

    Ok(rose_config::profile_to_poller_config(&profile)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches modes
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_config(&cli)?;
    info!(
        server = %config.server,
        interval = ?config.poll_interval,
        "starting rose-tui"
    );

    let mut app = App::new(&config)?;
    app.run().await?;

    Ok(())
}
