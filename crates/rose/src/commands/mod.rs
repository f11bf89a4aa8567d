//! Command dispatch: bridges CLI args -> poller calls -> output formatting.

pub mod action;
pub mod config_cmd;
pub mod status;
pub mod watch;

use std::sync::Arc;

use rose_core::{ControlKind, ControlSet, Poller, PollerConfig, StatusFields};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    profile: &str,
    config: PollerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Watch(args) = cmd {
        return watch::handle(&config, args, global).await;
    }

    let controls = ControlSet::from_paths(&config.actions);
    let poller = Poller::new(
        config.build_client()?,
        Arc::new(StatusFields::new()),
        config.poll_interval,
    );

    match cmd {
        Command::Status => status::handle(&poller, global).await,
        Command::Decay => {
            action::handle(&poller, &controls, ControlKind::Decay, profile, global).await
        }
        Command::Revert => {
            action::handle(&poller, &controls, ControlKind::Revert, profile, global).await
        }
        Command::Display => {
            action::handle(&poller, &controls, ControlKind::DisplayToggle, profile, global).await
        }
        // Handled before dispatch
        Command::Watch(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
