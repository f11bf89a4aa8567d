//! `rose decay | revert | display`: fire a control, then refresh once.

use tracing::warn;

use rose_api::RoseClient;
use rose_core::{ControlKind, ControlSet, Poller, StatusFields};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::status;

pub async fn handle(
    poller: &Poller<RoseClient, StatusFields>,
    controls: &ControlSet,
    kind: ControlKind,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let control = controls
        .get(kind)
        .ok_or_else(|| CliError::ControlNotConfigured {
            control: kind.to_string(),
            field: profile_field(kind).into(),
            profile: profile.into(),
        })?;

    let outcome = poller.activate(control).await;

    // The refresh has already happened either way; a failed request only
    // warrants a warning.
    match outcome.action {
        Ok(()) => {
            if !global.quiet {
                eprintln!("{} sent", kind.label());
            }
        }
        Err(ref e) => {
            warn!(control = %kind, error = %e, "action request failed");
            if !global.quiet {
                eprintln!("warning: {} request failed: {e}", kind.label());
            }
        }
    }

    outcome.refresh?;
    status::print_fields(poller.view(), global);
    Ok(())
}

/// Key under `[profiles.NAME.actions]` holding this control's path.
fn profile_field(kind: ControlKind) -> &'static str {
    match kind {
        ControlKind::Decay => "decay",
        ControlKind::Revert => "revert",
        ControlKind::DisplayToggle => "display",
    }
}
