//! CLI configuration -- thin wrapper around `rose_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --server, --timeout, --output, --color) on top of the
//! config file's `[defaults]` table.

use clap::ValueEnum;

use rose_core::PollerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use rose_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    rose_config::active_profile_name(global.profile.as_deref(), config)
}

/// Fill `--output` and `--color` from `[defaults]` when the flags are absent.
pub fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default("defaults.output", &defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default("defaults.color", &defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Translate a `Profile` + global flags into a `PollerConfig`.
///
/// `--server` beats the profile's URL. Timeout precedence: `--timeout`,
/// then the profile's `timeout`, then `defaults.timeout`.
pub fn resolve_profile(
    profile: &Profile,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<PollerConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(defaults.timeout));

    Ok(rose_config::profile_to_poller_config(&profile)?)
}

/// Build the poller configuration for a device-bound command.
///
/// Uses the active profile when it exists. Without one, `--server` alone is
/// enough: the device's stock paths fill in the rest.
pub fn build_poller_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(String, PollerConfig), CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return Ok((profile_name, resolve_profile(profile, global, &cfg.defaults)?));
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() && global.server.is_none() {
        rose_config::find_profile(cfg, &profile_name)?;
    }

    let server = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let config = resolve_profile(&Profile::for_server(server), global, &cfg.defaults)?;
    Ok((profile_name, config))
}
