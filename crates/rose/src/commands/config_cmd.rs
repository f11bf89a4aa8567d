//! Config subcommand handlers.

use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Profile listing ─────────────────────────────────────────────────

#[derive(Serialize)]
struct ProfileSummary {
    name: String,
    server: String,
    poll_interval_secs: u64,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Interval")]
    interval: String,
}

fn profile_row(p: &ProfileSummary) -> ProfileRow {
    ProfileRow {
        marker: if p.default { "*" } else { "" },
        name: p.name.clone(),
        server: p.server.clone(),
        interval: humantime::format_duration(Duration::from_secs(p.poll_interval_secs))
            .to_string(),
    }
}

fn summaries(cfg: &Config) -> Vec<ProfileSummary> {
    cfg.profiles
        .iter()
        .map(|(name, p)| ProfileSummary {
            name: name.clone(),
            server: p.server.clone(),
            poll_interval_secs: p.poll_interval_secs,
            default: cfg.default_profile.as_deref() == Some(name.as_str()),
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init(init) => init_profile(init, global),

        ConfigCommand::Show => {
            let cfg = rose_config::load_config()?;
            let toml_text = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                global.output(),
                &cfg,
                |_| toml_text.trim_end().to_owned(),
                |_| toml_text.trim_end().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::List => {
            let cfg = rose_config::load_config()?;
            let profiles = summaries(&cfg);
            if profiles.is_empty() && !global.quiet {
                eprintln!("No profiles configured. Create one with: rose config init --server <URL>");
                return Ok(());
            }
            let out = output::render_list(global.output(), &profiles, profile_row, |p| {
                p.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn init_profile(init: InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();
    let mut cfg = rose_config::load_config_from(&path)?;

    let name = init
        .name
        .or_else(|| global.profile.clone())
        .unwrap_or_else(|| "default".into());
    if cfg.profiles.contains_key(&name) && !init.force {
        return Err(CliError::ProfileExists { name });
    }

    let mut profile = Profile::for_server(init.server);
    if let Some(secs) = init.poll_interval {
        profile.poll_interval_secs = secs;
    }
    // Reject a profile the device commands could not use.
    rose_config::profile_to_poller_config(&profile)?;

    if init.set_default || cfg.profiles.is_empty() {
        cfg.default_profile = Some(name.clone());
    }
    cfg.profiles.insert(name.clone(), profile);
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!("Profile '{name}' written to {}", path.display());
    }
    Ok(())
}
