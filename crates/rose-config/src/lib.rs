//! Shared configuration for the rose CLI and dashboard.
//!
//! TOML profiles (one per device), `ROSE_` environment overrides, and
//! translation to `rose_core::PollerConfig`. Both binaries depend on this
//! crate; the CLI adds flag-aware wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rose_core::{ActionPaths, ActionUrl, PollerConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and dashboard.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named device profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Device base URL (e.g., "http://192.168.1.50:8080").
    pub server: String,

    /// Status resource path.
    #[serde(default = "default_status_path")]
    pub status_path: String,

    /// Seconds between repeating refreshes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Action resource paths. An empty string disables that control.
    #[serde(default)]
    pub actions: Actions,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    /// A profile for `server` with the device's stock paths.
    pub fn for_server(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            status_path: default_status_path(),
            poll_interval_secs: default_poll_interval_secs(),
            actions: Actions::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_status_path() -> String {
    "/rose/data".into()
}
fn default_poll_interval_secs() -> u64 {
    rose_core::DEFAULT_POLL_INTERVAL.as_secs()
}

/// Action resource paths of a profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Actions {
    #[serde(default = "default_decay_path")]
    pub decay: String,

    #[serde(default = "default_revert_path")]
    pub revert: String,

    #[serde(default = "default_display_path")]
    pub display: String,
}

impl Default for Actions {
    fn default() -> Self {
        Self {
            decay: default_decay_path(),
            revert: default_revert_path(),
            display: default_display_path(),
        }
    }
}

fn default_decay_path() -> String {
    "/rose/decay".into()
}
fn default_revert_path() -> String {
    "/rose/revert".into()
}
fn default_display_path() -> String {
    "/rose/display".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "rose", "rose").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rose");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Nested keys are reachable through `__`, e.g. `ROSE_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROSE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Resolve the active profile name: explicit override, then the config's
/// default, then `"default"`.
pub fn active_profile_name(requested: Option<&str>, config: &Config) -> String {
    requested
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Look up a profile by name.
pub fn find_profile<'a>(config: &'a Config, name: &str) -> Result<&'a Profile, ConfigError> {
    config
        .profiles
        .get(name)
        .ok_or_else(|| ConfigError::ProfileNotFound {
            name: name.into(),
            available: config.profiles.keys().cloned().collect(),
        })
}

/// Build a `PollerConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_poller_config(profile: &Profile) -> Result<PollerConfig, ConfigError> {
    let server: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    if profile.poll_interval_secs == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval_secs".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = PollerConfig::new(server);
    config.status_path.clone_from(&profile.status_path);
    config.poll_interval = Duration::from_secs(profile.poll_interval_secs);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    config.actions = ActionPaths {
        decay: action_path("actions.decay", &profile.actions.decay)?,
        revert: action_path("actions.revert", &profile.actions.revert)?,
        display: action_path("actions.display", &profile.actions.display)?,
    };
    Ok(config)
}

fn action_path(field: &str, value: &str) -> Result<Option<ActionUrl>, ConfigError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e: rose_core::CoreError| ConfigError::Validation {
            field: field.into(),
            reason: e.to_string(),
        })
}
