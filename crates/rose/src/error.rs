//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use rose_config::ConfigError;
use rose_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(rose::connection_failed),
        help(
            "Check that the device is powered and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(rose::timeout),
        help("Increase timeout with --timeout or check the device's network link.")
    )]
    Timeout { url: String },

    // ── Device responses ─────────────────────────────────────────────
    #[error("Resource not found: {url}")]
    #[diagnostic(
        code(rose::not_found),
        help("Check status_path and the action paths in your profile.")
    )]
    NotFound { url: String },

    #[error("Device error: {message}")]
    #[diagnostic(code(rose::api_error))]
    ApiError { message: String },

    #[error("Device sent a malformed status: {message}")]
    #[diagnostic(
        code(rose::malformed_status),
        help("The status resource must return {{decay, max_decay, battery}} as JSON.")
    )]
    MalformedStatus { message: String },

    // ── Controls ─────────────────────────────────────────────────────
    #[error("No '{control}' action is configured for profile '{profile}'")]
    #[diagnostic(
        code(rose::control_not_configured),
        help("Set actions.{field} in the profile, e.g. \"/rose/{field}\".")
    )]
    ControlNotConfigured {
        control: String,
        field: String,
        profile: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rose::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rose::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: rose config init --server <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(rose::no_config),
        help(
            "Create a profile with: rose config init --server <URL>\n\
             Or pass --server / set ROSE_SERVER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' already exists")]
    #[diagnostic(code(rose::profile_exists), help("Use --force to replace it."))]
    ProfileExists { name: String },

    #[error(transparent)]
    #[diagnostic(code(rose::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(rose::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ControlNotConfigured { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::ProfileExists { .. }
            | Self::Config(_)
            | Self::ConfigWrite(_) => exit_code::CONFIG,
            Self::NotFound { .. }
            | Self::ApiError { .. }
            | Self::MalformedStatus { .. }
            | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::NotFound { url } => CliError::NotFound { url },
            CoreError::Api { message, .. } => CliError::ApiError { message },
            CoreError::MalformedStatus { message } => CliError::MalformedStatus { message },
            CoreError::InvalidActionUrl { value, reason } => CliError::Validation {
                field: "action".into(),
                reason: format!("{value}: {reason}"),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Serialization(e) => CliError::ConfigWrite(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
