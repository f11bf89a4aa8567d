//! Clap derive structures for the `rose` CLI.
//!
//! Kept free of crate-internal imports: `build.rs` includes this file
//! directly to render man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rose -- read and drive a rose device from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "rose",
    version,
    about = "Read and control a rose device from the command line",
    long_about = "Polls the device's status resource (decay, battery, display) and\n\
        fires its action resources (decay, revert, display toggle).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "ROSE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device base URL (overrides profile)
    #[arg(long, short = 'S', env = "ROSE_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format [default: config `defaults.output`, else table]
    #[arg(long, short = 'o', env = "ROSE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: config `defaults.color`, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds [default: profile, then `defaults.timeout`]
    #[arg(long, env = "ROSE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Effective output format once config defaults have been applied.
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    /// Effective color mode once config defaults have been applied.
    pub fn color(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the device status once
    #[command(alias = "s")]
    Status,

    /// Poll the device until interrupted, printing each reading
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Fire the decay action, then re-read the status
    Decay,

    /// Fire the revert action, then re-read the status
    Revert,

    /// Toggle the external display, then re-read the status
    Display,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between readings (overrides profile, default 600)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile in the config file
    Init(InitArgs),

    /// Show the current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Device base URL, e.g. http://192.168.1.50:8080
    #[arg(long)]
    pub server: String,

    /// Name of the profile to create (default: --profile or "default")
    #[arg(long)]
    pub name: Option<String>,

    /// Seconds between readings in watch mode
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Make this the default profile
    #[arg(long)]
    pub set_default: bool,

    /// Replace an existing profile with the same name
    #[arg(long)]
    pub force: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
