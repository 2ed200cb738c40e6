//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// kube-marker - Kubernetes events as Logz.io timeline markers
#[derive(Parser, Debug)]
#[command(
    name = "kube-marker",
    author,
    version,
    about = "Forward Kubernetes events to Logz.io as markers",
    long_about = "Translates Kubernetes events into Logz.io markers and posts them,\n\
                  one request per event, to the receiver named in the configuration."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "KUBE_MARKER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "KUBE_MARKER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send recorded events through a receiver
    Send(SendArgs),

    /// Validate configuration file without sending anything
    Validate(ValidateArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "exporter.toml",
        env = "KUBE_MARKER_CONFIG"
    )]
    pub config: PathBuf,

    /// Receiver to send through (defaults to the first one)
    #[arg(short, long, env = "KUBE_MARKER_RECEIVER")]
    pub receiver: Option<String>,

    /// Per-event deadline in milliseconds (0 = none)
    #[arg(long, default_value = "10000", env = "KUBE_MARKER_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "KUBE_MARKER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Event files: a JSON event or a JSON array of events
    #[arg(required = true)]
    pub events: Vec<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "exporter.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
