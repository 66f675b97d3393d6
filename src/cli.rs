//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, health), and their associated argument
//! structs. Every proxy option has an environment variable equivalent
//! for container deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_LISTEN_ADDRESS: &str = "localhost:8080";
pub const DEFAULT_SCRIPT_URL: &str = "https://plausible.io/js/%s";
pub const DEFAULT_API_URL: &str = "https://plausible.io/api/event";

#[derive(Parser)]
#[command(
    name = "beaconpost",
    version,
    about = "First-party reverse proxy for Plausible analytics",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        CORS_ORIGINS=https://example.com beaconpost run     Start on localhost:8080\n  \
        beaconpost validate --cors-origins https://example.com\n"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Validate the proxy options without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

/// Options shared by `run` and `validate`.
#[derive(Args, Clone, Debug)]
pub struct ProxyArgs {
    /// Listen address (host:port)
    #[arg(long, env = "LISTEN_ADDRESS", default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// Script URL template; `%s` is replaced by the requested script name
    #[arg(long, env = "PLAUSIBLE_SCRIPT_URL", default_value = DEFAULT_SCRIPT_URL)]
    pub script_url: String,

    /// Event API URL
    #[arg(long, env = "PLAUSIBLE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    // -- CORS --
    /// Allowed origins, comma-separated
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        help_heading = "CORS"
    )]
    pub cors_origins: Vec<String>,

    /// Enable the CORS layer (requires --cors-origins)
    #[arg(
        long,
        env = "CORS_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set,
        help_heading = "CORS"
    )]
    pub cors_enabled: bool,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        beaconpost run --cors-origins https://example.com           Local defaults\n  \
        beaconpost run --listen-address 0.0.0.0:8080 --json         Container mode\n  \
        beaconpost run --cors-enabled false                         Same-origin deployment")]
pub struct RunArgs {
    #[command(flatten)]
    pub proxy: ProxyArgs,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub proxy: ProxyArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
