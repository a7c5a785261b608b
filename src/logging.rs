//! Logging flags and filter construction

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Targets that make up our own logs
const OUR_CRATES: &[&str] = &["gridwm"];

/// Logging controls shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace
    #[arg(long, global = true, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug
    #[arg(long, global = true, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single log level (error|warn|info|debug|trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive, e.g. "gridwm::platform=trace"
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

/// Builds a directive that sets `level` for all of our targets
pub fn level_spec_for(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    OUR_CRATES
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Computes the filter spec with precedence:
/// `--log-filter`, `--trace`, `--debug`, `--log-level`, `RUST_LOG`, then
/// `info` for our targets.
pub fn compute_spec(args: &LogArgs) -> String {
    if let Some(spec) = &args.log_filter {
        return spec.clone();
    }
    if args.trace {
        return level_spec_for("trace");
    }
    if args.debug {
        return level_spec_for("debug");
    }
    if let Some(level) = &args.log_level {
        return level_spec_for(level);
    }
    env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info"))
}

pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}
