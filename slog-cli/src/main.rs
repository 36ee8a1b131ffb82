//! ## slog-cli
//! **Command-line front end for the structured logger**
//!
//! `slog emit` writes one line built from command-line fields, which makes
//! the logger usable from shell scripts. `slog bench` measures the
//! formatting path against a metered null sink.

use clap::Parser;
use slog_telemetry::logging::DiagnosticsLogger;

mod commands;

use commands::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    DiagnosticsLogger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Emit(args) => commands::run_emit(args),
        Commands::Bench(args) => commands::run_bench(args),
    }
}
