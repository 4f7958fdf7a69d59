//! # junction CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use junction_cli::check::{run_check_rules, CheckRulesArgs};
use junction_cli::geometry::{run_geometry, GeometryArgs};
use junction_cli::replay::{run_replay, ReplayArgs};

/// Junction: right-of-way arbitration for a single uncontrolled intersection.
///
/// Replays recorded overlap events through a monitor, dumps compiled
/// geometry facts, and checks traffic-rule programs.
#[derive(Parser, Debug)]
#[command(name = "junction", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a monitor configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay recorded overlap events and print every solve.
    Replay(ReplayArgs),

    /// Print the geometry facts compiled from an intersection description.
    Geometry(GeometryArgs),

    /// Parse a rule program and check the builtin oracle can evaluate it.
    CheckRules(CheckRulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("junction CLI starting");

    let result = match cli.command {
        Commands::Replay(args) => run_replay(&args, cli.config.as_deref()),
        Commands::Geometry(args) => run_geometry(&args),
        Commands::CheckRules(args) => run_check_rules(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
