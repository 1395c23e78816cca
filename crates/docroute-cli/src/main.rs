//! # docroute CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docroute_cli::identifier::{run_parse_id, ParseIdArgs};
use docroute_cli::lookup::{run_lookup, LookupArgs};
use docroute_cli::submit::{run_submit, SubmitArgs};

/// Route business documents to their receivers' access points.
#[derive(Parser, Debug)]
#[command(name = "docroute", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file. Overrides DOCROUTE_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a URI-encoded identifier and print its parts.
    ParseId(ParseIdArgs),

    /// Look up a participant and document type in the directory.
    Lookup(LookupArgs),

    /// Validate, look up, and send an outgoing-message document.
    Submit(SubmitArgs),
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
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::ParseId(args) => run_parse_id(args),
        Commands::Lookup(args) => run_lookup(args, config),
        Commands::Submit(args) => run_submit(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
