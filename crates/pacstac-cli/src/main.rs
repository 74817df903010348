//! PacStac CLI - offline attestation verification against a JWKS.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{canonicalize, resolve_key, verify};

#[derive(Parser)]
#[command(name = "pacstac")]
#[command(about = "Offline PacStac attestation verification CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (repeat for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an attestation signature against a JWKS
    Verify {
        /// Attestation JSON file (`-` for stdin)
        attestation: String,
        /// JWKS JSON file (`-` for stdin)
        #[arg(long)]
        jwks: String,
        /// Output the result as JSON
        #[arg(long)]
        json: bool,
        /// Exit with error code if verification fails
        #[arg(long)]
        strict: bool,
    },
    /// Show canonical JSON for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Show the Ed25519 public key a JWKS publishes for a kid
    ResolveKey {
        /// Key id to look up
        kid: String,
        /// JWKS JSON file (`-` for stdin)
        #[arg(long)]
        jwks: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8, json_logs: bool) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Verify {
            attestation,
            jwks,
            json,
            strict,
        } => verify::run(attestation, jwks, json, strict),
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::ResolveKey { kid, jwks, json } => resolve_key::run(kid, jwks, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
