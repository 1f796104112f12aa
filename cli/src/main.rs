//! `custody` is the command-line front end for the document custody engine.
//!
//! Every subcommand maps to one boundary operation of the `Custodian` and
//! prints its result as pretty JSON on stdout. Failures go to stderr with
//! their error kind and exit with status 1.
//!
//! Usage:
//!   custody submit ./report.pdf
//!   custody verify DOC-1718000000000-0
//!   custody verify-all
//!   custody access alice
//!   custody ledger
//!   custody registry
//!   custody check-chain

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use custody_contracts::{
    document::DocumentId,
    error::{CustodyError, CustodyResult},
};
use custody_service::{CustodyConfig, Custodian};

/// Configuration file picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILE: &str = "custody.toml";

// ── CLI definition ────────────────────────────────────────────────────────────

/// Document custody: fingerprint registry, integrity checks and a
/// hash-chained audit ledger.
#[derive(Parser)]
#[command(
    name = "custody",
    about = "Document integrity and clearance custody engine",
    long_about = "Registers document fingerprints, verifies stored documents against them,\n\
                  records clearance decisions, and keeps every check in a SHA-256 hash-chained ledger."
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a file and register its fingerprint.
    Submit {
        path: PathBuf,
        /// Name to register instead of the file's own name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Verify one registered document against its stored bytes.
    Verify { document_id: String },
    /// Verify every registered document.
    VerifyAll,
    /// Obtain and record a clearance decision for a user.
    Access { user: String },
    /// Print every ledger entry.
    Ledger,
    /// Print every registry record.
    Registry,
    /// Recompute the ledger hash chain and report the first break.
    CheckChain,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error [{}]: {}", e.kind(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CustodyResult<()> {
    let config = load_config(cli.config.as_deref())?;
    let custodian = Custodian::open(&config)?;

    match cli.command {
        Command::Submit { path, name } => {
            let name = match name {
                Some(name) => name,
                None => file_name(&path)?,
            };
            let mut file = File::open(&path).map_err(|e| CustodyError::Io {
                reason: format!("cannot open '{}': {}", path.display(), e),
            })?;
            print_json(&custodian.submit_document(&name, &mut file)?)
        }
        Command::Verify { document_id } => {
            print_json(&custodian.request_verification(&DocumentId::new(document_id))?)
        }
        Command::VerifyAll => print_json(&custodian.verify_all()?),
        Command::Access { user } => print_json(&custodian.request_clearance(&user)?),
        Command::Ledger => print_json(&custodian.fetch_ledger()?),
        Command::Registry => print_json(&custodian.fetch_registry()?),
        Command::CheckChain => print_json(&custodian.check_ledger()?),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(explicit: Option<&Path>) -> CustodyResult<CustodyConfig> {
    match explicit {
        Some(path) => CustodyConfig::from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            debug!(path = DEFAULT_CONFIG_FILE, "using configuration from working directory");
            CustodyConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => Ok(CustodyConfig::default()),
    }
}

fn file_name(path: &Path) -> CustodyResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CustodyError::InvalidInput {
            reason: format!("'{}' does not name a file", path.display()),
        })
}

fn print_json<T: Serialize>(value: &T) -> CustodyResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| CustodyError::Io {
        reason: format!("failed to render output: {}", e),
    })?;
    println!("{}", rendered);
    Ok(())
}
