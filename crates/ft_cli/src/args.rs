//! CLI argument surface: types, validation, and the local-path rule.
//!
//! Rules:
//! - The input is a local file; any explicit URI scheme (http://, file://)
//!   is rejected before touching the filesystem.
//! - `--render` accepts up to two formats (json, text); omitting it skips
//!   report rendering.
//! - `--validate-only` loads and checks the input without running the tally.

use clap::Parser;
use std::path::{Path, PathBuf};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ft",
    disable_help_subcommand = true,
    about = "Offline, deterministic funding-vote tally"
)]
pub struct Args {
    /// Tally input JSON (slate, budget, funding table, ballots).
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory for artifacts (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Report format(s) to emit alongside result.json. Omit to skip rendering.
    #[arg(long, value_parser = ["json", "text"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Load and validate the input only; do not run the tally.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress non-essential stdout output.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short and stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Reject any explicit URI scheme (http://, https://, file://, ...).
fn is_local_path(p: &Path) -> bool {
    let s = p.to_string_lossy();
    !s.contains("://")
}

/// Parse argv and apply filesystem-independent checks. Whether the input
/// file exists is the loader's concern; it surfaces as an I/O error with the
/// I/O exit code, never as a validation failure.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    check(&args)?;
    Ok(args)
}

fn check(args: &Args) -> Result<(), CliError> {
    if !is_local_path(&args.input) {
        return Err(CliError::NonLocalPath(args.input.to_string_lossy().into_owned()));
    }
    if !is_local_path(&args.out) {
        return Err(CliError::NonLocalPath(args.out.to_string_lossy().into_owned()));
    }
    Ok(())
}
