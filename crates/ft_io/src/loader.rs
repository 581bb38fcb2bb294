//! Loader: read the local tally-input artifact, parse it strictly, and hand
//! a typed wire structure to the pipeline. No network I/O, no defaults
//! beyond the documented sentinel fallback.
//!
//! Configuration-level validation (budget sign, funding-table coverage,
//! slate shape) happens in ft_pipeline; this module only guarantees the
//! JSON is well-formed and the fields have the declared types.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ballots::RawBallot;
use crate::hasher::sha256_hex;
use crate::IoResult;

/// Funding-tier parameters for one fundable option, as on the wire.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundingSpec {
    pub extended_amount: u64,
    pub standard_amount: u64,
    pub two_year_eligible: bool,
}

/// Full tally-input artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyInput {
    /// Published slate, in ballot-index order.
    pub options: Vec<String>,
    /// Cutoff sentinel name. Defaults to the last slate entry when omitted.
    #[serde(default)]
    pub sentinel: Option<String>,
    /// Signed on the wire so a negative budget is a reportable configuration
    /// error rather than a parse failure.
    pub total_budget: i64,
    /// Funding tiers per fundable option (sentinel excluded).
    pub funding: BTreeMap<String, FundingSpec>,
    pub ballots: Vec<RawBallot>,
}

/// Parse a tally input from a JSON string.
pub fn load_input_from_str(s: &str) -> IoResult<TallyInput> {
    Ok(serde_json::from_str(s)?)
}

/// Read and parse a tally input from a local path; also returns the raw
/// input digest (sha256 hex) for the audit trail.
pub fn load_input_from_path(path: &Path) -> IoResult<(TallyInput, String)> {
    let bytes = fs::read(path)?;
    let digest = sha256_hex(&bytes);
    let input = serde_json::from_slice(&bytes)?;
    Ok((input, digest))
}
