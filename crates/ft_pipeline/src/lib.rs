//! ft_pipeline — fixed-order orchestration of one funding-vote tally.
//!
//! Stages, in order:
//!   VALIDATE → NORMALIZE → TABULATE → RANK → ALLOCATE → ASSEMBLE → HASH
//!
//! The pipeline is a pure function of its input artifact: same input, same
//! `TallyOutcome`, byte for byte. All stage outputs are deterministic and the
//! final result carries a content-derived ID over its canonical JSON bytes.

#![forbid(unsafe_code)]

use ft_algo::{allocate_budget, rank_copeland, tally_pairwise, validate_pairwise_complete};
use ft_core::VotingPower;
use ft_io::ballots::normalize_ballots;
use ft_io::hasher::result_id_from_canonical;
use ft_io::loader::TallyInput;
use thiserror::Error;

pub mod build_result;
pub mod validate;

pub use build_result::{BallotAudit, BudgetTotals, OptionRow, PairwiseRow, TallyResult};
pub use validate::{validate_input, ConfigError, ValidatedConfig};

/// Errors surfaced by the pipeline.
///
/// Configuration problems keep their own variant so callers can map them to
/// a distinct exit code; everything that happens after validation is either
/// an internal invariant breach or a serialization failure, both of which
/// indicate a defect rather than bad input.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("result assembly failed: {0}")]
    Build(String),
}

impl From<ft_io::IoError> for TallyError {
    fn from(e: ft_io::IoError) -> Self {
        TallyError::Build(e.to_string())
    }
}

/// Final pipeline product: the result document plus its content-derived ID.
#[derive(Debug, Clone)]
pub struct TallyOutcome {
    /// `TR:<sha256-hex64>` over the canonical JSON bytes of `result`.
    pub result_id: String,
    pub result: TallyResult,
}

/// Run the whole tally over a parsed input artifact.
pub fn run_tally(input: &TallyInput) -> Result<TallyOutcome, TallyError> {
    // VALIDATE: slate, sentinel, funding table, budget. Fatal on any defect.
    let cfg = validate_input(input)?;

    // NORMALIZE: per-ballot reject-and-report; never fails as a whole.
    let normalized = normalize_ballots(&cfg.slate, &input.ballots);
    let cast = input.ballots.len() as u64;

    // Total accepted power, needed both for the audit trail and for the
    // pair-sum completeness check below.
    let mut total_power = VotingPower::ZERO;
    for b in &normalized.accepted {
        total_power = total_power
            .checked_add(b.power)
            .ok_or_else(|| TallyError::Invariant("total voting power overflow".into()))?;
    }

    // TABULATE: full head-to-head matrix, sentinel included.
    let pairwise = tally_pairwise(&cfg.slate, &normalized.accepted)
        .map_err(|e| TallyError::Invariant(e.to_string()))?;
    validate_pairwise_complete(&cfg.slate, &pairwise, total_power)
        .map_err(|e| TallyError::Invariant(e.to_string()))?;

    // RANK: Copeland scores, eligibility gate, deterministic tie-break.
    let ranking = rank_copeland(&cfg.slate, &cfg.sentinel, &pairwise)
        .map_err(|e| TallyError::Invariant(e.to_string()))?;

    // ALLOCATE: greedy skip-and-continue walk down the ranking.
    let allocation = allocate_budget(&ranking, &cfg.tiers, cfg.budget)
        .map_err(|e| TallyError::Invariant(e.to_string()))?;

    // The allocator walks the ranking in order; a row mismatch here means a
    // defect in one of the two stages.
    if ranking.ranked.len() != allocation.rows.len() {
        return Err(TallyError::Invariant("ranking/allocation row count mismatch".into()));
    }
    for (score, row) in ranking.ranked.iter().zip(&allocation.rows) {
        if score.id != row.id {
            return Err(TallyError::Invariant("ranking/allocation row order mismatch".into()));
        }
    }

    // ASSEMBLE + HASH.
    let result = build_result::assemble(
        &cfg.slate,
        &cfg.sentinel,
        &pairwise,
        &ranking,
        &allocation,
        cfg.budget,
        total_power,
        cast,
        normalized.rejected,
    );
    let result_id = result_id_from_canonical(&result)?;

    Ok(TallyOutcome { result_id, result })
}
