//! Ballot Normalizer — strict validation of raw ballot records against the
//! canonical slate.
//!
//! Wire format (matching the governance vote store): `choice` is a JSON
//! array of **1-based slate indexes in preference order**, either embedded
//! in a string (`"[2,1,3]"`) or given as a native array. The array must be a
//! permutation of `1..=n`: partial rankings are not supported and are
//! rejected, not inferred tied-last.
//!
//! A malformed ballot is rejected and reported; it never aborts the whole
//! tally. Zero voting power is accepted (no pairwise effect, but counted for
//! audit totals).

use ft_core::{Ballot, SlateOption, VoterId, VotingPower};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw ballot record as stored by the vote collector.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBallot {
    pub voter: String,
    /// JSON string or number; parsed exactly (≤ 6 decimal places).
    pub voting_power: Value,
    /// JSON array of 1-based slate indexes, or a string embedding one.
    pub choice: Value,
}

/// Why a ballot was excluded from the tournament.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Voter id empty or outside the token charset.
    InvalidVoter,
    /// `choice` is not a parseable list of indexes.
    MalformedChoice,
    /// Ranking does not cover the slate exactly once each.
    WrongLength,
    /// An option reference appears more than once.
    DuplicateRef,
    /// An index is outside `1..=n`.
    UnknownRef,
    /// Voting power is not an exactly representable decimal.
    UnparseablePower,
    /// Voting power is negative.
    NegativePower,
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RejectReason::InvalidVoter => "invalid voter id",
            RejectReason::MalformedChoice => "malformed choice",
            RejectReason::WrongLength => "ranking does not cover the slate",
            RejectReason::DuplicateRef => "duplicate option reference",
            RejectReason::UnknownRef => "unknown option reference",
            RejectReason::UnparseablePower => "unparseable voting power",
            RejectReason::NegativePower => "negative voting power",
        };
        f.write_str(s)
    }
}

/// One rejected ballot, reported to the caller (never silently dropped).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RejectedBallot {
    pub voter: String,
    pub reason: RejectReason,
}

/// Output of normalization: accepted ballots plus the rejection report.
#[derive(Debug, Clone)]
pub struct NormalizedBallots {
    pub accepted: Vec<Ballot>,
    pub rejected: Vec<RejectedBallot>,
}

/// Validate raw ballots against the slate. Per-ballot failures are recovered
/// locally; this function itself cannot fail.
pub fn normalize_ballots(slate: &[SlateOption], raw: &[RawBallot]) -> NormalizedBallots {
    let mut accepted = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();

    for rb in raw {
        match normalize_one(slate, rb) {
            Ok(ballot) => accepted.push(ballot),
            Err(reason) => rejected.push(RejectedBallot { voter: rb.voter.clone(), reason }),
        }
    }

    // The rejection report feeds the canonical result artifact, so its order
    // must not depend on input ballot order.
    rejected.sort_by(|a, b| a.voter.cmp(&b.voter).then_with(|| a.reason.cmp(&b.reason)));

    NormalizedBallots { accepted, rejected }
}

fn normalize_one(slate: &[SlateOption], raw: &RawBallot) -> Result<Ballot, RejectReason> {
    let voter: VoterId = raw.voter.parse().map_err(|_| RejectReason::InvalidVoter)?;
    let power = parse_power(&raw.voting_power)?;
    let indexes = parse_choice(&raw.choice)?;

    let n = slate.len();
    if indexes.len() != n {
        return Err(RejectReason::WrongLength);
    }

    let mut seen = vec![false; n];
    let mut ranking = Vec::with_capacity(n);
    for ix in indexes {
        // 1-based on the wire.
        if ix < 1 || ix as usize > n {
            return Err(RejectReason::UnknownRef);
        }
        let slot = ix as usize - 1;
        if seen[slot] {
            return Err(RejectReason::DuplicateRef);
        }
        seen[slot] = true;
        ranking.push(slate[slot].id.clone());
    }

    Ok(Ballot { voter, power, ranking })
}

fn parse_power(v: &Value) -> Result<VotingPower, RejectReason> {
    let text = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(RejectReason::UnparseablePower),
    };
    if text.starts_with('-') {
        return Err(RejectReason::NegativePower);
    }
    text.parse().map_err(|_| RejectReason::UnparseablePower)
}

fn parse_choice(v: &Value) -> Result<Vec<u64>, RejectReason> {
    match v {
        Value::String(s) => serde_json::from_str(s).map_err(|_| RejectReason::MalformedChoice),
        Value::Array(_) => {
            serde_json::from_value(v.clone()).map_err(|_| RejectReason::MalformedChoice)
        }
        _ => Err(RejectReason::MalformedChoice),
    }
}
