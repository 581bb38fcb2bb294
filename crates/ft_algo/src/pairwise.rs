//! Pairwise tournament — weighted head-to-head accumulation (deterministic,
//! exact arithmetic).
//!
//! Scope:
//! - Build the complete pairwise power matrix between slate entries
//!   (sentinel included) from validated ballots.
//! - No floats; voting power is fixed-point and summed with checked adds.
//! - Do not depend on map iteration order; all loops run by index over the
//!   canonical slate order.
//!
//! Out of scope (wired by callers/pipeline):
//! - Ballot parsing/validation (ft_io), eligibility, allocation, presentation.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use ft_core::{Ballot, OptionId, SlateOption, VotingPower};

/// Errors specific to pairwise handling.
#[derive(Debug)]
pub enum PairError {
    /// Attempted to reference an option that is not present in the slate.
    UnknownOption(OptionId),
    /// Fixed-point accumulator overflowed (u128 micro-power).
    PowerOverflow,
    /// Internal invariant was violated (e.g., self comparison).
    Invariant(&'static str),
}

impl core::fmt::Display for PairError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PairError::UnknownOption(id) => write!(f, "unknown option: {id}"),
            PairError::PowerOverflow => write!(f, "voting power overflow"),
            PairError::Invariant(msg) => write!(f, "pairwise invariant: {msg}"),
        }
    }
}

/// Pairwise power matrix: `power[(A,B)]` = total voting power preferring A
/// over B.
///
/// Notes:
/// - Keys are **owned** `(OptionId, OptionId)`; every pair including the
///   diagonal is materialized at construction so completeness is checkable.
/// - Diagonal entries (A,A) are present and fixed at zero.
#[derive(Clone, Default, Debug)]
pub struct Pairwise {
    power: BTreeMap<(OptionId, OptionId), VotingPower>,
}

impl Pairwise {
    /// Initialize all pairs to zero for the given canonical slate.
    pub fn new(slate: &[SlateOption]) -> Self {
        let seq = seq_ids(slate);
        let mut power = BTreeMap::new();
        for a in &seq {
            for b in &seq {
                power.insert((a.clone(), b.clone()), VotingPower::ZERO);
            }
        }
        Self { power }
    }

    /// Add `delta` to the accumulator for A preferred over B (A != B).
    pub fn add(&mut self, a: &OptionId, b: &OptionId, delta: VotingPower) -> Result<(), PairError> {
        if a == b {
            return Err(PairError::Invariant("add on (A,A) is forbidden"));
        }
        let key = (a.clone(), b.clone());
        // Absent keys mean unknown options relative to initialization.
        match self.power.get_mut(&key) {
            Some(slot) => {
                *slot = slot.checked_add(delta).ok_or(PairError::PowerOverflow)?;
                Ok(())
            }
            None => Err(PairError::UnknownOption(a.clone())),
        }
    }

    /// Read the power preferring A over B (zero if the pair is absent).
    #[inline]
    pub fn get(&self, a: &OptionId, b: &OptionId) -> VotingPower {
        self.power
            .get(&(a.clone(), b.clone()))
            .copied()
            .unwrap_or(VotingPower::ZERO)
    }

    /// Expose the immutable map (e.g., to feed the ranker or audit output).
    pub fn as_map(&self) -> &BTreeMap<(OptionId, OptionId), VotingPower> {
        &self.power
    }
}

/// Produce an owned, canonical sequence of OptionIds from the slate.
/// Order is the published slate order provided upstream.
#[inline]
pub fn seq_ids(slate: &[SlateOption]) -> Vec<OptionId> {
    slate.iter().map(|o| o.id.clone()).collect()
}

/// Accumulate the full tournament from validated ballots.
///
/// Each ballot's ranking is a total order over the slate (most preferred
/// first), so for every unordered pair exactly one side receives the
/// ballot's power. O(ballots × n²); slates are small and bounded.
pub fn tally_pairwise(slate: &[SlateOption], ballots: &[Ballot]) -> Result<Pairwise, PairError> {
    let seq = seq_ids(slate);
    let mut pw = Pairwise::new(slate);

    for ballot in ballots {
        // Position of each option within this ballot's ranking.
        let mut pos: BTreeMap<&OptionId, usize> = BTreeMap::new();
        for (rank, id) in ballot.ranking.iter().enumerate() {
            pos.insert(id, rank);
        }

        for i in 0..seq.len() {
            for j in (i + 1)..seq.len() {
                let a = &seq[i];
                let b = &seq[j];
                let ra = *pos.get(a).ok_or_else(|| PairError::UnknownOption(a.clone()))?;
                let rb = *pos.get(b).ok_or_else(|| PairError::UnknownOption(b.clone()))?;
                // Rankings are total orders per ballot; equal ranks cannot occur.
                if ra < rb {
                    pw.add(a, b, ballot.power)?;
                } else {
                    pw.add(b, a, ballot.power)?;
                }
            }
        }
    }

    Ok(pw)
}

/// Validate that a `Pairwise` matrix is complete and consistent for `slate`.
/// Requirements:
/// - Every (A,B) pair exists, including the diagonal.
/// - Diagonal entries (A,A) are exactly zero.
/// - No extraneous keys exist.
/// - For every unordered pair, `power(A>B) + power(B>A) == expected_total`
///   (the summed weight of accepted ballots; every accepted ballot ranks
///   both options).
pub fn validate_pairwise_complete(
    slate: &[SlateOption],
    pairwise: &Pairwise,
    expected_total: VotingPower,
) -> Result<(), PairError> {
    let seq = seq_ids(slate);
    let set: alloc::collections::BTreeSet<&OptionId> = seq.iter().collect();

    for (i, a) in seq.iter().enumerate() {
        for (j, b) in seq.iter().enumerate() {
            let key = (a.clone(), b.clone());
            let v = match pairwise.as_map().get(&key) {
                Some(v) => *v,
                None => return Err(PairError::Invariant("pairwise missing (A,B) entry")),
            };
            if i == j && !v.is_zero() {
                return Err(PairError::Invariant("pairwise diagonal must be zero"));
            }
            if i < j {
                let w = pairwise.get(b, a);
                let sum = v.checked_add(w).ok_or(PairError::PowerOverflow)?;
                if sum != expected_total {
                    return Err(PairError::Invariant(
                        "pair sum differs from total accepted power",
                    ));
                }
            }
        }
    }

    for (k, _) in pairwise.as_map().iter() {
        if !set.contains(&k.0) || !set.contains(&k.1) {
            return Err(PairError::UnknownOption(if !set.contains(&k.0) {
                k.0.clone()
            } else {
                k.1.clone()
            }));
        }
    }

    Ok(())
}
