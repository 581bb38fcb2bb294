//! Result Assembler — pure merge of ranking, allocation, pairwise audit
//! rows, and ballot audit into the final reported structure. No additional
//! computation happens here.

use ft_algo::{AllocationOutcome, Decision, Pairwise, Ranking, SkipReason};
use ft_core::{Amount, OptionId, SlateOption, VotingPower};
use ft_io::ballots::RejectedBallot;
use serde::{Deserialize, Serialize};

/// One ranked option with its tournament score and funding decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionRow {
    pub option: OptionId,
    /// 1-based position in the final order.
    pub rank: u16,
    pub wins: u16,
    pub losses: u16,
    pub ties: u16,
    /// Copeland score (wins − losses).
    pub score: i32,
    /// Voting power received across won match-ups.
    pub power_in_wins: VotingPower,
    /// Beat or tied the cutoff sentinel head-to-head.
    pub eligible: bool,
    pub decision: Decision,
    /// Running total spent at the point this option was considered.
    pub cumulative_spent: Amount,
}

/// Head-to-head audit row for one unordered pair (sentinel included).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairwiseRow {
    pub option_a: OptionId,
    pub option_b: OptionId,
    pub power_a: VotingPower,
    pub power_b: VotingPower,
}

/// Budget summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetTotals {
    pub total_budget: Amount,
    pub total_spent: Amount,
    pub total_remaining: Amount,
    pub funded: u16,
    pub skipped_budget: u16,
    pub ineligible: u16,
}

/// Ballot audit: every submitted ballot is accounted for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BallotAudit {
    pub cast: u64,
    pub counted: u64,
    pub rejected: u64,
    /// Total accepted voting power (zero-power ballots included).
    pub total_voting_power: VotingPower,
    pub rejections: Vec<RejectedBallot>,
}

/// The full tally output. Field order is stable; the canonical-JSON hash of
/// this structure is the result identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TallyResult {
    pub sentinel: OptionId,
    pub rows: Vec<OptionRow>,
    pub pairwise: Vec<PairwiseRow>,
    pub budget: BudgetTotals,
    pub ballots: BallotAudit,
}

/// Merge the stage outputs. The ranking and the allocation walk are in the
/// same order by construction; a mismatch is an internal defect surfaced by
/// the caller's invariant check, not here.
pub fn assemble(
    slate: &[SlateOption],
    sentinel: &OptionId,
    pairwise: &Pairwise,
    ranking: &Ranking,
    allocation: &AllocationOutcome,
    total_budget: Amount,
    total_voting_power: VotingPower,
    cast: u64,
    rejections: Vec<RejectedBallot>,
) -> TallyResult {
    debug_assert_eq!(ranking.ranked.len(), allocation.rows.len());

    let mut funded = 0u16;
    let mut skipped_budget = 0u16;
    let mut ineligible = 0u16;

    let rows: Vec<OptionRow> = ranking
        .ranked
        .iter()
        .zip(&allocation.rows)
        .enumerate()
        .map(|(i, (score, alloc))| {
            match alloc.decision {
                Decision::Funded { .. } => funded += 1,
                Decision::Skipped { reason: SkipReason::InsufficientBudget } => skipped_budget += 1,
                Decision::Skipped { reason: SkipReason::Ineligible } => ineligible += 1,
            }
            OptionRow {
                option: score.id.clone(),
                rank: (i + 1) as u16,
                wins: score.wins,
                losses: score.losses,
                ties: score.ties,
                score: score.score(),
                power_in_wins: score.power_in_wins,
                eligible: score.eligible,
                decision: alloc.decision,
                cumulative_spent: alloc.cumulative_spent,
            }
        })
        .collect();

    // Unordered pairs in canonical slate order, sentinel included.
    let mut pairs: Vec<PairwiseRow> = Vec::with_capacity(slate.len() * (slate.len() - 1) / 2);
    for i in 0..slate.len() {
        for j in (i + 1)..slate.len() {
            let a = &slate[i].id;
            let b = &slate[j].id;
            pairs.push(PairwiseRow {
                option_a: a.clone(),
                option_b: b.clone(),
                power_a: pairwise.get(a, b),
                power_b: pairwise.get(b, a),
            });
        }
    }

    let rejected = rejections.len() as u64;
    TallyResult {
        sentinel: sentinel.clone(),
        rows,
        pairwise: pairs,
        budget: BudgetTotals {
            total_budget,
            total_spent: allocation.total_spent,
            total_remaining: allocation.remaining,
            funded,
            skipped_budget,
            ineligible,
        },
        ballots: BallotAudit {
            cast,
            counted: cast - rejected,
            rejected,
            total_voting_power,
            rejections,
        },
    }
}
