//! Tiered budget allocation over the final ranking.
//!
//! Contract (tally rules):
//! - Walk options in final order (highest-ranked first).
//! - Eligible options take the extended amount when `two_year_eligible` and
//!   it fits the remaining budget, else the standard amount when it fits,
//!   else they are skipped for insufficient budget and the walk **continues**
//!   so cheaper lower-ranked options can still be funded.
//! - Ineligible options (lost to the sentinel) are always skipped,
//!   regardless of budget.
//! - Pure integers; awards are deducted immediately; the allocator never
//!   exceeds the total budget.
//!
//! Determinism:
//! - The walk consumes the ranking as given; no reordering, no RNG.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use ft_core::{Amount, FundingTier, OptionId};

use crate::copeland::Ranking;

#[derive(Debug)]
pub enum AllocError {
    /// A ranked, eligible option has no funding-tier entry. Callers validate
    /// the table up front; hitting this mid-walk is a configuration defect.
    MissingTier(OptionId),
    /// Internal accounting would exceed the total budget. Never expected.
    BudgetExceeded,
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AllocError::MissingTier(id) => write!(f, "missing funding tier for option: {id}"),
            AllocError::BudgetExceeded => write!(f, "allocation exceeded total budget"),
        }
    }
}

/// Which tier amount was awarded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FundingAward {
    Extended,
    Standard,
}

/// Why an option received nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// Lost to the cutoff sentinel head-to-head.
    Ineligible,
    /// Neither tier amount fits the remaining budget.
    InsufficientBudget,
}

/// Funding decision for one ranked option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum Decision {
    Funded { award: FundingAward, amount: Amount },
    Skipped { reason: SkipReason },
}

/// One row of the allocation walk, in ranking order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocatedOption {
    pub id: OptionId,
    pub decision: Decision,
    /// Running total spent at the point this option was considered
    /// (inclusive of its own award, if any).
    pub cumulative_spent: Amount,
}

/// Full allocation outcome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationOutcome {
    pub rows: Vec<AllocatedOption>,
    pub total_spent: Amount,
    pub remaining: Amount,
}

/// Walk the ranking and assign funding against `total_budget`.
pub fn allocate_budget(
    ranking: &Ranking,
    tiers: &BTreeMap<OptionId, FundingTier>,
    total_budget: Amount,
) -> Result<AllocationOutcome, AllocError> {
    let mut rows: Vec<AllocatedOption> = Vec::with_capacity(ranking.ranked.len());
    let mut remaining = total_budget;
    let mut spent = Amount::ZERO;

    for option in &ranking.ranked {
        if !option.eligible {
            rows.push(AllocatedOption {
                id: option.id.clone(),
                decision: Decision::Skipped { reason: SkipReason::Ineligible },
                cumulative_spent: spent,
            });
            continue;
        }

        let tier = tiers
            .get(&option.id)
            .ok_or_else(|| AllocError::MissingTier(option.id.clone()))?;

        let award = if tier.two_year_eligible && tier.extended <= remaining {
            Some((FundingAward::Extended, tier.extended))
        } else if tier.standard <= remaining {
            Some((FundingAward::Standard, tier.standard))
        } else {
            None
        };

        let decision = match award {
            Some((kind, amount)) => {
                remaining = remaining.checked_sub(amount).ok_or(AllocError::BudgetExceeded)?;
                spent = spent.checked_add(amount).ok_or(AllocError::BudgetExceeded)?;
                Decision::Funded { award: kind, amount }
            }
            None => Decision::Skipped { reason: SkipReason::InsufficientBudget },
        };

        rows.push(AllocatedOption {
            id: option.id.clone(),
            decision,
            cumulative_spent: spent,
        });
    }

    if spent.checked_add(remaining) != Some(total_budget) {
        return Err(AllocError::BudgetExceeded);
    }

    Ok(AllocationOutcome { rows, total_spent: spent, remaining })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copeland::OptionScore;
    use alloc::vec;
    use ft_core::VotingPower;

    fn scored(id: &str, idx: u16, eligible: bool) -> OptionScore {
        OptionScore {
            id: id.parse().expect("id"),
            order_index: idx,
            wins: 0,
            losses: 0,
            ties: 0,
            power_in_wins: VotingPower::ZERO,
            eligible,
        }
    }

    fn tier(ext: u64, std_amt: u64, two_year: bool) -> FundingTier {
        FundingTier {
            extended: Amount::new(ext),
            standard: Amount::new(std_amt),
            two_year_eligible: two_year,
        }
    }

    fn tiers(entries: &[(&str, FundingTier)]) -> BTreeMap<OptionId, FundingTier> {
        entries
            .iter()
            .map(|(id, t)| (id.parse().expect("id"), *t))
            .collect()
    }

    #[test]
    fn extended_award_then_budget_skip() {
        // A (ext 500000, std 300000, 2Y) ranked above B (ext 600000,
        // std 300000, no 2Y); budget 700000.
        let ranking = Ranking {
            ranked: vec![scored("A", 0, true), scored("B", 1, true)],
        };
        let table = tiers(&[
            ("A", tier(500_000, 300_000, true)),
            ("B", tier(600_000, 300_000, false)),
        ]);
        let out = allocate_budget(&ranking, &table, Amount::new(700_000)).expect("alloc");

        assert_eq!(
            out.rows[0].decision,
            Decision::Funded { award: FundingAward::Extended, amount: Amount::new(500_000) }
        );
        assert_eq!(out.rows[0].cumulative_spent, Amount::new(500_000));
        assert_eq!(
            out.rows[1].decision,
            Decision::Skipped { reason: SkipReason::InsufficientBudget }
        );
        assert_eq!(out.rows[1].cumulative_spent, Amount::new(500_000));
        assert_eq!(out.total_spent, Amount::new(500_000));
        assert_eq!(out.remaining, Amount::new(200_000));
    }

    #[test]
    fn walk_continues_past_unfundable_options() {
        let ranking = Ranking {
            ranked: vec![
                scored("Big", 0, true),
                scored("Huge", 1, true),
                scored("Small", 2, true),
            ],
        };
        let table = tiers(&[
            ("Big", tier(0, 900_000, false)),
            ("Huge", tier(0, 800_000, false)),
            ("Small", tier(0, 100_000, false)),
        ]);
        let out = allocate_budget(&ranking, &table, Amount::new(1_000_000)).expect("alloc");

        // Big funded, Huge skipped (only 100k left), Small funded after it.
        assert!(matches!(out.rows[0].decision, Decision::Funded { .. }));
        assert_eq!(
            out.rows[1].decision,
            Decision::Skipped { reason: SkipReason::InsufficientBudget }
        );
        assert!(matches!(out.rows[2].decision, Decision::Funded { .. }));
        assert_eq!(out.total_spent, Amount::new(1_000_000));
        assert_eq!(out.remaining, Amount::ZERO);
    }

    #[test]
    fn extended_requires_two_year_flag() {
        let ranking = Ranking { ranked: vec![scored("A", 0, true)] };
        let table = tiers(&[("A", tier(500_000, 300_000, false))]);
        let out = allocate_budget(&ranking, &table, Amount::new(1_000_000)).expect("alloc");
        assert_eq!(
            out.rows[0].decision,
            Decision::Funded { award: FundingAward::Standard, amount: Amount::new(300_000) }
        );
    }

    #[test]
    fn two_year_option_falls_back_to_standard_when_extended_does_not_fit() {
        let ranking = Ranking { ranked: vec![scored("A", 0, true)] };
        let table = tiers(&[("A", tier(500_000, 300_000, true))]);
        let out = allocate_budget(&ranking, &table, Amount::new(400_000)).expect("alloc");
        assert_eq!(
            out.rows[0].decision,
            Decision::Funded { award: FundingAward::Standard, amount: Amount::new(300_000) }
        );
        assert_eq!(out.remaining, Amount::new(100_000));
    }

    #[test]
    fn ineligible_options_never_receive_funding() {
        let ranking = Ranking {
            ranked: vec![scored("A", 0, false), scored("B", 1, true)],
        };
        let table = tiers(&[
            ("A", tier(100, 50, true)),
            ("B", tier(100, 50, true)),
        ]);
        let out = allocate_budget(&ranking, &table, Amount::new(1_000)).expect("alloc");
        assert_eq!(
            out.rows[0].decision,
            Decision::Skipped { reason: SkipReason::Ineligible }
        );
        assert!(matches!(out.rows[1].decision, Decision::Funded { .. }));
    }

    #[test]
    fn zero_budget_funds_only_zero_cost_tiers() {
        let ranking = Ranking { ranked: vec![scored("A", 0, true)] };
        let table = tiers(&[("A", tier(100, 50, true))]);
        let out = allocate_budget(&ranking, &table, Amount::ZERO).expect("alloc");
        assert_eq!(
            out.rows[0].decision,
            Decision::Skipped { reason: SkipReason::InsufficientBudget }
        );
        assert_eq!(out.total_spent, Amount::ZERO);
    }

    #[test]
    fn missing_tier_is_an_error() {
        let ranking = Ranking { ranked: vec![scored("A", 0, true)] };
        let table = tiers(&[]);
        assert!(matches!(
            allocate_budget(&ranking, &table, Amount::new(1_000)),
            Err(AllocError::MissingTier(_))
        ));
    }
}
