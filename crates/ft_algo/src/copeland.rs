//! Copeland ranker — win/loss/tie scoring over the pairwise matrix and a
//! fully deterministic total order (no RNG, ever).
//!
//! Scope (per the tally rules):
//! - Head-to-head outcome: A beats B iff power(A>B) > power(B>A); exact
//!   equality is a tie. Score = wins − losses.
//! - Eligibility gate: an option is fundable only if it beats **or ties**
//!   the cutoff sentinel in their head-to-head.
//! - Total order: score descending; equal-score groups resolved by the
//!   three-level tie-break (head-to-head margin for two-way ties, then
//!   power received across won match-ups, then original slate position).
//! - The sentinel participates in every comparison but is excluded from the
//!   emitted ranking and never funded.
//!
//! Determinism:
//! - All loops iterate by index over the canonical slate order; the sort key
//!   is a total order in every branch (a pairwise comparator is applied only
//!   to two-way ties, where it cannot be cyclic).

use alloc::vec::Vec;

use ft_core::{OptionId, SlateOption, VotingPower};

use crate::pairwise::Pairwise;

/// Errors specific to Copeland ranking.
#[derive(Debug)]
pub enum CopelandError {
    /// The designated sentinel does not appear in the slate.
    SentinelNotInSlate(OptionId),
    /// Accumulating `power_in_wins` overflowed.
    PowerOverflow,
}

impl core::fmt::Display for CopelandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CopelandError::SentinelNotInSlate(id) => write!(f, "sentinel not in slate: {id}"),
            CopelandError::PowerOverflow => write!(f, "voting power overflow"),
        }
    }
}

/// Per-option tournament score.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionScore {
    pub id: OptionId,
    /// Ordinal position in the published slate (final tie-break key).
    pub order_index: u16,
    pub wins: u16,
    pub losses: u16,
    pub ties: u16,
    /// Total voting power this option received across the match-ups it won.
    pub power_in_wins: VotingPower,
    /// Beat or tied the sentinel head-to-head.
    pub eligible: bool,
}

impl OptionScore {
    /// Copeland score: wins − losses (ties contribute zero).
    #[inline]
    pub fn score(&self) -> i32 {
        self.wins as i32 - self.losses as i32
    }
}

/// Deterministic total order over the fundable options (best first).
/// The sentinel is excluded; ineligible options are ranked but flagged.
#[derive(Clone, Debug)]
pub struct Ranking {
    pub ranked: Vec<OptionScore>,
}

/// Score every fundable option against all opponents (sentinel included)
/// and produce the deterministic total order.
pub fn rank_copeland(
    slate: &[SlateOption],
    sentinel: &OptionId,
    pairwise: &Pairwise,
) -> Result<Ranking, CopelandError> {
    if !slate.iter().any(|o| &o.id == sentinel) {
        return Err(CopelandError::SentinelNotInSlate(sentinel.clone()));
    }

    let mut scored: Vec<OptionScore> = Vec::with_capacity(slate.len().saturating_sub(1));
    for option in slate {
        if &option.id == sentinel {
            continue;
        }
        let mut wins = 0u16;
        let mut losses = 0u16;
        let mut ties = 0u16;
        let mut power_in_wins = VotingPower::ZERO;

        for opponent in slate {
            if opponent.id == option.id {
                continue;
            }
            let for_power = pairwise.get(&option.id, &opponent.id);
            let against_power = pairwise.get(&opponent.id, &option.id);
            if for_power > against_power {
                wins += 1;
                power_in_wins = power_in_wins
                    .checked_add(for_power)
                    .ok_or(CopelandError::PowerOverflow)?;
            } else if against_power > for_power {
                losses += 1;
            } else {
                ties += 1;
            }
        }

        let vs_sentinel = pairwise.get(&option.id, sentinel);
        let sentinel_vs = pairwise.get(sentinel, &option.id);
        scored.push(OptionScore {
            id: option.id.clone(),
            order_index: option.order_index,
            wins,
            losses,
            ties,
            power_in_wins,
            eligible: vs_sentinel >= sentinel_vs,
        });
    }

    // Base total order: score desc, power_in_wins desc, slate position asc.
    scored.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| b.power_in_wins.cmp(&a.power_in_wins))
            .then_with(|| a.order_index.cmp(&b.order_index))
    });

    // Refine each equal-score run with the head-to-head rule.
    let mut start = 0;
    while start < scored.len() {
        let mut end = start + 1;
        while end < scored.len() && scored[end].score() == scored[start].score() {
            end += 1;
        }
        order_tied_group(&mut scored[start..end], pairwise);
        start = end;
    }

    Ok(Ranking { ranked: scored })
}

/// Tie-break inside one equal-score group.
///
/// A two-way tie is resolved by the pair's own head-to-head margin when
/// decisive. Larger groups keep the base order (power_in_wins, then slate
/// position): a pairwise comparator over three or more options can be
/// cyclic and would not define a total order.
fn order_tied_group(group: &mut [OptionScore], pairwise: &Pairwise) {
    if group.len() != 2 {
        return;
    }
    let ab = pairwise.get(&group[0].id, &group[1].id);
    let ba = pairwise.get(&group[1].id, &group[0].id);
    if ba > ab {
        group.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairwise::Pairwise;
    use alloc::vec;

    fn opt(id: &str, idx: u16) -> SlateOption {
        SlateOption {
            id: id.parse().expect("opt id"),
            order_index: idx,
            tier: None,
        }
    }

    fn id(s: &str) -> OptionId {
        s.parse().expect("id")
    }

    fn add(pw: &mut Pairwise, a: &str, b: &str, power: u64) {
        pw.add(&id(a), &id(b), VotingPower::from_whole(power)).expect("add");
    }

    #[test]
    fn scores_and_eligibility_for_two_fundable_options() {
        let slate = vec![opt("A", 0), opt("B", 1), opt("NONE BELOW", 2)];
        let sentinel = id("NONE BELOW");
        let mut pw = Pairwise::new(&slate);
        add(&mut pw, "A", "B", 200);
        add(&mut pw, "B", "A", 100);
        add(&mut pw, "A", "NONE BELOW", 200);
        add(&mut pw, "NONE BELOW", "A", 100);
        add(&mut pw, "B", "NONE BELOW", 200);
        add(&mut pw, "NONE BELOW", "B", 100);

        let ranking = rank_copeland(&slate, &sentinel, &pw).expect("rank");
        assert_eq!(ranking.ranked.len(), 2); // sentinel excluded

        let first = &ranking.ranked[0];
        assert_eq!(first.id, id("A"));
        assert_eq!((first.wins, first.losses, first.ties), (2, 0, 0));
        assert_eq!(first.score(), 2);
        assert!(first.eligible);
        assert_eq!(first.power_in_wins, VotingPower::from_whole(400));

        let second = &ranking.ranked[1];
        assert_eq!(second.id, id("B"));
        assert_eq!((second.wins, second.losses, second.ties), (1, 1, 0));
        assert_eq!(second.score(), 0);
        assert!(second.eligible);
    }

    #[test]
    fn losing_to_sentinel_marks_ineligible_but_still_ranked() {
        let slate = vec![opt("A", 0), opt("B", 1), opt("NONE BELOW", 2)];
        let sentinel = id("NONE BELOW");
        let mut pw = Pairwise::new(&slate);
        // B loses to the sentinel but crushes A.
        add(&mut pw, "B", "A", 500);
        add(&mut pw, "A", "B", 10);
        add(&mut pw, "NONE BELOW", "B", 300);
        add(&mut pw, "B", "NONE BELOW", 200);
        add(&mut pw, "A", "NONE BELOW", 300);
        add(&mut pw, "NONE BELOW", "A", 200);

        let ranking = rank_copeland(&slate, &sentinel, &pw).expect("rank");
        let b = ranking.ranked.iter().find(|o| o.id == id("B")).unwrap();
        assert!(!b.eligible);
        // A and B tie on score (one win, one loss each); the two-way
        // head-to-head is decisive (B beat A 500–10), so B still ranks first.
        assert_eq!(ranking.ranked[0].id, id("B"));
    }

    #[test]
    fn exact_power_tie_counts_as_tie_and_gates_eligibility_inclusively() {
        let slate = vec![opt("A", 0), opt("NONE BELOW", 1)];
        let sentinel = id("NONE BELOW");
        let mut pw = Pairwise::new(&slate);
        add(&mut pw, "A", "NONE BELOW", 150);
        add(&mut pw, "NONE BELOW", "A", 150);

        let ranking = rank_copeland(&slate, &sentinel, &pw).expect("rank");
        let a = &ranking.ranked[0];
        assert_eq!((a.wins, a.losses, a.ties), (0, 0, 1));
        assert_eq!(a.score(), 0);
        assert!(a.eligible, "a tie with the sentinel keeps the option eligible");
    }

    #[test]
    fn two_way_score_tie_uses_head_to_head() {
        let slate = vec![opt("A", 0), opt("B", 1), opt("C", 2), opt("NONE BELOW", 3)];
        let sentinel = id("NONE BELOW");
        let mut pw = Pairwise::new(&slate);
        // A beats C and the sentinel; B beats A and the sentinel but loses
        // to C; C loses to A and the sentinel.
        add(&mut pw, "A", "C", 900);
        add(&mut pw, "C", "A", 100);
        add(&mut pw, "B", "A", 200);
        add(&mut pw, "A", "B", 100);
        add(&mut pw, "C", "B", 150);
        add(&mut pw, "B", "C", 100);
        add(&mut pw, "A", "NONE BELOW", 300);
        add(&mut pw, "NONE BELOW", "A", 100);
        add(&mut pw, "B", "NONE BELOW", 300);
        add(&mut pw, "NONE BELOW", "B", 100);
        add(&mut pw, "NONE BELOW", "C", 300);
        add(&mut pw, "C", "NONE BELOW", 100);

        let ranking = rank_copeland(&slate, &sentinel, &pw).expect("rank");
        // Scores: A = 1, B = 1, C = −1 → two-way tie between A and B.
        let a = ranking.ranked.iter().find(|o| o.id == id("A")).unwrap();
        let b = ranking.ranked.iter().find(|o| o.id == id("B")).unwrap();
        assert_eq!(a.score(), 1);
        assert_eq!(b.score(), 1);
        // Head-to-head is decisive for the two-way tie: B ranks above A even
        // though A's power_in_wins (1200) exceeds B's (500).
        assert!(a.power_in_wins > b.power_in_wins);
        assert_eq!(ranking.ranked[0].id, id("B"));
        assert_eq!(ranking.ranked[1].id, id("A"));
        assert_eq!(ranking.ranked[2].id, id("C"));
    }

    #[test]
    fn mutual_tie_falls_back_to_power_then_slate_position() {
        let slate = vec![opt("A", 0), opt("B", 1), opt("NONE BELOW", 2)];
        let sentinel = id("NONE BELOW");
        let mut pw = Pairwise::new(&slate);
        // A and B exactly tied head-to-head; B's sentinel win carries more power.
        add(&mut pw, "A", "B", 100);
        add(&mut pw, "B", "A", 100);
        add(&mut pw, "A", "NONE BELOW", 150);
        add(&mut pw, "NONE BELOW", "A", 50);
        add(&mut pw, "B", "NONE BELOW", 180);
        add(&mut pw, "NONE BELOW", "B", 20);

        let ranking = rank_copeland(&slate, &sentinel, &pw).expect("rank");
        assert_eq!(ranking.ranked[0].id, id("B"));

        // With everything equal, slate position decides.
        let mut pw2 = Pairwise::new(&slate);
        pw2.add(&id("A"), &id("B"), VotingPower::from_whole(100)).unwrap();
        pw2.add(&id("B"), &id("A"), VotingPower::from_whole(100)).unwrap();
        pw2.add(&id("A"), &id("NONE BELOW"), VotingPower::from_whole(100)).unwrap();
        pw2.add(&id("NONE BELOW"), &id("A"), VotingPower::from_whole(100)).unwrap();
        pw2.add(&id("B"), &id("NONE BELOW"), VotingPower::from_whole(100)).unwrap();
        pw2.add(&id("NONE BELOW"), &id("B"), VotingPower::from_whole(100)).unwrap();
        let ranking2 = rank_copeland(&slate, &sentinel, &pw2).expect("rank");
        assert_eq!(ranking2.ranked[0].id, id("A"));
    }

    #[test]
    fn three_way_tie_keeps_a_total_order() {
        // Classic cycle A>B>C>A with equal margins: scores all equal, the
        // head-to-head rule must not apply, and the order must stay stable.
        let slate = vec![opt("A", 0), opt("B", 1), opt("C", 2), opt("NONE BELOW", 3)];
        let sentinel = id("NONE BELOW");
        let mut pw = Pairwise::new(&slate);
        add(&mut pw, "A", "B", 200);
        add(&mut pw, "B", "A", 100);
        add(&mut pw, "B", "C", 200);
        add(&mut pw, "C", "B", 100);
        add(&mut pw, "C", "A", 200);
        add(&mut pw, "A", "C", 100);
        add(&mut pw, "A", "NONE BELOW", 200);
        add(&mut pw, "NONE BELOW", "A", 100);
        add(&mut pw, "B", "NONE BELOW", 200);
        add(&mut pw, "NONE BELOW", "B", 100);
        add(&mut pw, "C", "NONE BELOW", 200);
        add(&mut pw, "NONE BELOW", "C", 100);

        let ranking = rank_copeland(&slate, &sentinel, &pw).expect("rank");
        let ids: Vec<_> = ranking.ranked.iter().map(|o| o.id.to_string()).collect();
        // Equal scores (2−1) and equal power_in_wins (400) → slate order.
        assert_eq!(ids, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn unknown_sentinel_is_an_error() {
        let slate = vec![opt("A", 0), opt("B", 1)];
        let pw = Pairwise::new(&slate);
        assert!(matches!(
            rank_copeland(&slate, &id("NONE BELOW"), &pw),
            Err(CopelandError::SentinelNotInSlate(_))
        ));
    }
}
