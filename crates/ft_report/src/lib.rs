//! ft_report — pure offline presentation of a finished tally.
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply the assembled result in memory.
//! - No float arithmetic; every displayed number comes from the engine's
//!   integer/fixed-point types via their own formatting.
//! - Stable section order and field names.

#![forbid(unsafe_code)]

use ft_algo::{Decision, FundingAward, SkipReason};
use ft_pipeline::{TallyOutcome, TallyResult};
use serde::Serialize;

#[derive(Debug)]
pub enum ReportError {
    Serialize(&'static str),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Serialize(what) => write!(f, "report serialization failed: {what}"),
        }
    }
}

impl std::error::Error for ReportError {}

/// Presentation model: everything pre-formatted as strings so both renderers
/// agree on the displayed values.
#[derive(Clone, Debug, Serialize)]
pub struct ReportModel {
    pub header: SectionHeader,
    pub ranking: Vec<RankingLine>,
    pub budget: SectionBudget,
    pub ballots: SectionBallots,
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionHeader {
    pub title: String,
    pub result_id: String,
    pub sentinel: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RankingLine {
    pub rank: u16,
    pub option: String,
    pub score: i32,
    pub record: String,
    pub power_in_wins: String,
    pub eligible: bool,
    pub decision: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionBudget {
    pub total_budget: String,
    pub total_spent: String,
    pub total_remaining: String,
    pub funded: u16,
    pub skipped_budget: u16,
    pub ineligible: u16,
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionBallots {
    pub cast: u64,
    pub counted: u64,
    pub rejected: u64,
    pub total_voting_power: String,
    pub rejections: Vec<String>,
}

fn decision_line(d: &Decision) -> String {
    match d {
        Decision::Funded { award: FundingAward::Extended, amount } => {
            format!("funded (extended, {amount})")
        }
        Decision::Funded { award: FundingAward::Standard, amount } => {
            format!("funded (standard, {amount})")
        }
        Decision::Skipped { reason: SkipReason::Ineligible } => {
            "not funded (lost to cutoff)".to_string()
        }
        Decision::Skipped { reason: SkipReason::InsufficientBudget } => {
            "not funded (insufficient budget)".to_string()
        }
    }
}

/// Build the presentation model from a finished tally (pure).
pub fn build_model(outcome: &TallyOutcome) -> ReportModel {
    let r: &TallyResult = &outcome.result;

    let ranking = r
        .rows
        .iter()
        .map(|row| RankingLine {
            rank: row.rank,
            option: row.option.to_string(),
            score: row.score,
            record: format!("{}W-{}L-{}T", row.wins, row.losses, row.ties),
            power_in_wins: row.power_in_wins.to_string(),
            eligible: row.eligible,
            decision: decision_line(&row.decision),
        })
        .collect();

    ReportModel {
        header: SectionHeader {
            title: "Funding Vote Tally".to_string(),
            result_id: outcome.result_id.clone(),
            sentinel: r.sentinel.to_string(),
        },
        ranking,
        budget: SectionBudget {
            total_budget: r.budget.total_budget.to_string(),
            total_spent: r.budget.total_spent.to_string(),
            total_remaining: r.budget.total_remaining.to_string(),
            funded: r.budget.funded,
            skipped_budget: r.budget.skipped_budget,
            ineligible: r.budget.ineligible,
        },
        ballots: SectionBallots {
            cast: r.ballots.cast,
            counted: r.ballots.counted,
            rejected: r.ballots.rejected,
            total_voting_power: r.ballots.total_voting_power.to_string(),
            rejections: r
                .ballots
                .rejections
                .iter()
                .map(|rej| format!("{}: {}", rej.voter, rej.reason))
                .collect(),
        },
    }
}

/// Serialize the model as JSON (field order follows the struct layout).
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string_pretty(model).map_err(|_| ReportError::Serialize("json"))
}

/// Render a plain-text summary suitable for terminals and logs.
pub fn render_text(model: &ReportModel) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", model.header.title));
    out.push_str(&format!("Result:   {}\n", model.header.result_id));
    out.push_str(&format!("Cutoff:   {}\n", model.header.sentinel));
    out.push('\n');

    out.push_str("Ranking\n");
    for line in &model.ranking {
        let gate = if line.eligible { "" } else { " [below cutoff]" };
        out.push_str(&format!(
            "  {:>2}. {}  score {:+}  ({}, power-in-wins {}){}\n",
            line.rank, line.option, line.score, line.record, line.power_in_wins, gate
        ));
        out.push_str(&format!("      {}\n", line.decision));
    }
    out.push('\n');

    out.push_str("Budget\n");
    out.push_str(&format!("  total     {}\n", model.budget.total_budget));
    out.push_str(&format!("  spent     {}\n", model.budget.total_spent));
    out.push_str(&format!("  remaining {}\n", model.budget.total_remaining));
    out.push_str(&format!(
        "  funded {}, skipped for budget {}, below cutoff {}\n",
        model.budget.funded, model.budget.skipped_budget, model.budget.ineligible
    ));
    out.push('\n');

    out.push_str("Ballots\n");
    out.push_str(&format!(
        "  cast {}, counted {}, rejected {} (total power {})\n",
        model.ballots.cast,
        model.ballots.counted,
        model.ballots.rejected,
        model.ballots.total_voting_power
    ));
    for rej in &model.ballots.rejections {
        out.push_str(&format!("  rejected: {rej}\n"));
    }

    out
}
