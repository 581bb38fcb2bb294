//! Whole-call configuration validation.
//!
//! Everything here is fatal: a misconfigured slate or funding table aborts
//! the tally before any arithmetic, with a descriptive error. Defaults are
//! never substituted silently (the only documented fallback is the sentinel
//! defaulting to the last slate entry, which happens here, explicitly).

use std::collections::{BTreeMap, BTreeSet};

use ft_core::{Amount, FundingTier, OptionId, SlateOption};
use ft_io::loader::TallyInput;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fewer than two fundable options (got {0})")]
    FewerThanTwoFundable(usize),

    #[error("option name is not a valid token: {0:?}")]
    InvalidOptionName(String),

    #[error("duplicate option in slate: {0}")]
    DuplicateOption(String),

    #[error("slate too large: {0} entries")]
    SlateTooLarge(usize),

    #[error("designated sentinel not in slate: {0}")]
    SentinelNotInSlate(String),

    #[error("funding table missing an entry for listed option: {0}")]
    MissingFundingEntry(String),

    #[error("funding table must not name the sentinel: {0}")]
    SentinelInFundingTable(String),

    #[error("funding table names an option not in the slate: {0}")]
    UnknownFundingEntry(String),

    #[error("total budget is negative: {0}")]
    NegativeBudget(i64),
}

/// Validated, typed configuration ready for tallying.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Slate in published order, sentinel included (`tier: None`).
    pub slate: Vec<SlateOption>,
    pub sentinel: OptionId,
    pub budget: Amount,
    pub tiers: BTreeMap<OptionId, FundingTier>,
}

/// Check the slate, sentinel, funding table, and budget of a raw input.
pub fn validate_input(input: &TallyInput) -> Result<ValidatedConfig, ConfigError> {
    if input.options.len() > u16::MAX as usize {
        return Err(ConfigError::SlateTooLarge(input.options.len()));
    }

    // Parse and de-duplicate the slate.
    let mut ids: Vec<OptionId> = Vec::with_capacity(input.options.len());
    let mut seen: BTreeSet<OptionId> = BTreeSet::new();
    for name in &input.options {
        let id: OptionId = name
            .parse()
            .map_err(|_| ConfigError::InvalidOptionName(name.clone()))?;
        if !seen.insert(id.clone()) {
            return Err(ConfigError::DuplicateOption(name.clone()));
        }
        ids.push(id);
    }

    // Sentinel: designated name, or the last slate entry.
    let sentinel: OptionId = match &input.sentinel {
        Some(name) => {
            let id: OptionId = name
                .parse()
                .map_err(|_| ConfigError::InvalidOptionName(name.clone()))?;
            if !seen.contains(&id) {
                return Err(ConfigError::SentinelNotInSlate(name.clone()));
            }
            id
        }
        None => ids
            .last()
            .cloned()
            .ok_or(ConfigError::FewerThanTwoFundable(0))?,
    };

    let fundable = ids.iter().filter(|id| **id != sentinel).count();
    if fundable < 2 {
        return Err(ConfigError::FewerThanTwoFundable(fundable));
    }

    if input.total_budget < 0 {
        return Err(ConfigError::NegativeBudget(input.total_budget));
    }
    let budget = Amount::new(input.total_budget as u64);

    // Funding table: exactly the fundable options, no more, no less.
    let mut tiers: BTreeMap<OptionId, FundingTier> = BTreeMap::new();
    for (name, spec) in &input.funding {
        let id: OptionId = name
            .parse()
            .map_err(|_| ConfigError::InvalidOptionName(name.clone()))?;
        if id == sentinel {
            return Err(ConfigError::SentinelInFundingTable(name.clone()));
        }
        if !seen.contains(&id) {
            return Err(ConfigError::UnknownFundingEntry(name.clone()));
        }
        tiers.insert(
            id,
            FundingTier {
                extended: Amount::new(spec.extended_amount),
                standard: Amount::new(spec.standard_amount),
                two_year_eligible: spec.two_year_eligible,
            },
        );
    }

    let mut slate: Vec<SlateOption> = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        let tier = if *id == sentinel {
            None
        } else {
            Some(
                *tiers
                    .get(id)
                    .ok_or_else(|| ConfigError::MissingFundingEntry(id.to_string()))?,
            )
        };
        slate.push(SlateOption { id: id.clone(), order_index: i as u16, tier });
    }

    Ok(ValidatedConfig { slate, sentinel, budget, tiers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_io::loader::load_input_from_str;

    fn base_input(json: &str) -> TallyInput {
        load_input_from_str(json).expect("parse")
    }

    fn ok_json() -> String {
        r#"{
            "options": ["A", "B", "NONE BELOW"],
            "total_budget": 700000,
            "funding": {
                "A": { "extended_amount": 500000, "standard_amount": 300000, "two_year_eligible": true },
                "B": { "extended_amount": 600000, "standard_amount": 300000, "two_year_eligible": false }
            },
            "ballots": []
        }"#
        .to_string()
    }

    #[test]
    fn valid_input_builds_slate_with_default_sentinel() {
        let cfg = validate_input(&base_input(&ok_json())).expect("valid");
        assert_eq!(cfg.sentinel.to_string(), "NONE BELOW");
        assert_eq!(cfg.slate.len(), 3);
        assert!(cfg.slate[2].is_sentinel());
        assert_eq!(cfg.slate[0].order_index, 0);
        assert_eq!(cfg.budget, Amount::new(700_000));
        assert_eq!(cfg.tiers.len(), 2);
    }

    #[test]
    fn negative_budget_is_fatal() {
        let json = ok_json().replace("700000,", "-1,");
        assert!(matches!(
            validate_input(&base_input(&json)),
            Err(ConfigError::NegativeBudget(-1))
        ));
    }

    #[test]
    fn missing_funding_entry_is_fatal() {
        let json = ok_json().replace(
            r#""B": { "extended_amount": 600000, "standard_amount": 300000, "two_year_eligible": false }"#,
            r#""B2": { "extended_amount": 600000, "standard_amount": 300000, "two_year_eligible": false }"#,
        );
        // "B2" is not on the slate; strict validation flags it first.
        assert!(matches!(
            validate_input(&base_input(&json)),
            Err(ConfigError::UnknownFundingEntry(_))
        ));

        let json2 = r#"{
            "options": ["A", "B", "NONE BELOW"],
            "total_budget": 700000,
            "funding": {
                "A": { "extended_amount": 500000, "standard_amount": 300000, "two_year_eligible": true }
            },
            "ballots": []
        }"#;
        assert!(matches!(
            validate_input(&base_input(json2)),
            Err(ConfigError::MissingFundingEntry(_))
        ));
    }

    #[test]
    fn fewer_than_two_fundable_is_fatal() {
        let json = r#"{
            "options": ["A", "NONE BELOW"],
            "total_budget": 0,
            "funding": { "A": { "extended_amount": 1, "standard_amount": 1, "two_year_eligible": false } },
            "ballots": []
        }"#;
        assert!(matches!(
            validate_input(&base_input(json)),
            Err(ConfigError::FewerThanTwoFundable(1))
        ));
    }

    #[test]
    fn duplicate_slate_entry_is_fatal() {
        let json = ok_json().replace(r#""A", "B""#, r#""A", "A""#);
        assert!(matches!(
            validate_input(&base_input(&json)),
            Err(ConfigError::DuplicateOption(_))
        ));
    }

    #[test]
    fn designated_sentinel_must_be_listed() {
        let json = ok_json().replace(
            r#""options": ["A", "B", "NONE BELOW"],"#,
            r#""options": ["A", "B", "NONE BELOW"], "sentinel": "ABSTAIN","#,
        );
        assert!(matches!(
            validate_input(&base_input(&json)),
            Err(ConfigError::SentinelNotInSlate(_))
        ));
    }

    #[test]
    fn funding_entry_for_sentinel_is_fatal() {
        let json = ok_json().replace(
            r#""B": {"#,
            r#""NONE BELOW": { "extended_amount": 1, "standard_amount": 1, "two_year_eligible": false },
               "B": {"#,
        );
        assert!(matches!(
            validate_input(&base_input(&json)),
            Err(ConfigError::SentinelInFundingTable(_))
        ));
    }
}
