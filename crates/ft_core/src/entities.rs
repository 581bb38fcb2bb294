//! Slate and ballot entities.
//!
//! All money is integer currency units (`Amount`); the engine never holds
//! floating-point currency. The cutoff sentinel is the one slate entry with
//! no funding tier.

use crate::power::VotingPower;
use crate::tokens::{OptionId, VoterId};
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer currency units.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[inline]
    pub const fn new(units: u64) -> Self {
        Amount(units)
    }

    #[inline]
    pub const fn units(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    #[inline]
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Funding-tier parameters for one fundable option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FundingTier {
    pub extended: Amount,
    pub standard: Amount,
    pub two_year_eligible: bool,
}

/// One entry of the published slate.
///
/// `order_index` is the entry's ordinal position in the published slate and
/// is the final deterministic tie-break key. The sentinel carries no tier.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlateOption {
    pub id: OptionId,
    pub order_index: u16,
    pub tier: Option<FundingTier>,
}

impl SlateOption {
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.tier.is_none()
    }
}

/// One voter's validated submission: a total order over the full slate,
/// most preferred first. Immutable once accepted into the pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ballot {
    pub voter: VoterId,
    pub power: VotingPower,
    pub ranking: Vec<OptionId>,
}
