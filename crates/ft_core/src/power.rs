//! Exact fixed-point voting power.
//!
//! Voting power is accumulated over many ballots and drives pairwise
//! outcomes, so it must not drift: no floats, no saturation. Values are
//! stored as u128 **micro-power** (6 decimal places) and summed with checked
//! arithmetic; overflow is surfaced, never wrapped.

use crate::errors::CoreError;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// Fixed-point scale: 1 power unit == 1_000_000 micro-power.
pub const POWER_SCALE: u128 = 1_000_000;

/// Maximum fractional digits accepted when parsing.
pub const POWER_FRAC_DIGITS: usize = 6;

/// Non-negative voting power in micro-units.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VotingPower(u128);

impl VotingPower {
    pub const ZERO: VotingPower = VotingPower(0);

    /// Construct from raw micro-power units.
    #[inline]
    pub const fn from_micro(units: u128) -> Self {
        VotingPower(units)
    }

    /// Construct from whole power units.
    #[inline]
    pub const fn from_whole(units: u64) -> Self {
        VotingPower(units as u128 * POWER_SCALE)
    }

    /// Raw micro-power units.
    #[inline]
    pub const fn micro(self) -> u128 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on u128 overflow.
    #[inline]
    pub fn checked_add(self, other: VotingPower) -> Option<VotingPower> {
        self.0.checked_add(other.0).map(VotingPower)
    }
}

impl fmt::Display for VotingPower {
    /// Decimal rendering with trailing fractional zeros trimmed ("200",
    /// "12.5", "0.000001").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / POWER_SCALE;
        let frac = self.0 % POWER_SCALE;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let mut digits = alloc::format!("{frac:06}");
        while digits.ends_with('0') {
            digits.pop();
        }
        write!(f, "{whole}.{digits}")
    }
}

impl FromStr for VotingPower {
    type Err = CoreError;

    /// Strict decimal parser: optional fractional part of at most 6 digits.
    /// Signs, exponents, and empty parts are rejected — precision the engine
    /// cannot represent exactly must be rejected, not rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CoreError::InvalidPower("empty"));
        }
        let (whole_part, frac_part) = match s.split_once('.') {
            Some((w, fr)) => (w, Some(fr)),
            None => (s, None),
        };
        if whole_part.is_empty() || !whole_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidPower("integer part"));
        }
        let whole: u128 = whole_part
            .parse()
            .map_err(|_| CoreError::InvalidPower("integer part out of range"))?;

        let frac_micro: u128 = match frac_part {
            None => 0,
            Some(fr) => {
                if fr.is_empty()
                    || fr.len() > POWER_FRAC_DIGITS
                    || !fr.bytes().all(|b| b.is_ascii_digit())
                {
                    return Err(CoreError::InvalidPower("fractional part"));
                }
                let raw: u128 = fr.parse().map_err(|_| CoreError::InvalidPower("fractional part"))?;
                raw * 10u128.pow((POWER_FRAC_DIGITS - fr.len()) as u32)
            }
        };

        whole
            .checked_mul(POWER_SCALE)
            .and_then(|w| w.checked_add(frac_micro))
            .map(VotingPower)
            .ok_or(CoreError::PowerOverflow)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VotingPower {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // String-serialized so JSON round-trips stay exact.
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VotingPower {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional() {
        assert_eq!("200".parse::<VotingPower>().unwrap(), VotingPower::from_whole(200));
        assert_eq!(
            "12.5".parse::<VotingPower>().unwrap(),
            VotingPower::from_micro(12_500_000)
        );
        assert_eq!(
            "0.000001".parse::<VotingPower>().unwrap(),
            VotingPower::from_micro(1)
        );
        assert_eq!("0".parse::<VotingPower>().unwrap(), VotingPower::ZERO);
    }

    #[test]
    fn rejects_signs_exponents_and_excess_precision() {
        assert!("-1".parse::<VotingPower>().is_err());
        assert!("+1".parse::<VotingPower>().is_err());
        assert!("1e3".parse::<VotingPower>().is_err());
        assert!("1.".parse::<VotingPower>().is_err());
        assert!(".5".parse::<VotingPower>().is_err());
        assert!("1.0000001".parse::<VotingPower>().is_err());
        assert!("".parse::<VotingPower>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for s in ["0", "200", "12.5", "0.000001", "1000000.123456"] {
            let p: VotingPower = s.parse().unwrap();
            assert_eq!(p.to_string(), s);
        }
    }

    #[test]
    fn checked_add_reports_overflow() {
        let max = VotingPower::from_micro(u128::MAX);
        assert!(max.checked_add(VotingPower::from_micro(1)).is_none());
        assert_eq!(
            VotingPower::from_whole(1).checked_add(VotingPower::from_whole(2)),
            Some(VotingPower::from_whole(3))
        );
    }
}
