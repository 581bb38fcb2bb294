//! ft_core — Core types for the funding-tally engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`ft_io`, `ft_algo`, `ft_pipeline`, `ft_report`, `ft_cli`).
//!
//! - Slate/ballot tokens: `OptionId`, `VoterId`
//! - Exact fixed-point voting power (`VotingPower`, 6 decimal places)
//! - Integer currency (`Amount`) and funding tiers
//! - Slate/ballot entities
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod power;
pub mod entities;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        InvalidPower(&'static str),
        PowerOverflow,
        AmountOverflow,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::InvalidPower(k) => write!(f, "invalid voting power: {k}"),
                CoreError::PowerOverflow => write!(f, "voting power overflow"),
                CoreError::AmountOverflow => write!(f, "amount overflow"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod tokens {
    //! Slate/ballot token types (`OptionId`, `VoterId`) with strict charset.
    //!
    //! Published slate names contain spaces ("NONE BELOW"), so the charset
    //! admits a single interior space in addition to the usual token bytes.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    fn is_token(s: &str) -> bool {
        let len = s.len();
        if !(1..=64).contains(&len) {
            return false;
        }
        // No leading/trailing space; interior spaces allowed.
        if s.starts_with(' ') || s.ends_with(' ') {
            return false;
        }
        s.bytes().all(|b| matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
            b'_' | b'-' | b':' | b'.' | b'(' | b')' | b' '
        ))
    }

    macro_rules! def_token {
        ($name:ident) => {
            #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            pub struct $name(String);

            impl $name {
                pub fn as_str(&self) -> &str { &self.0 }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
            }

            impl FromStr for $name {
                type Err = CoreError;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    if is_token(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidToken) }
                }
            }
        }
    }

    def_token!(OptionId);
    def_token!(VoterId);

}

pub use entities::{Amount, Ballot, FundingTier, SlateOption};
pub use errors::CoreError;
pub use power::VotingPower;
pub use tokens::{OptionId, VoterId};
