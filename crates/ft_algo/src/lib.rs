// crates/ft_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Core tokens and entities
pub use ft_core::{Amount, Ballot, FundingTier, OptionId, SlateOption, VotingPower};

// ----------------------------- File modules -----------------------------

pub mod pairwise;
pub mod copeland;
pub mod allocate;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use pairwise::{tally_pairwise, validate_pairwise_complete, PairError, Pairwise};
pub use copeland::{rank_copeland, CopelandError, OptionScore, Ranking};
pub use allocate::{
    allocate_budget, AllocError, AllocatedOption, AllocationOutcome, Decision, FundingAward,
    SkipReason,
};
