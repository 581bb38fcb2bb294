//! ft_io — ingestion and artifact plumbing for the fundtally engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Wire types and strict parsing for the tally input artifact (`loader`).
//! - Ballot normalization with reject-and-report semantics (`ballots`).
//! - Canonical JSON bytes and SHA-256 hashing for reproducible result IDs
//!   (`canonical_json`, `hasher`).
//!
//! No network I/O anywhere; files are read from explicit local paths only.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for ft_io (used by loader/canonical_json/hasher).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, read, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Hashing / canonicalization errors.
    #[error("hash error: {0}")]
    Hash(String),

    /// Generic validation / invariants on the wire shape.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; report line/column via the
        // message and default the pointer to root.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

/* ---------------- Public modules (single source of truth) ---------------- */

pub mod ballots;
pub mod canonical_json;
pub mod hasher;
pub mod loader;

/* ---------------- Public prelude ---------------- */

pub mod prelude {
    pub use crate::ballots::{normalize_ballots, NormalizedBallots, RejectReason, RejectedBallot};
    pub use crate::hasher::{result_id_from_canonical, sha256_canonical, sha256_hex};
    pub use crate::loader::{load_input_from_path, load_input_from_str, TallyInput};
    pub use crate::{IoError, IoResult};
}
