//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: UTF-8, **sorted object keys**, array order
//!   preserved (see `canonical_json`).
//! - Result IDs derive from canonical bytes: `TR:<sha256-hex64>`.
//! - Hex digests are lowercase.
//!
//! Use `sha256_canonical(..)` for JSON values/structs and `sha256_hex(..)`
//! for raw bytes (e.g., input-file digests).

#![forbid(unsafe_code)]

use serde::Serialize;
use serde_json::{self as sj, Value};
use sha2::{Digest, Sha256};

use crate::canonical_json::canonical_json_bytes;
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    let v: Value = sj::to_value(value).map_err(|e| IoError::Hash(e.to_string()))?;
    Ok(sha256_hex(&canonical_json_bytes(&v)))
}

/// `TR:<hex64>` — content-derived ID for a tally result artifact.
pub fn result_id_from_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    let hex64 = sha256_canonical(value)?;
    Ok(format!("TR:{hex64}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_hashing_ignores_field_order() {
        #[derive(Serialize)]
        struct T {
            b: u32,
            a: u32,
        }
        let h1 = sha256_canonical(&T { b: 2, a: 1 }).unwrap();
        let h2 = sha256_canonical(&json!({"a":1,"b":2})).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn result_id_has_prefix_and_length() {
        let id = result_id_from_canonical(&json!({"rows":[]})).unwrap();
        assert!(id.starts_with("TR:"));
        assert_eq!(id.len(), 3 + 64);
    }
}
