//! Canonical JSON for PacStac attestations.
//!
//! Signers and verifiers must agree on the exact bytes that were signed even
//! when they build the same JSON object in a different field order. This crate
//! produces that byte-stable form:
//!
//! - object keys sorted the way JavaScript compares strings (UTF-16 code units)
//! - absent fields (`Option::None` members) omitted entirely
//! - arrays kept in input order
//! - numbers read as IEEE doubles and laid out the way `JSON.stringify`
//!   does; NaN and Infinity rejected
//! - standard JSON string escaping, no insignificant whitespace
//!
//! Scalars are written by `serde_jcs` (RFC 8785); object ordering and the
//! absent/non-finite checks happen here.
//!
//! Any `serde::Serialize` value can be canonicalized, including
//! `serde_json::Value` documents parsed from the wire.
//!
//! ```rust
//! use pacstac_canonical::canonicalize;
//! use serde_json::json;
//!
//! let value = json!({"sub": "alice", "aud": ["b", "a"], "n": 1.0});
//! assert_eq!(canonicalize(&value)?, r#"{"aud":["b","a"],"n":1,"sub":"alice"}"#);
//! # Ok::<(), pacstac_canonical::CanonicalizationError>(())
//! ```
//!
#![deny(missing_docs)]

/// Canonicalization entry points and error type.
pub mod canonicalizer;
/// Serde serializer into the JSON document model.
mod ser;

pub use canonicalizer::{canonical_bytes, canonicalize, CanonicalizationError};
