//! Offline verification of PacStac attestations.
//!
//! This crate provides:
//! - Hex and base64/base64url decoders for signatures and JWK coordinates
//! - Key resolution by `kid` in a JSON Web Key Set (OKP/Ed25519 only)
//! - Two-mode detached Ed25519 verification over canonical JSON
//! - A tagged `{ok, kid, mode}` / `{ok, error}` report for callers
//!
//! Core invariants:
//! - Verification is pure and offline: no key fetching, no revocation or
//!   freshness checks, no mutation of either input document
//! - The first JWKS entry matching `kid`, `kty == "OKP"` and
//!   `crv == "Ed25519"` is the only key tried
//! - The payload is tried before the attestation-without-signature envelope
//!
#![deny(missing_docs)]

/// Hex and base64 decoders.
pub mod encoding;
/// Error types for verification.
pub mod errors;
/// JWKS key resolution.
pub mod jwks;
/// Verification outcome types.
pub mod report;
/// Offline verifier.
pub mod verifier;

pub use errors::{EncodingError, VerifyError};
pub use jwks::{resolve_key, Jwk, JwkSet, ResolvedKey};
pub use report::{VerificationReport, Verified, VerifyMode};
pub use verifier::{offline_verify, verify};
