//! Verification outcome types.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::errors::VerifyError;

/// Which reconstructed message the signature matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerifyMode {
    /// Canonical `payload` object.
    Payload,
    /// Canonical attestation with its `signature` member removed.
    AttestationWithoutSignature,
}

impl VerifyMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyMode::Payload => "payload",
            VerifyMode::AttestationWithoutSignature => "attestationWithoutSignature",
        }
    }
}

impl fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verified {
    /// Key id the signature verified under.
    pub kid: String,
    /// Message convention the issuer used.
    pub mode: VerifyMode,
}

/// Tagged result handed back to callers.
///
/// Serializes as `{"ok":true,"kid":...,"mode":...}` or
/// `{"ok":false,"error":...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationReport {
    /// Signature verified.
    Valid(Verified),
    /// Verification failed; `error` is a human-readable reason.
    Invalid {
        /// Diagnostic message.
        error: String,
    },
}

impl VerificationReport {
    /// True when the signature verified.
    pub fn is_ok(&self) -> bool {
        matches!(self, VerificationReport::Valid(_))
    }
}

impl From<Result<Verified, VerifyError>> for VerificationReport {
    fn from(result: Result<Verified, VerifyError>) -> Self {
        match result {
            Ok(verified) => VerificationReport::Valid(verified),
            Err(err) => VerificationReport::Invalid {
                error: err.to_string(),
            },
        }
    }
}

impl Serialize for VerificationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VerificationReport::Valid(verified) => {
                let mut state = serializer.serialize_struct("VerificationReport", 3)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("kid", &verified.kid)?;
                state.serialize_field("mode", &verified.mode)?;
                state.end()
            }
            VerificationReport::Invalid { error } => {
                let mut state = serializer.serialize_struct("VerificationReport", 2)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationReport::Valid(v) => write!(f, "Valid (kid={}, mode={})", v.kid, v.mode),
            VerificationReport::Invalid { error } => f.write_str(error),
        }
    }
}
