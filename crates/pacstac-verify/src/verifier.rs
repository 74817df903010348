//! Offline two-mode Ed25519 verification.

use ed25519_dalek::{Signature, Verifier};
use pacstac_canonical::{canonical_bytes, CanonicalizationError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::encoding::decode_signature;
use crate::errors::VerifyError;
use crate::jwks::resolve_key;
use crate::report::{VerificationReport, Verified, VerifyMode};

const NOT_AN_OBJECT: &str = "Attestation must be a JSON object";
const MISSING_SIGNATURE: &str =
    "Expected attestation.signature.kid and attestation.signature.sig";

/// Canonical message bytes, or `None` when the convention does not apply.
type Candidate = Option<Result<Vec<u8>, CanonicalizationError>>;
type MessageBuilder = fn(&Map<String, Value>) -> Candidate;

/// Candidates in the order they are tried.
const CANDIDATES: [(VerifyMode, MessageBuilder); 2] = [
    (VerifyMode::Payload, payload_message),
    (VerifyMode::AttestationWithoutSignature, envelope_message),
];

fn payload_message(attestation: &Map<String, Value>) -> Candidate {
    attestation
        .get("payload")
        .and_then(Value::as_object)
        .map(canonical_bytes)
}

/// The attestation minus `signature`, as a borrowed view; the input is untouched.
fn envelope_message(attestation: &Map<String, Value>) -> Candidate {
    let without_signature: BTreeMap<&str, &Value> = attestation
        .iter()
        .filter(|(key, _)| key.as_str() != "signature")
        .map(|(key, value)| (key.as_str(), value))
        .collect();
    Some(canonical_bytes(&without_signature))
}

fn signature_fields(attestation: &Map<String, Value>) -> Option<(&str, &str)> {
    let signature = attestation.get("signature")?;
    let kid = signature.get("kid")?.as_str()?;
    let sig = signature.get("sig")?.as_str()?;
    Some((kid, sig))
}

/// Verifies a detached Ed25519 signature on an attestation against a JWKS.
///
/// The key is the first OKP/Ed25519 entry of `jwks.keys` whose `kid`
/// matches `attestation.signature.kid`. The signature (`signature.sig`, hex
/// when prefixed `0x`, base64/base64url otherwise) is checked against:
///
/// 1. the canonical `payload` object, when present, then
/// 2. the canonical attestation without its `signature` member.
///
/// Neither input is modified.
///
/// # Example
///
/// ```rust
/// use base64::{engine::general_purpose::STANDARD, Engine};
/// use ed25519_dalek::{Signer, SigningKey};
/// use pacstac_verify::{verify, Jwk, JwkSet, VerifyMode};
/// use serde_json::json;
///
/// let signing_key = SigningKey::from_bytes(&[7; 32]);
/// let signature = signing_key.sign(br#"{"sub":"alice"}"#);
/// let attestation = json!({
///     "payload": { "sub": "alice" },
///     "signature": { "kid": "k1", "sig": STANDARD.encode(signature.to_bytes()) }
/// });
/// let jwks = serde_json::to_value(JwkSet {
///     keys: vec![Jwk::ed25519("k1", &signing_key.verifying_key())],
/// })?;
///
/// let verified = verify(&attestation, &jwks)?;
/// assert_eq!(verified.mode, VerifyMode::Payload);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn verify(attestation: &Value, jwks: &Value) -> Result<Verified, VerifyError> {
    let envelope = attestation
        .as_object()
        .ok_or(VerifyError::MalformedAttestation(NOT_AN_OBJECT))?;
    let (kid, sig) =
        signature_fields(envelope).ok_or(VerifyError::MalformedAttestation(MISSING_SIGNATURE))?;

    let key = resolve_key(jwks, kid)?;
    let signature_bytes = decode_signature(sig)?;
    let verifying_key = key.verifying_key()?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|_| VerifyError::InvalidSignature(signature_bytes.len()))?;

    for (mode, build) in CANDIDATES {
        let Some(message) = build(envelope) else {
            debug!(kid, %mode, "candidate not applicable");
            continue;
        };
        let message = message?;
        if verifying_key.verify(&message, &signature).is_ok() {
            debug!(kid, %mode, bytes = message.len(), "signature verified");
            return Ok(Verified {
                kid: kid.to_string(),
                mode,
            });
        }
        debug!(kid, %mode, bytes = message.len(), "signature did not match candidate");
    }

    Err(VerifyError::SignatureMismatch)
}

/// [`verify`] folded into the tagged report; never fails.
pub fn offline_verify(attestation: &Value, jwks: &Value) -> VerificationReport {
    VerificationReport::from(verify(attestation, jwks))
}
