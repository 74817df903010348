//! Ed25519 key lookup in a JSON Web Key Set.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{VerifyingKey, PUBLIC_KEY_LENGTH};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::encoding::decode_base64;
use crate::errors::VerifyError;

/// Required `kty` for Ed25519 keys.
pub const KTY_OKP: &str = "OKP";
/// Required `crv` for Ed25519 keys.
pub const CRV_ED25519: &str = "Ed25519";

/// OKP JSON Web Key as published by an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (`OKP`).
    pub kty: String,
    /// Curve (`Ed25519`).
    pub crv: String,
    /// Base64url public key bytes.
    pub x: String,
    /// Key id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Declared algorithm; not consulted during verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Intended key use.
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

impl Jwk {
    /// Builds the JWK for an Ed25519 verifying key.
    pub fn ed25519(kid: impl Into<String>, key: &VerifyingKey) -> Self {
        Self {
            kty: KTY_OKP.to_string(),
            crv: CRV_ED25519.to_string(),
            x: URL_SAFE_NO_PAD.encode(key.as_bytes()),
            kid: Some(kid.into()),
            alg: Some("EdDSA".to_string()),
            key_use: Some("sig".to_string()),
        }
    }
}

/// JSON Web Key Set: `{"keys":[...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// Keys in publication order.
    pub keys: Vec<Jwk>,
}

/// Public key selected for a `kid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Key id that matched.
    pub kid: String,
    /// Position of the matching entry in `keys`.
    pub index: usize,
    /// Decoded `x` bytes.
    pub public_key: Vec<u8>,
}

impl ResolvedKey {
    /// Interprets the key bytes as an Ed25519 point.
    pub fn verifying_key(&self) -> Result<VerifyingKey, VerifyError> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] =
            self.public_key.as_slice().try_into().map_err(|_| {
                VerifyError::InvalidPublicKey {
                    kid: self.kid.clone(),
                    reason: format!(
                        "expected {} bytes, got {}",
                        PUBLIC_KEY_LENGTH,
                        self.public_key.len()
                    ),
                }
            })?;
        VerifyingKey::from_bytes(bytes).map_err(|e| VerifyError::InvalidPublicKey {
            kid: self.kid.clone(),
            reason: e.to_string(),
        })
    }
}

/// Finds the first OKP/Ed25519 key with the given `kid` and decodes its `x`.
///
/// Entries that are not objects, use another key type or curve, carry a
/// different `kid`, or have no `x` are skipped. Duplicate ids are not an
/// error; the earliest entry wins.
///
/// # Errors
///
/// - [`VerifyError::InvalidJwks`] if `jwks.keys` is missing or not an array
/// - [`VerifyError::KeyNotFound`] if nothing matches
/// - [`VerifyError::InvalidEncoding`] if the matching `x` is not base64
pub fn resolve_key(jwks: &Value, kid: &str) -> Result<ResolvedKey, VerifyError> {
    let keys = jwks
        .get("keys")
        .and_then(Value::as_array)
        .ok_or_else(|| VerifyError::InvalidJwks {
            kid: kid.to_string(),
        })?;

    let (index, x) = keys
        .iter()
        .enumerate()
        .find_map(|(index, entry)| matching_x(entry, kid).map(|x| (index, x)))
        .ok_or_else(|| VerifyError::KeyNotFound {
            kid: kid.to_string(),
        })?;

    let public_key = decode_base64(x)?;
    debug!(kid, index, candidates = keys.len(), "resolved Ed25519 key");
    Ok(ResolvedKey {
        kid: kid.to_string(),
        index,
        public_key,
    })
}

fn matching_x<'a>(entry: &'a Value, kid: &str) -> Option<&'a str> {
    if str_field(entry, "kty") != Some(KTY_OKP)
        || str_field(entry, "crv") != Some(CRV_ED25519)
        || str_field(entry, "kid") != Some(kid)
    {
        return None;
    }
    str_field(entry, "x").filter(|x| !x.is_empty())
}

fn str_field<'a>(entry: &'a Value, name: &str) -> Option<&'a str> {
    entry.get(name).and_then(Value::as_str)
}
