use thiserror::Error;

/// Failure to turn signature or key text into bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Hex text with an odd number of digits.
    #[error("Invalid hex length")]
    OddHexLength,
    /// Hex text containing a non-hex character.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    /// Text that is not base64 or base64url.
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),
}

/// Reasons an attestation fails offline verification.
///
/// The display strings are the diagnostics shown to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Attestation is not an object or lacks `signature.kid`/`signature.sig`.
    #[error("{0}")]
    MalformedAttestation(&'static str),
    /// JWKS has no `keys` array.
    #[error("JWKS must include keys[] (looking up kid={kid})")]
    InvalidJwks {
        /// Key id that was being resolved.
        kid: String,
    },
    /// No OKP/Ed25519 key with the requested id.
    #[error("No Ed25519 JWKS key found for kid={kid}")]
    KeyNotFound {
        /// Key id that was requested.
        kid: String,
    },
    /// Hex or base64 decoding failed.
    #[error(transparent)]
    InvalidEncoding(#[from] EncodingError),
    /// A signed message could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] pacstac_canonical::CanonicalizationError),
    /// The resolved `x` is not a valid Ed25519 public key.
    #[error("Invalid Ed25519 public key for kid={kid}: {reason}")]
    InvalidPublicKey {
        /// Key id of the offending JWK.
        kid: String,
        /// Why the key was rejected.
        reason: String,
    },
    /// The decoded signature is not 64 bytes long.
    #[error("Invalid Ed25519 signature: expected 64 bytes, got {0}")]
    InvalidSignature(usize),
    /// Neither candidate message matches the signature.
    #[error("Signature did not verify (tried payload and attestation-without-signature)")]
    SignatureMismatch,
}
