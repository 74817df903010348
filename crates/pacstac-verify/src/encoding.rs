//! Hex and base64 decoding for signatures and JWK coordinates.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::errors::EncodingError;

/// Standard alphabet, tolerant of non-zero trailing bits like browser `atob`.
/// Input is padded before decoding, so padding must be canonical.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Decodes hex text with an optional `0x`/`0X` prefix.
///
/// ```rust
/// use pacstac_verify::encoding::decode_hex;
///
/// assert_eq!(decode_hex("0xDEADbeef")?, vec![0xde, 0xad, 0xbe, 0xef]);
/// assert!(decode_hex("abc").is_err());
/// # Ok::<(), pacstac_verify::EncodingError>(())
/// ```
pub fn decode_hex(text: &str) -> Result<Vec<u8>, EncodingError> {
    let lowered = text.trim().to_ascii_lowercase();
    let digits = lowered.strip_prefix("0x").unwrap_or(&lowered);
    if digits.len() % 2 != 0 {
        return Err(EncodingError::OddHexLength);
    }
    hex::decode(digits).map_err(|e| EncodingError::InvalidHex(e.to_string()))
}

/// Decodes base64 or base64url text, padded or not.
///
/// `-` and `_` are mapped to `+` and `/`, then `=` is appended up to a
/// multiple of four characters.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, EncodingError> {
    let mut normalized: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let remainder = normalized.len() % 4;
    if remainder != 0 {
        normalized.push_str(&"=".repeat(4 - remainder));
    }
    FORGIVING
        .decode(normalized.as_bytes())
        .map_err(|e| EncodingError::InvalidBase64(e.to_string()))
}

/// Decodes an attestation `sig` field.
///
/// Text starting with `0x` (any case) is hex; anything else is base64.
pub fn decode_signature(text: &str) -> Result<Vec<u8>, EncodingError> {
    let trimmed = text.trim();
    if has_hex_prefix(trimmed) {
        decode_hex(trimmed)
    } else {
        decode_base64(trimmed)
    }
}

fn has_hex_prefix(text: &str) -> bool {
    text.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("0x"))
}
