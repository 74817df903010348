use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::ser::to_document;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// A value with no JSON representation was encountered.
    #[error("unsupported JSON type: {0}")]
    UnsupportedType(String),
    /// The same object member was emitted twice.
    #[error("duplicate key detected at {0}")]
    DuplicateKey(String),
    /// Generic failure, usually a custom error raised by a `Serialize` impl.
    #[error("other error: {0}")]
    Other(String),
}

impl serde::ser::Error for CanonicalizationError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CanonicalizationError::Other(msg.to_string())
    }
}

/// Location inside the value being canonicalized, e.g. `payload.items.[2]`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Path(Vec<String>);

impl Path {
    pub(crate) fn child(&self, key: &str) -> Self {
        self.extended(key.to_owned())
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        self.extended(format!("[{}]", index))
    }

    fn extended(&self, segment: String) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Path(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("root")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

/// Produces the canonical JSON text for `value`.
///
/// The same logical value always yields the same string, independent of
/// field insertion order. Struct and map members whose value is `None` are
/// left out; a `None` anywhere else has no JSON form and is rejected.
///
/// Every number is written as the IEEE double a JSON parser would read it
/// as, so integers beyond 2^53 lose the same digits they lose in a browser.
///
/// # Errors
///
/// - [`CanonicalizationError::NonFiniteNumber`] for NaN or ±Infinity
/// - [`CanonicalizationError::UnsupportedType`] for an absent value at the
///   top level or inside an array, or a map key that is not a string
/// - [`CanonicalizationError::DuplicateKey`] when a map emits a key twice
pub fn canonicalize<T>(value: &T) -> Result<String, CanonicalizationError>
where
    T: Serialize + ?Sized,
{
    let bytes = canonical_bytes(value)?;
    String::from_utf8(bytes).map_err(|err| CanonicalizationError::Other(err.to_string()))
}

/// UTF-8 bytes of [`canonicalize`]; this is the message a signer signs.
pub fn canonical_bytes<T>(value: &T) -> Result<Vec<u8>, CanonicalizationError>
where
    T: Serialize + ?Sized,
{
    let root = Path::default();
    let document = to_document(value, &root)?.ok_or_else(|| {
        CanonicalizationError::UnsupportedType(format!("absent value at {}", root))
    })?;
    let mut out = Vec::new();
    write_value(&document, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => write_leaf(value, out),
        Value::Number(n) => {
            let double = n.as_f64().ok_or_else(|| {
                CanonicalizationError::Other(format!("number out of range: {}", n))
            })?;
            // -0 prints as 0
            let double = if double == 0.0 { 0.0 } else { double };
            write_leaf(&double, out)
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
            Ok(())
        }
        Value::Object(members) => {
            // JavaScript compares strings by UTF-16 code unit.
            let mut entries: Vec<(&String, &Value)> = members.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));

            out.push(b'{');
            for (i, (key, member)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_leaf(key, out)?;
                out.push(b':');
                write_value(member, out)?;
            }
            out.push(b'}');
            Ok(())
        }
    }
}

fn write_leaf<T>(leaf: &T, out: &mut Vec<u8>) -> Result<(), CanonicalizationError>
where
    T: Serialize + ?Sized,
{
    let bytes =
        serde_jcs::to_vec(leaf).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    out.extend_from_slice(&bytes);
    Ok(())
}
