//! # Canonical Serialization — JCS Byte Production
//!
//! `CanonicalBytes` is the only construction path for bytes that are signed
//! (credential proofs) or hashed into version identifiers.
//!
//! ## Security Invariant
//!
//! The inner field is private. The only way to construct `CanonicalBytes` is
//! `CanonicalBytes::new()`, which rejects floats and then serializes with
//! `serde_jcs` (RFC 8785: sorted keys, compact separators). A verifier that
//! re-serializes a credential received over the wire therefore reproduces the
//! exact bytes the issuer signed, regardless of field order in transit.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No float values appear in the output.
/// - Object keys are sorted, separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// non-integer number, `CanonicalizationError::SerializationFailed` if
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        let data = serde_json::json!({"z": 1, "m": 2, "a": 3});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_bytes(), br#"{"a":3,"m":2,"z":1}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "proof": {"signature": "00", "created": "2026-01-15T12:00:00Z"},
            "type": ["VerifiableCredential", "UserCredential"]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"proof":{"created":"2026-01-15T12:00:00Z","signature":"00"},"type":["VerifiableCredential","UserCredential"]}"#
        );
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"outer": [{"amount": 1.5}]});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 1.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_field_order_independent() {
        let a = serde_json::json!({"issuer": "did:example:issuer", "id": "vc-1"});
        let b = serde_json::json!({"id": "vc-1", "issuer": "did:example:issuer"});
        assert_eq!(
            CanonicalBytes::new(&a).unwrap(),
            CanonicalBytes::new(&b).unwrap()
        );
    }

    #[test]
    fn test_null_and_bool_passthrough() {
        let data = serde_json::json!({"flag": true, "key": null});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"flag":true,"key":null}"#);
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), cb.as_ref().len());
    }
}
