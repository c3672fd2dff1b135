//! Typed property values and their wire shapes.
//!
//! Every value serializes inside a `{"value": ...}` envelope. The inner shape is
//! fixed per variant: scalars go in directly, secrets are wrapped in
//! `{"secret": ...}` and certificates carry both PEM blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A public certificate paired with its private key, both PEM encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificatePair {
    pub cert_pem: String,
    pub private_key_pem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Envelope", from = "Envelope")]
pub enum TypedValue {
    Plain(String),
    Integer(i64),
    Boolean(bool),
    Secret(String),
    Certificate(CertificatePair),
}

/// The semantic kind of a [`TypedValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Plain,
    Integer,
    Boolean,
    Secret,
    Certificate,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Plain => write!(f, "plain"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Secret => write!(f, "secret"),
            ValueKind::Certificate => write!(f, "certificate"),
        }
    }
}

impl TypedValue {
    pub fn plain(s: impl Into<String>) -> Self {
        Self::Plain(s.into())
    }

    pub fn secret(s: impl Into<String>) -> Self {
        Self::Secret(s.into())
    }

    pub fn certificate(cert_pem: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        Self::Certificate(CertificatePair {
            cert_pem: cert_pem.into(),
            private_key_pem: private_key_pem.into(),
        })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Plain(_) => ValueKind::Plain,
            TypedValue::Integer(_) => ValueKind::Integer,
            TypedValue::Boolean(_) => ValueKind::Boolean,
            TypedValue::Secret(_) => ValueKind::Secret,
            TypedValue::Certificate(_) => ValueKind::Certificate,
        }
    }

    /// Whether the value carries material that must not be printed or logged.
    pub fn is_sensitive(&self) -> bool {
        matches!(self, TypedValue::Secret(_) | TypedValue::Certificate(_))
    }
}

/// Human-readable rendering. Secrets and private keys are masked.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Plain(s) => write!(f, "{s}"),
            TypedValue::Integer(n) => write!(f, "{n}"),
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::Secret(_) => write!(f, "********"),
            TypedValue::Certificate(pair) => {
                write!(f, "certificate ({} bytes, key hidden)", pair.cert_pem.len())
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    value: Shape,
}

// Variant order matters for decoding: objects are tried as secrets before
// certificates, and strings never fall through to the numeric arms.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Shape {
    Plain(String),
    Integer(i64),
    Boolean(bool),
    Secret { secret: String },
    Certificate(CertificatePair),
}

impl From<TypedValue> for Envelope {
    fn from(value: TypedValue) -> Self {
        let value = match value {
            TypedValue::Plain(s) => Shape::Plain(s),
            TypedValue::Integer(n) => Shape::Integer(n),
            TypedValue::Boolean(b) => Shape::Boolean(b),
            TypedValue::Secret(secret) => Shape::Secret { secret },
            TypedValue::Certificate(pair) => Shape::Certificate(pair),
        };
        Envelope { value }
    }
}

impl From<Envelope> for TypedValue {
    fn from(envelope: Envelope) -> Self {
        match envelope.value {
            Shape::Plain(s) => TypedValue::Plain(s),
            Shape::Integer(n) => TypedValue::Integer(n),
            Shape::Boolean(b) => TypedValue::Boolean(b),
            Shape::Secret { secret } => TypedValue::Secret(secret),
            Shape::Certificate(pair) => TypedValue::Certificate(pair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_serializes_in_value_envelope() {
        let v = TypedValue::plain("apps.example.com");
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"value":"apps.example.com"}"#
        );
    }

    #[test]
    fn integer_and_boolean_are_bare_scalars() {
        assert_eq!(
            serde_json::to_value(TypedValue::Integer(3306)).unwrap(),
            json!({"value": 3306})
        );
        assert_eq!(
            serde_json::to_value(TypedValue::Boolean(false)).unwrap(),
            json!({"value": false})
        );
    }

    #[test]
    fn secret_is_wrapped_one_level_deeper() {
        let v = TypedValue::secret("secret123");
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"value":{"secret":"secret123"}}"#
        );
    }

    #[test]
    fn certificate_keeps_both_halves() {
        let v = TypedValue::certificate("CERT", "KEY");
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"value": {"cert_pem": "CERT", "private_key_pem": "KEY"}})
        );
    }

    #[test]
    fn decoding_recovers_each_variant() {
        let values = vec![
            TypedValue::plain("x"),
            TypedValue::Integer(-7),
            TypedValue::Boolean(true),
            TypedValue::secret("pw"),
            TypedValue::certificate("c", "k"),
        ];
        for v in values {
            let json = serde_json::to_string(&v).unwrap();
            let back: TypedValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v);
            assert_eq!(back.kind(), v.kind());
        }
    }

    #[test]
    fn numeric_looking_string_stays_plain() {
        let back: TypedValue = serde_json::from_str(r#"{"value":"1024-1123"}"#).unwrap();
        assert_eq!(back, TypedValue::plain("1024-1123"));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(serde_json::from_str::<TypedValue>(r#"{"value":{"other":1}}"#).is_err());
        assert!(serde_json::from_str::<TypedValue>(r#"{"secret":"x"}"#).is_err());
    }

    #[test]
    fn display_masks_sensitive_values() {
        assert_eq!(TypedValue::secret("hunter2").to_string(), "********");
        let cert = TypedValue::certificate("CERT", "PRIVATE");
        assert!(!cert.to_string().contains("PRIVATE"));
        assert!(cert.is_sensitive());
        assert!(!TypedValue::plain("a").is_sensitive());
    }
}
