use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::LiteralError;
use super::number::is_valid_number;

/// A boxed error, as returned by user-provided conversions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A type that parses its own textual representation.
///
/// Mark a field with `#[wire(custom)]` to populate it through this trait
/// instead of the built-in rules for its shape.
/// The raw token is passed through untouched: in the JSON literal syntax,
/// surrounding quotes are part of it.
///
/// # Example
///
/// ```rust
/// use wirebind::literal::{BoxError, FromRawText};
///
/// #[derive(Default)]
/// pub struct Checkmark(bool);
///
/// impl FromRawText for Checkmark {
///     fn from_raw_text(&mut self, raw: &str) -> Result<(), BoxError> {
///         self.0 = raw.trim_matches('"') == "✓";
///         Ok(())
///     }
/// }
/// ```
pub trait FromRawText {
    fn from_raw_text(&mut self, raw: &str) -> Result<(), BoxError>;
}

/// A sequence of bytes, encoded as standard (padded) base64 on the wire.
///
/// Both literal tokens and JSON body values are expected to be base64 strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Blob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Blob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Blob)
            .map_err(D::Error::custom)
    }
}

/// A number kept as its original text.
///
/// The text is guaranteed to follow the JSON number grammar
/// (see [`is_valid_number`]). Use it when the precision of the wire
/// representation must be preserved, or when the numeric type is only known later.
///
/// # Precision of body values
///
/// Path and query tokens are always kept verbatim, and so are JSON strings holding a number.
/// A bare JSON number in the request body keeps its exact text only with the
/// `arbitrary_precision` feature: otherwise `serde_json` parses it as a `u64`, `i64` or `f64`
/// first, and the text is the one of that value (e.g. `12.50` becomes `12.5`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawNumber(String);

impl RawNumber {
    /// Validate `text` against the JSON number grammar.
    pub fn new(text: impl Into<String>) -> Result<Self, LiteralError> {
        let text = text.into();
        if is_valid_number(&text) {
            Ok(Self(text))
        } else {
            Err(LiteralError::MalformedNumber { value: text })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok().filter(|n: &f64| n.is_finite())
    }
}

impl Default for RawNumber {
    fn default() -> Self {
        Self("0".into())
    }
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RawNumber {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RawNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match serde_json::Number::from_str(&self.0) {
            Ok(n) => n.serialize(serializer),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    /// Accepts either a JSON number or a string holding one.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            serde_json::Value::String(s) => RawNumber::new(s).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a number or a numeric string, found `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_uses_padded_base64_in_json() {
        let blob: Blob = serde_json::from_str("\"aGVsbG8=\"").unwrap();
        assert_eq!(&*blob, b"hello");
        assert_eq!(serde_json::to_string(&blob).unwrap(), "\"aGVsbG8=\"");

        assert!(serde_json::from_str::<Blob>("\"aGVsbG8\"").is_err());
    }

    #[test]
    fn raw_number_keeps_the_original_text() {
        let n: RawNumber = serde_json::from_str("\"-12.50e3\"").unwrap();
        assert_eq!(n.as_str(), "-12.50e3");
        assert_eq!(n.as_f64(), Some(-12500.0));

        let n: RawNumber = serde_json::from_str("42").unwrap();
        assert_eq!(n.as_i64(), Some(42));

        assert!(serde_json::from_str::<RawNumber>("\"12a\"").is_err());
        assert!(serde_json::from_str::<RawNumber>("true").is_err());
    }

    #[test]
    fn numeric_strings_keep_their_precision() {
        let n: RawNumber = serde_json::from_str("\"12345678901234567890123.50\"").unwrap();
        assert_eq!(n.as_str(), "12345678901234567890123.50");
    }

    #[cfg(not(feature = "arbitrary_precision"))]
    #[test]
    fn bare_numbers_are_rounded_without_arbitrary_precision() {
        let n: RawNumber = serde_json::from_str("12345678901234567890123.50").unwrap();
        assert_ne!(n.as_str(), "12345678901234567890123.50");
        assert_eq!(n.as_f64(), Some(12345678901234567890123.50));
    }

    #[cfg(feature = "arbitrary_precision")]
    #[test]
    fn bare_numbers_keep_their_text_with_arbitrary_precision() {
        let n: RawNumber = serde_json::from_str("12345678901234567890123.50").unwrap();
        assert_eq!(n.as_str(), "12345678901234567890123.50");
    }
}
