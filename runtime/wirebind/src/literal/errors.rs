//! Errors that can occur while storing a literal token into a field.
use super::types::BoxError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`LiteralStore`](super::LiteralStore) when a token
/// can't be stored into its destination.
pub enum LiteralError {
    #[error("`{value}` can't be parsed as a `{expected_type}`")]
    /// The token is not a valid representation of the destination type.
    TypeMismatch {
        /// The raw token.
        value: String,
        /// The name of the destination type.
        expected_type: &'static str,
    },
    #[error("`{value}` is out of range for a `{expected_type}`")]
    /// The token is numeric, but it doesn't fit the destination type.
    Overflow {
        /// The raw token.
        value: String,
        /// The name of the destination type.
        expected_type: &'static str,
    },
    #[error("`{value}` is not a valid number literal")]
    /// The token doesn't follow the JSON number grammar.
    MalformedNumber {
        /// The raw token.
        value: String,
    },
    #[error("`{value}` is not a valid base64-encoded byte sequence.\n{source}")]
    /// The token could not be base64-decoded.
    MalformedByteSequence {
        /// The raw token.
        value: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error("Invalid use of a quoted value: `{value}` can't be stored into a `{expected_type}`")]
    /// A value coming from a quoted context doesn't fit its destination.
    InvalidQuotedUse {
        /// The raw token.
        value: String,
        /// The name of the destination type.
        expected_type: &'static str,
    },
    #[error("A `{expected_type}` can't be populated from a single token")]
    /// The destination is nested data, which tokens can't populate.
    UnsupportedShape {
        /// The name of the destination type.
        expected_type: &'static str,
    },
    #[error("There is no converter registered for `{expected_type}`")]
    MissingConverter {
        /// The name of the destination type.
        expected_type: &'static str,
    },
    #[error("`{value}` can't be parsed as a `{expected_type}`.\n{source}")]
    /// A user-provided conversion failed.
    Custom {
        /// The raw token.
        value: String,
        /// The name of the destination type.
        expected_type: &'static str,
        #[source]
        source: BoxError,
    },
}

impl LiteralError {
    pub(crate) fn type_mismatch(value: &str, expected_type: &'static str) -> Self {
        Self::TypeMismatch {
            value: value.to_owned(),
            expected_type,
        }
    }

    pub(crate) fn overflow(value: &str, expected_type: &'static str) -> Self {
        Self::Overflow {
            value: value.to_owned(),
            expected_type,
        }
    }

    /// A mismatch, reported as an invalid quoted use when the token comes
    /// from a quoted context.
    pub(crate) fn mismatch(value: &str, expected_type: &'static str, from_quoted: bool) -> Self {
        if from_quoted {
            Self::InvalidQuotedUse {
                value: value.to_owned(),
                expected_type,
            }
        } else {
            Self::type_mismatch(value, expected_type)
        }
    }
}
