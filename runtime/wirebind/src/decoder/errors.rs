//! Errors that can occur while decoding a request into a record.
use std::fmt;

use crate::literal::LiteralError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`Decoder::decode`](super::Decoder::decode) when decoding fails.
///
/// Decoding stops at the first error: the record may have been partially populated.
pub enum DecodeError {
    #[error(transparent)]
    /// See [`TokenError`] for details.
    Token(#[from] TokenError),
    #[error(
        "The query parameter `{wire_name}` was provided {count} times, \
but the corresponding field holds a single value"
    )]
    /// A query parameter was repeated, but its field holds a single value.
    ///
    /// Only returned when the decoder uses [`RepeatedValuePolicy::Reject`](super::RepeatedValuePolicy::Reject).
    RepeatedQueryParameter {
        /// The name of the query parameter.
        wire_name: &'static str,
        /// How many values were provided.
        count: usize,
    },
    #[error(transparent)]
    /// See [`BodyError`] for details.
    Body(#[from] BodyError),
}

/// Where a token comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Path,
    Query,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Path => f.write_str("path"),
            Origin::Query => f.write_str("query"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to decode the {origin} parameter `{wire_name}`.\n{source}")]
/// A path or query token could not be stored into its field.
pub struct TokenError {
    pub(crate) wire_name: &'static str,
    pub(crate) origin: Origin,
    #[source]
    pub(crate) source: LiteralError,
}

impl TokenError {
    /// The name of the offending parameter.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// What went wrong when storing the token.
    pub fn kind(&self) -> &LiteralError {
        &self.source
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Something went wrong when merging the request body into the record.
pub enum BodyError {
    #[error("The request body is not a valid JSON document.\n{0}")]
    /// The body is not valid JSON.
    Syntax(#[source] serde_json::Error),
    #[error("Expected the request body to be a JSON object, found {found}")]
    /// The body is valid JSON, but it isn't an object (nor `null`).
    NotAnObject {
        /// The kind of JSON value that was found, e.g. `an array`.
        found: &'static str,
    },
    #[error("Failed to deserialize `{location}` from the request body.\n{source}")]
    /// A body value could not be deserialized into its field.
    Field {
        /// The body key of the field.
        wire_name: &'static str,
        /// Where the error occurred, starting from the body key.
        location: String,
        #[source]
        source: serde_json::Error,
    },
}
