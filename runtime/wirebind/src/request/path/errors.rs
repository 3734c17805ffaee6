//! Errors that can happen when decoding path parameters.
use std::str::Utf8Error;

/// A path parameter doesn't decode to valid UTF-8.
///
/// Routers hand over raw, percent-encoded segments. [`PathParams::from_raw`] decodes
/// them and fails with this error when the decoded bytes aren't UTF-8,
/// e.g. `dirty%DE~%C7%1FY` matched by `/address/{address_id}`.
///
/// [`PathParams::from_raw`]: super::PathParams::from_raw
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[error("The path parameter `{key}` is not valid UTF-8 once percent-decoded: `{raw_segment}`")]
pub struct InvalidUtf8InPathParam {
    pub(super) key: String,
    pub(super) raw_segment: String,
    #[source]
    pub(super) source: Utf8Error,
}

impl InvalidUtf8InPathParam {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The offending value, still percent-encoded.
    pub fn raw_segment(&self) -> &str {
        &self.raw_segment
    }
}
