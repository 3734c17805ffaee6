//! Errors that can occur while buffering the request body.
use ubyte::ByteUnit;

/// Why [`BufferedBody::extract`](super::BufferedBody::extract) failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractBufferedBodyError {
    #[error(transparent)]
    SizeLimitExceeded(#[from] SizeLimitExceeded),
    #[error(transparent)]
    UnexpectedBufferError(#[from] UnexpectedBufferError),
}

/// The body outgrew its [`BodySizeLimit`](super::BodySizeLimit).
#[derive(Debug, thiserror::Error)]
#[error("The request body is larger than the maximum size limit enforced by this server.")]
#[non_exhaustive]
pub struct SizeLimitExceeded {
    pub max_size: ByteUnit,
    /// The size advertised by the `Content-Length` header.
    ///
    /// `None` when the header is missing or malformed.
    pub content_length: Option<usize>,
}

/// The body stream itself failed.
#[derive(Debug, thiserror::Error)]
#[error("Something went wrong while reading the request body.")]
#[non_exhaustive]
pub struct UnexpectedBufferError {
    #[source]
    pub(super) source: Box<dyn std::error::Error + Send + Sync>,
}
