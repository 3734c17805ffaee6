use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use ubyte::ByteUnit;

use crate::request::RequestHead;

use super::BodySizeLimit;
use super::errors::{ExtractBufferedBodyError, SizeLimitExceeded, UnexpectedBufferError};

/// A request body, read to completion.
///
/// A [`Decoder`](crate::Decoder) works on complete JSON documents: the body must be
/// buffered before decoding starts.
///
/// # Size limit
///
/// Buffering stops as soon as the body grows beyond its [`BodySizeLimit`] (2 MB unless
/// configured otherwise).
/// A `Content-Length` header above the limit is rejected before a single byte is read.
///
/// # Example
///
/// ```rust
/// use http_body_util::Full;
/// use wirebind::request::RequestHead;
/// use wirebind::request::body::{BodySizeLimit, BufferedBody};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (parts, body) = http::Request::post("/orders")
///     .body(Full::new(bytes::Bytes::from_static(b"{}")))
///     .unwrap()
///     .into_parts();
/// let head = RequestHead::from(parts);
/// let buffered = BufferedBody::extract(&head, body, BodySizeLimit::default())
///     .await
///     .unwrap();
/// assert_eq!(&buffered.bytes[..], b"{}");
/// # }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub struct BufferedBody {
    pub bytes: Bytes,
}

impl BufferedBody {
    pub async fn extract<B>(
        head: &RequestHead,
        body: B,
        limit: BodySizeLimit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let bytes = match limit {
            BodySizeLimit::Enabled { max_size } => read_capped(head, body, max_size).await?,
            BodySizeLimit::Disabled => body
                .collect()
                .await
                .map_err(|e| UnexpectedBufferError { source: e.into() })?
                .to_bytes(),
        };
        Ok(Self { bytes })
    }
}

async fn read_capped<B>(
    head: &RequestHead,
    body: B,
    max_size: ByteUnit,
) -> Result<Bytes, ExtractBufferedBodyError>
where
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let declared = declared_length(head);
    let too_large = SizeLimitExceeded {
        max_size,
        content_length: declared,
    };
    if declared.is_some_and(|len| len > max_size) {
        return Err(too_large.into());
    }

    let cap = usize::try_from(max_size.as_u64()).unwrap_or(usize::MAX);
    match Limited::new(body, cap).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(too_large.into()),
        Err(e) => Err(UnexpectedBufferError { source: e }.into()),
    }
}

/// The value of the `Content-Length` header, if present and well-formed.
fn declared_length(head: &RequestHead) -> Option<usize> {
    head.headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

impl From<BufferedBody> for Bytes {
    fn from(body: BufferedBody) -> Self {
        body.bytes
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::Full;
    use ubyte::ToByteUnit;

    use super::*;

    fn head(content_length: Option<&str>) -> RequestHead {
        let mut builder = http::Request::post("/orders");
        if let Some(len) = content_length {
            builder = builder.header(CONTENT_LENGTH, len);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts.into()
    }

    fn capped(max_size: ByteUnit) -> BodySizeLimit {
        BodySizeLimit::Enabled { max_size }
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected_while_reading() {
        let body = Full::new(Bytes::from(vec![b'x'; 1000]));

        let err = BufferedBody::extract(&head(None), body, capped(100.bytes()))
            .await
            .unwrap_err();
        insta::assert_snapshot!(err, @"The request body is larger than the maximum size limit enforced by this server.");
        insta::assert_debug_snapshot!(err, @r###"
        SizeLimitExceeded(
            SizeLimitExceeded {
                max_size: ByteUnit(
                    100,
                ),
                content_length: None,
            },
        )
        "###);
    }

    #[tokio::test]
    async fn an_oversized_content_length_is_rejected_upfront() {
        // The actual body would fit.
        let body = Full::new(Bytes::from(vec![b'x'; 50]));

        let err = BufferedBody::extract(&head(Some("1000")), body, capped(100.bytes()))
            .await
            .unwrap_err();
        insta::assert_debug_snapshot!(err, @r###"
        SizeLimitExceeded(
            SizeLimitExceeded {
                max_size: ByteUnit(
                    100,
                ),
                content_length: Some(
                    1000,
                ),
            },
        )
        "###);
    }

    #[tokio::test]
    async fn bodies_within_the_limit_are_buffered() {
        let body = Full::new(Bytes::from_static(br#"{"id": 1}"#));

        let buffered = BufferedBody::extract(&head(Some("9")), body, BodySizeLimit::default())
            .await
            .unwrap();
        assert_eq!(&buffered.bytes[..], br#"{"id": 1}"#);
    }

    #[tokio::test]
    async fn a_disabled_limit_buffers_everything() {
        let body = Full::new(Bytes::from(vec![7u8; 4096]));

        let buffered = BufferedBody::extract(&head(None), body, BodySizeLimit::Disabled)
            .await
            .unwrap();
        assert_eq!(buffered.bytes.len(), 4096);
    }
}
