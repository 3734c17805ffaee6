use bytes::Bytes;

use super::RequestHead;
use super::body::errors::ExtractBufferedBodyError;
use super::body::{BodySizeLimit, BufferedBody};
use super::path::PathParams;
use super::query::QueryParams;

/// Everything a [`Decoder`](crate::Decoder) needs to know about a request.
///
/// The request head, the path parameters matched by the router and the fully
/// buffered body.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub head: RequestHead,
    pub path_params: PathParams,
    pub body: Bytes,
}

impl IncomingRequest {
    pub fn new(head: RequestHead, path_params: PathParams, body: impl Into<Bytes>) -> Self {
        Self {
            head,
            path_params,
            body: body.into(),
        }
    }

    /// Build an [`IncomingRequest`] from the parts of an [`http::Request`] and an
    /// already buffered body.
    pub fn from_parts(
        parts: http::request::Parts,
        path_params: PathParams,
        body: impl Into<Bytes>,
    ) -> Self {
        Self::new(parts.into(), path_params, body)
    }

    /// Buffer the body of `request`, enforcing `body_size_limit`.
    pub async fn from_http<B>(
        request: http::Request<B>,
        path_params: PathParams,
        body_size_limit: BodySizeLimit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();
        let head = RequestHead::from(parts);
        let body = BufferedBody::extract(&head, body, body_size_limit).await?;
        Ok(Self::new(head, path_params, body))
    }

    /// Parse the query string of the request target.
    pub fn query_params(&self) -> QueryParams {
        QueryParams::from_uri(&self.head.target)
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::Full;

    use super::*;

    #[tokio::test]
    async fn from_http_buffers_the_body() {
        let request = http::Request::put("/users/7?name=ann")
            .body(Full::new(Bytes::from_static(br#"{"age":3}"#)))
            .unwrap();
        let path_params: PathParams = [("id", "7")].into_iter().collect();

        let incoming = IncomingRequest::from_http(request, path_params, BodySizeLimit::default())
            .await
            .unwrap();
        assert_eq!(incoming.head.method, http::Method::PUT);
        assert_eq!(incoming.path_params.get("id"), Some("7"));
        assert_eq!(incoming.query_params().get("name"), Some("ann"));
        assert_eq!(&incoming.body[..], br#"{"age":3}"#);
    }
}
