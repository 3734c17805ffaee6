use http::{HeaderMap, Method, Uri, Version};

/// The part of an HTTP request that comes before the body.
///
/// The decoder only looks at the query string of [`target`](Self::target).
/// The rest is kept around for callers that build an
/// [`IncomingRequest`](super::IncomingRequest) by hand.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RequestHead {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The raw query string of the target URI, without the leading `?`.
    pub fn query(&self) -> &str {
        self.target.query().unwrap_or_default()
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        let http::request::Parts {
            method,
            uri,
            version,
            headers,
            ..
        } = parts;
        Self {
            method,
            target: uri,
            version,
            headers,
        }
    }
}
