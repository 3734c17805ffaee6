use http::Uri;
use indexmap::IndexMap;

/// The query parameters of an incoming request, percent-decoded.
///
/// Keys keep the order of their first appearance in the query string.
/// A key can appear more than once: every value is kept, in order.
///
/// # Example
///
/// ```rust
/// use wirebind::request::query::QueryParams;
///
/// let params = QueryParams::parse("tag=a&tag=b+c&page=2");
/// assert_eq!(params.get_all("tag"), ["a", "b c"]);
/// assert_eq!(params.get("page"), Some("2"));
/// assert!(params.get_all("missing").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    /// Parse a query string, without the leading `?`.
    ///
    /// Keys and values are decoded as `application/x-www-form-urlencoded`:
    /// `+` stands for a space, other characters may be percent-encoded.
    /// Invalid UTF8 sequences are replaced with `U+FFFD`.
    pub fn parse(query: &str) -> Self {
        let mut params: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self { params }
    }

    /// Parse the query string of `uri`, if it has one.
    pub fn from_uri(uri: &Uri) -> Self {
        Self::parse(uri.query().unwrap_or_default())
    }

    /// Returns the first value registered under the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Returns every value registered under the given key, in order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns an iterator over the keys and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_every_value() {
        let uri: Uri = "/orders?id=3&status=open&id=1&id=2".parse().unwrap();
        let params = QueryParams::from_uri(&uri);
        assert_eq!(params.get_all("id"), ["3", "1", "2"]);
        assert_eq!(params.get("id"), Some("3"));
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["id", "status"]);
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = QueryParams::parse("q=caf%C3%A9+au+lait&empty=&flag");
        assert_eq!(params.get("q"), Some("café au lait"));
        assert_eq!(params.get("empty"), Some(""));
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn missing_query_string() {
        let uri: Uri = "/orders".parse().unwrap();
        assert!(QueryParams::from_uri(&uri).is_empty());
    }
}
