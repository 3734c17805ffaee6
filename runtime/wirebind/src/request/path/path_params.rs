use percent_encoding::percent_decode_str;

use super::errors::InvalidUtf8InPathParam;

/// The path parameters extracted from the URL of an incoming request, percent-decoded.
///
/// Parameters keep the order in which the router reported them.
///
/// # Example
///
/// ```rust
/// use wirebind::request::path::PathParams;
///
/// let mut router = matchit::Router::new();
/// router.insert("/address/{address_id}/home/{home_id}", ()).unwrap();
/// let matched = router.at("/address/123%20456/home/789").unwrap();
///
/// let params = PathParams::from_raw(&matched.params).unwrap();
/// assert_eq!(params.get("address_id"), Some("123 456"));
/// assert_eq!(params.get("home_id"), Some("789"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percent-decode the raw parameters reported by the router.
    ///
    /// It fails if any of the decoded values is not a well-formed UTF8 string.
    pub fn from_raw(raw: &matchit::Params<'_, '_>) -> Result<Self, InvalidUtf8InPathParam> {
        raw.iter()
            .map(|(key, value)| -> Result<_, InvalidUtf8InPathParam> {
                let decoded = percent_decode_str(value).decode_utf8().map_err(|e| {
                    InvalidUtf8InPathParam {
                        key: key.to_owned(),
                        raw_segment: value.to_owned(),
                        source: e,
                    }
                })?;
                Ok((key.to_owned(), decoded.into_owned()))
            })
            .collect()
    }

    /// Add a (decoded) parameter at the end of the list.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    /// Returns the value of the first parameter registered under the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over the parameters, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the router extracted no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PathParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut router = matchit::Router::new();
        router.insert("/address/{address_id}", ()).unwrap();
        let matched = router.at("/address/dirty%DE~%C7%1FY").unwrap();

        let err = PathParams::from_raw(&matched.params).unwrap_err();
        assert_eq!(err.key(), "address_id");
        insta::assert_snapshot!(err, @"The path parameter `address_id` is not valid UTF-8 once percent-decoded: `dirty%DE~%C7%1FY`");
    }

    #[test]
    fn first_value_wins_on_duplicate_keys() {
        let params: PathParams = [("id", "1"), ("id", "2"), ("name", "x")]
            .into_iter()
            .collect();
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("missing"), None);
    }
}
