//! Path parameters extracted from a request path.

use std::collections::HashMap;
use std::str::FromStr;

use super::error::RequestError;

/// Read-only mapping from placeholder name to the matched path segment.
///
/// Built once per request by the router and handed to the resource handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParameters {
    values: HashMap<String, String>,
}

impl PathParameters {
    pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    /// Get a parameter value.
    ///
    /// Returns a 400 error naming the parameter when it was not captured.
    pub fn get(&self, name: &str) -> Result<&str, RequestError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RequestError::bad_request(format!("Missing path parameter '{}'", name)))
    }

    /// Get a parameter value parsed into `T`.
    ///
    /// A missing parameter and an unparsable one are both 400 errors, but
    /// with different messages.
    pub fn parse<T>(&self, name: &str) -> Result<T, RequestError>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.get(name)?;
        raw.parse().map_err(|e: T::Err| {
            RequestError::bad_request(format!("Invalid value for path parameter '{}'", name))
                .with_cause(e)
        })
    }

    /// Whether a parameter was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All parameters as a map.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Iterate over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn params() -> PathParameters {
        PathParameters::from_pairs([
            ("author_last".to_string(), "hamilton".to_string()),
            ("year".to_string(), "2004".to_string()),
        ])
    }

    #[test]
    fn test_get_present() {
        assert_eq!(params().get("author_last").unwrap(), "hamilton");
        assert!(params().contains("year"));
        assert_eq!(params().len(), 2);
    }

    #[test]
    fn test_get_missing_is_bad_request() {
        let err = params().get("author_first").unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing path parameter 'author_first'");
    }

    #[test]
    fn test_parse() {
        let year: u32 = params().parse("year").unwrap();
        assert_eq!(year, 2004);

        let err = params().parse::<u32>("author_last").unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid value for path parameter 'author_last'");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_empty() {
        let empty = PathParameters::default();
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);
    }
}
