//! Format negotiation.
//!
//! The representation is chosen with the `fmt` query parameter. If it is
//! repeated the first occurrence wins; if it is absent or empty the
//! configured default is used.

use tracing::warn;

use crate::domains::resources::RequestError;

/// The built-in JSON format.
pub const JSON: &str = "json";

/// Name of the query parameter selecting the format.
pub const FORMAT_PARAM: &str = "fmt";

/// Extract the requested format from a raw query string.
///
/// Returns `None` when no non-empty `fmt` parameter is present.
pub fn requested_format(query: Option<&str>) -> Result<Option<String>, RequestError> {
    let Some(query) = query else {
        return Ok(None);
    };

    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).map_err(|e| {
        warn!("Unable to parse query string [{}]: {}", query, e);
        RequestError::bad_request("Malformed query string").with_cause(e)
    })?;

    Ok(pairs
        .into_iter()
        .find(|(key, _)| key == FORMAT_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty()))
}

/// Normalise a client-supplied format: lower-cased, restricted to
/// `[a-z0-9_-]`.
///
/// Anything else can never name a template and is rejected with a 406.
pub fn normalize(format: &str) -> Result<String, RequestError> {
    let lowered = format.to_ascii_lowercase();
    let valid = !lowered.is_empty()
        && lowered
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if valid {
        Ok(lowered)
    } else {
        warn!("Rejecting format [{}]", format);
        Err(RequestError::unsupported_format(format))
    }
}

/// Content type for a representation format.
pub fn content_type(format: &str) -> &'static str {
    match format {
        JSON => "application/json",
        "html" | "htm" => "text/html; charset=utf-8",
        "xhtml" => "application/xhtml+xml",
        "xml" => "application/xml",
        "csv" => "text/csv; charset=utf-8",
        "txt" | "text" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_requested_format() {
        assert_eq!(requested_format(None).unwrap(), None);
        assert_eq!(requested_format(Some("")).unwrap(), None);
        assert_eq!(requested_format(Some("fmt=")).unwrap(), None);
        assert_eq!(
            requested_format(Some("fmt=html")).unwrap().as_deref(),
            Some("html")
        );
        assert_eq!(
            requested_format(Some("page=2&fmt=csv")).unwrap().as_deref(),
            Some("csv")
        );
    }

    #[test]
    fn test_first_format_wins() {
        assert_eq!(
            requested_format(Some("fmt=csv&fmt=json")).unwrap().as_deref(),
            Some("csv")
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("HTML").unwrap(), "html");
        assert_eq!(normalize("x-yaml").unwrap(), "x-yaml");

        let err = normalize("../secret").unwrap_err();
        assert_eq!(err.code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(err.message(), "'../secret' is not a supported format");
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("json"), "application/json");
        assert_eq!(content_type("html"), "text/html; charset=utf-8");
        assert_eq!(content_type("csv"), "text/csv; charset=utf-8");
        assert_eq!(content_type("bin"), "application/octet-stream");
    }
}
