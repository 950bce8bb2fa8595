//! Route patterns with named placeholders.
//!
//! A pattern is a `/`-separated list of segments. A segment is either a
//! literal (`editions`) or a placeholder (`{author_last}`). Leading and
//! trailing slashes are optional on both the pattern and the request path.
//!
//! Matching is by position: the request must have exactly as many segments
//! as the pattern, literal segments must be equal, and each placeholder
//! captures the segment at its position.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use super::error::RequestError;
use super::params::PathParameters;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `{` without a matching `}` (or the reverse).
    #[error("Unbalanced placeholder braces in segment '{0}'")]
    UnbalancedBraces(String),

    /// `{}` with nothing inside.
    #[error("Empty placeholder in pattern '{0}'")]
    EmptyPlaceholder(String),

    /// Placeholder name outside `[A-Za-z_][A-Za-z0-9_]*`.
    #[error("Invalid placeholder name '{0}'")]
    InvalidName(String),

    /// The same placeholder appears twice.
    #[error("Duplicate placeholder name '{0}'")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// The pattern of a singleton resource: matches only the resource root.
    pub fn root() -> Self {
        Self {
            source: String::new(),
            segments: Vec::new(),
        }
    }

    /// Compile a pattern such as `/{author_last}/{author_first}`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for raw in split_segments(pattern) {
            let segment = match raw.strip_prefix('{') {
                Some(rest) => {
                    let name = rest
                        .strip_suffix('}')
                        .ok_or_else(|| PatternError::UnbalancedBraces(raw.to_string()))?;
                    if name.is_empty() {
                        return Err(PatternError::EmptyPlaceholder(pattern.to_string()));
                    }
                    if !is_valid_name(name) {
                        return Err(PatternError::InvalidName(name.to_string()));
                    }
                    if seen.contains(&name) {
                        return Err(PatternError::DuplicateName(name.to_string()));
                    }
                    seen.push(name);
                    Segment::Placeholder(name.to_string())
                }
                None if raw.contains(['{', '}']) => {
                    return Err(PatternError::UnbalancedBraces(raw.to_string()));
                }
                None => Segment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern text as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in left-to-right order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether this pattern matches only the resource root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extract path parameters from the part of the request path that
    /// follows the resource name.
    ///
    /// A segment count or literal mismatch is a 404. A placeholder value
    /// that does not percent-decode to UTF-8 is a 400.
    pub fn extract(&self, remainder: &str) -> Result<PathParameters, RequestError> {
        let actual: Vec<&str> = split_segments(remainder).collect();

        if actual.len() != self.segments.len() {
            return Err(RequestError::not_found("Invalid resource path").with_cause(format!(
                "path '{}' has {} segment(s), pattern '{}' expects {}",
                remainder,
                actual.len(),
                self.source,
                self.segments.len()
            )));
        }

        let mut pairs = Vec::with_capacity(self.segments.len());
        for (expected, value) in self.segments.iter().zip(actual) {
            match expected {
                Segment::Literal(literal) if literal != value => {
                    return Err(
                        RequestError::not_found("Invalid resource path").with_cause(format!(
                            "segment '{}' does not match '{}' in pattern '{}'",
                            value, literal, self.source
                        )),
                    );
                }
                Segment::Literal(_) => {}
                Segment::Placeholder(name) => {
                    let decoded = urlencoding::decode(value).map_err(|e| {
                        RequestError::bad_request("Invalid path parameter").with_cause(e)
                    })?;
                    pairs.push((name.clone(), decoded.into_owned()));
                }
            }
        }

        debug!("Extracted {:?} from [{}] with [{}]", pairs, remainder, self.source);
        Ok(PathParameters::from_pairs(pairs))
    }
}

impl Default for RoutePattern {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
