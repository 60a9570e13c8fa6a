//! File selection filters over an ordered list of file locations.
//!
//! Three filters: exact basename, regexp search on the basename, and 1-indexed
//! inclusive position ranges. Filters never de-duplicate; their output keeps
//! the order of the list they scanned.

use crate::location::basename;
use crate::range::{validate_range, ValidationError};
use regex::Regex;

/// Error raised while narrowing a file list.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// A range token was malformed or out of bounds for the current list.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The regexp could not be compiled.
    #[error("invalid regexp: {0}")]
    Pattern(#[from] regex::Error),
}

/// One filter step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    ByName(Vec<String>),
    ByRegexp(String),
    ByRange(Vec<String>),
}

/// Previous filter output when present and non-empty, otherwise the full list.
fn source<'a>(locations: &'a [String], filtered: Option<&'a [String]>) -> &'a [String] {
    match filtered {
        Some(f) if !f.is_empty() => f,
        _ => locations,
    }
}

/// Locations whose basename equals one of `names`, grouped by `names` order.
pub fn by_name(names: &[String], locations: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for name in names {
        out.extend(
            locations
                .iter()
                .filter(|loc| basename(loc) == name.as_str())
                .cloned(),
        );
    }
    out
}

/// Locations whose basename contains a match for `pattern` (unanchored search).
pub fn by_regexp(
    pattern: &str,
    locations: &[String],
    filtered: Option<&[String]>,
) -> Result<Vec<String>, FilterError> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let re = Regex::new(pattern)?;
    Ok(source(locations, filtered)
        .iter()
        .filter(|loc| re.is_match(basename(loc)))
        .cloned()
        .collect())
}

/// Concatenation of the positions each range token selects.
///
/// Every token is validated against the length of the list actually being
/// sliced; the first failure aborts with no partial result.
pub fn by_range(
    ranges: &[String],
    locations: &[String],
    filtered: Option<&[String]>,
) -> Result<Vec<String>, FilterError> {
    let src = source(locations, filtered);
    let mut out = Vec::new();
    for token in ranges {
        let range = validate_range(token, src.len())?;
        out.extend_from_slice(&src[range.as_slice_bounds()]);
    }
    Ok(out)
}

/// Runs `specs` in order, each over the previous step's output.
///
/// With no specs the full list is returned unchanged.
pub fn apply_filters(specs: &[FilterSpec], locations: &[String]) -> Result<Vec<String>, FilterError> {
    let mut current: Option<Vec<String>> = None;
    for spec in specs {
        let previous = current.as_deref();
        let next = match spec {
            FilterSpec::ByName(names) => by_name(names, source(locations, previous)),
            FilterSpec::ByRegexp(pattern) => by_regexp(pattern, locations, previous)?,
            FilterSpec::ByRange(ranges) => by_range(ranges, locations, previous)?,
        };
        tracing::debug!(filter = ?spec, selected = next.len(), "filter applied");
        current = Some(next);
    }
    Ok(current.unwrap_or_else(|| locations.to_vec()))
}
