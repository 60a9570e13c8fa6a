//! Range tokens: 1-indexed, inclusive positions over a file list.
//!
//! A token is `a` or `a-b`. Tokens with more than one `-` use the first and the
//! last number as bounds, so `1-2-5` covers positions 1 through 5.

use std::fmt;

/// Why a range token was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeErrorKind {
    /// Not digits separated by `-`.
    Malformed,
    /// Positions are 1-indexed; 0 is never valid.
    ZeroStart,
    /// Start is after end.
    Reversed,
    /// End lies past the last file.
    OutOfBounds { count: usize },
}

/// A filter range token failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range '{token}': {kind}")]
pub struct ValidationError {
    pub token: String,
    pub kind: RangeErrorKind,
}

impl fmt::Display for RangeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeErrorKind::Malformed => write!(f, "expected a number or 'from-to'"),
            RangeErrorKind::ZeroStart => write!(f, "positions start at 1"),
            RangeErrorKind::Reversed => write!(f, "start is greater than end"),
            RangeErrorKind::OutOfBounds { count } => {
                write!(f, "end exceeds the number of files ({})", count)
            }
        }
    }
}

/// Bounds of a syntactically valid token, before any count check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeToken {
    /// First position (1-indexed, inclusive).
    pub start: usize,
    /// Last position (1-indexed, inclusive).
    pub end: usize,
}

impl RangeToken {
    /// Parses `a` or `a-b` (or `a-...-b`) into bounds. Only checks syntax.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError {
            token: token.to_string(),
            kind: RangeErrorKind::Malformed,
        };
        let parts: Vec<&str> = token.split('-').collect();
        if parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(malformed());
        }
        let first = parts.first().ok_or_else(malformed)?;
        let last = parts.last().ok_or_else(malformed)?;
        let start = first.parse::<usize>().map_err(|_| malformed())?;
        let end = last.parse::<usize>().map_err(|_| malformed())?;
        Ok(Self { start, end })
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// Zero-based, half-open slice bounds: positions `a..=b` map to `a-1..b`.
    pub fn as_slice_bounds(&self) -> std::ops::Range<usize> {
        self.start.saturating_sub(1)..self.end
    }
}

/// Checks `token` against a list of `count` files: `1 <= a <= b <= count`.
pub fn validate_range(token: &str, count: usize) -> Result<RangeToken, ValidationError> {
    let range = RangeToken::parse(token)?;
    let fail = |kind| ValidationError {
        token: token.to_string(),
        kind,
    };
    if range.start == 0 {
        return Err(fail(RangeErrorKind::ZeroStart));
    }
    if range.start > range.end {
        return Err(fail(RangeErrorKind::Reversed));
    }
    if range.end > count {
        return Err(fail(RangeErrorKind::OutOfBounds { count }));
    }
    Ok(range)
}
