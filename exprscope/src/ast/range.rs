//! Half-open byte ranges into the original source text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open `[begin, end)` byte range into the source text.
///
/// Ranges are always expressed in original-text coordinates. They may nest,
/// be disjoint, or share an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Range {
    begin: usize,
    end: usize,
}

impl Range {
    /// Create a range from an offset pair.
    ///
    /// `begin` must not exceed `end`; use [`Range::spanning`] when the offsets
    /// come from untrusted arithmetic.
    #[must_use]
    pub const fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    /// Create a range from an offset pair, or `None` if `begin > end`.
    #[must_use]
    pub const fn spanning(begin: usize, end: usize) -> Option<Self> {
        if begin <= end {
            Some(Self { begin, end })
        } else {
            None
        }
    }

    /// An empty range positioned at `offset`.
    #[must_use]
    pub const fn empty_at(offset: usize) -> Self {
        Self {
            begin: offset,
            end: offset,
        }
    }

    /// Start offset (inclusive).
    #[must_use]
    pub const fn begin(&self) -> usize {
        self.begin
    }

    /// End offset (exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the range covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The slice of `text` this range covers, if it is in bounds.
    #[must_use]
    pub fn source<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.begin..self.end)
    }
}

/// Error produced when decoding a range whose begin lies past its end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range: begin {begin} is past end {end}")]
pub struct InvalidRange {
    /// The offending begin offset.
    pub begin: usize,
    /// The offending end offset.
    pub end: usize,
}

impl TryFrom<(usize, usize)> for Range {
    type Error = InvalidRange;

    fn try_from((begin, end): (usize, usize)) -> Result<Self, Self::Error> {
        Self::spanning(begin, end).ok_or(InvalidRange { begin, end })
    }
}

impl From<Range> for (usize, usize) {
    fn from(range: Range) -> Self {
        (range.begin, range.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.begin, self.end)
    }
}
