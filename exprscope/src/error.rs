//! Error types surfaced by the wrapping core.

use crate::ast::Range;
use crate::rewrite::RewriteError;

/// Errors that abort a wrap.
#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    /// The external parser rejected the program.
    #[error("{message}")]
    Syntax {
        /// The parser's message, unmodified.
        message: String,
    },
    /// The tree violated an assumption about ranges, heredocs, or void values.
    #[error("malformed range assumption in `{node_type}` node{}: {detail}", fmt_range(.range))]
    MalformedRange {
        /// Type tag of the node being processed.
        node_type: String,
        /// The offending range, when one is known.
        range: Option<Range>,
        /// What was expected.
        detail: String,
    },
    /// The edit set could not be applied.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

impl WrapError {
    /// Build a [`WrapError::MalformedRange`].
    pub fn malformed(node_type: &str, range: Option<Range>, detail: impl Into<String>) -> Self {
        Self::MalformedRange {
            node_type: node_type.to_owned(),
            range,
            detail: detail.into(),
        }
    }

    /// Whether this is a syntax error reported by the parser.
    #[must_use]
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

#[allow(clippy::ref_option)]
fn fmt_range(range: &Option<Range>) -> String {
    range.map(|r| format!(" at {r}")).unwrap_or_default()
}
