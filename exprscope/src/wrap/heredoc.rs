//! Range correction for heredoc literals.
//!
//! Parsers report a heredoc's expression range as running to the end of its
//! body, which sits physically below the lines that follow the opening
//! token. Only the opening token (`<<~EOS`) is in textual order with the
//! surrounding code, so every range computation that touches a heredoc uses
//! that token instead.

use crate::ast::{Node, Range};
use crate::constants::HEREDOC_OPENER_RE;

/// Node types that can be written as heredocs.
const STRING_LIKE: &[&str] = &["str", "dstr", "xstr", "regexp"];

/// Whether `node` is a string-like literal introduced by a heredoc opener.
///
/// Some strings carry no opening delimiter at all (`__FILE__`, the elements
/// of `%w[a b]`); those are never heredocs.
#[must_use]
pub fn is_heredoc(node: &Node, source: &str) -> bool {
    STRING_LIKE.contains(&node.kind())
        && node
            .location
            .begin
            .and_then(|begin| begin.source(source))
            .is_some_and(|opener| HEREDOC_OPENER_RE().is_match(opener))
}

/// The range to use for `node` in positional arithmetic.
///
/// Heredocs yield their opening token; everything else its expression range.
#[must_use]
pub fn corrected_range(node: &Node, source: &str) -> Option<Range> {
    if is_heredoc(node, source) {
        node.location.begin
    } else {
        node.expression()
    }
}
