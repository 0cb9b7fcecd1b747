//! End boundary of a message send.
//!
//! A send's reported expression range inherits the (wrong) end of a heredoc
//! receiver or final argument, so the textual end of the call is rebuilt
//! from the selector, the heredoc openers and the closing parenthesis.

use crate::ast::Node;
use crate::error::WrapError;
use crate::wrap::heredoc::{corrected_range, is_heredoc};

/// Byte offset where the call expression `send` really ends.
///
/// Rules, first match wins:
/// 1. heredoc final argument: the opener's end, extended past the closing `)`
///    when the call uses parentheses;
/// 2. any other final argument: the reported expression end;
/// 3. no arguments but parentheses: just past the matching `)`;
/// 4. heredoc receiver: the selector's end;
/// 5. otherwise the reported expression end (e.g. `!x`, where the selector
///    sits at the front).
pub fn call_end(send: &Node, source: &str) -> Result<usize, WrapError> {
    let expression = send.expression().ok_or_else(|| {
        WrapError::malformed(send.kind(), None, "message send has no expression range")
    })?;

    // (send receiver :message args...)
    let last_arg = send.children.get(2..).and_then(<[_]>::last);
    let opens_paren = paren_after_selector(send, source);

    if let Some(arg) = last_arg.and_then(|arg| arg.as_node()) {
        if is_heredoc(arg, source) {
            let opener = corrected_range(arg, source).ok_or_else(|| {
                WrapError::malformed(arg.kind(), arg.expression(), "heredoc has no opening token")
            })?;
            if opens_paren.is_some() {
                return closing_paren_end(send, source, opener.end());
            }
            return Ok(opener.end());
        }
    }

    if last_arg.is_some() {
        return Ok(expression.end());
    }

    if let Some(after_selector) = opens_paren {
        return closing_paren_end(send, source, after_selector + 1);
    }

    if send.child(0).is_some_and(|receiver| is_heredoc(receiver, source)) {
        return send
            .location
            .selector
            .map(|selector| selector.end())
            .ok_or_else(|| {
                WrapError::malformed(
                    send.kind(),
                    Some(expression),
                    "heredoc receiver without a selector",
                )
            });
    }

    Ok(expression.end())
}

/// Offset of the `(` directly following the selector, if there is one.
fn paren_after_selector(send: &Node, source: &str) -> Option<usize> {
    let offset = send.location.selector?.end();
    (source.as_bytes().get(offset) == Some(&b'(')).then_some(offset)
}

/// Offset just past the first unescaped `)` at or after `from`.
fn closing_paren_end(send: &Node, source: &str, from: usize) -> Result<usize, WrapError> {
    let bytes = source.as_bytes();
    (from..bytes.len())
        .find(|&i| bytes[i] == b')' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|i| i + 1)
        .ok_or_else(|| {
            WrapError::malformed(
                send.kind(),
                send.expression(),
                format!("no closing parenthesis after offset {from}"),
            )
        })
}
