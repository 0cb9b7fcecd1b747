//! Detection of expressions whose value can never be observed.
//!
//! A jump (`return`, `next`, `break`, `redo`, `retry`) transfers control
//! before its surrounding expression produces a value. Wrapping such an
//! expression would record a value that never exists, so the collector
//! consults [`is_void`] before wrapping conditionals, groups, and
//! multiple-assignment right-hand sides.

use crate::ast::{Child, Node};

/// Whether `node`'s value escapes through unconditional control flow.
#[must_use]
pub fn is_void(node: &Node) -> bool {
    match node.kind() {
        "begin" | "kwbegin" | "resbody" => node.children.last().is_some_and(child_is_void),
        "rescue" | "ensure" => node.children.iter().any(child_is_void),
        // (if cond then else): only the branches decide
        "if" => {
            node.children.get(1).is_some_and(child_is_void)
                || node.children.get(2).is_some_and(child_is_void)
        }
        "return" | "next" | "break" | "redo" | "retry" => true,
        _ => false,
    }
}

/// [`is_void`] for a child slot; absent slots and literals are never void.
#[must_use]
pub fn child_is_void(child: &Child) -> bool {
    child.as_node().is_some_and(is_void)
}
