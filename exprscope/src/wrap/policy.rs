//! Node type tag → wrapping policy.
//!
//! Every tag the collector treats specially is listed in [`KNOWN_TAGS`];
//! anything else falls back to [`NodeCategory::Default`], which wraps the
//! node and visits all of its children.

/// How the collector treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Never wrapped, children not visited.
    NoOp,
    /// Not wrapped, all children visited.
    Transparent,
    /// `if`/`unless`/ternary/modifier conditionals.
    Conditional,
    /// Only the last child carries a value.
    LastChild,
    /// A `rescue` clause; only its body is visited.
    HandlerClause,
    /// A call with a block attached.
    CallWithBlock,
    /// `a, b = ...`
    MultipleAssignment,
    /// Single-target assignment and compound assignment operators.
    Assignment,
    /// A message send.
    Send,
    /// A parenthesized group or statement sequence.
    Group,
    /// Strings, interpolated strings, backticks, regexps.
    StringLike,
    /// Array literal.
    Array,
    /// Hash literal, or brace-less keyword arguments.
    Hash,
    /// Everything else: wrap and visit all children.
    Default,
}

/// Type tags with a non-default policy.
pub const KNOWN_TAGS: &[(&str, NodeCategory)] = &[
    ("args", NodeCategory::NoOp),
    ("redo", NodeCategory::NoOp),
    ("retry", NodeCategory::NoOp),
    ("alias", NodeCategory::NoOp),
    ("undef", NodeCategory::NoOp),
    ("splat", NodeCategory::NoOp),
    ("match_current_line", NodeCategory::NoOp),
    ("rescue", NodeCategory::Transparent),
    ("ensure", NodeCategory::Transparent),
    ("return", NodeCategory::Transparent),
    ("break", NodeCategory::Transparent),
    ("next", NodeCategory::Transparent),
    ("if", NodeCategory::Conditional),
    ("when", NodeCategory::LastChild),
    ("pair", NodeCategory::LastChild),
    ("defs", NodeCategory::LastChild),
    ("class", NodeCategory::LastChild),
    ("module", NodeCategory::LastChild),
    ("sclass", NodeCategory::LastChild),
    ("resbody", NodeCategory::HandlerClause),
    ("block", NodeCategory::CallWithBlock),
    ("masgn", NodeCategory::MultipleAssignment),
    ("lvasgn", NodeCategory::Assignment),
    ("ivasgn", NodeCategory::Assignment),
    ("gvasgn", NodeCategory::Assignment),
    ("cvasgn", NodeCategory::Assignment),
    ("casgn", NodeCategory::Assignment),
    ("or_asgn", NodeCategory::Assignment),
    ("and_asgn", NodeCategory::Assignment),
    ("op_asgn", NodeCategory::Assignment),
    ("send", NodeCategory::Send),
    ("csend", NodeCategory::Send),
    ("begin", NodeCategory::Group),
    ("str", NodeCategory::StringLike),
    ("dstr", NodeCategory::StringLike),
    ("xstr", NodeCategory::StringLike),
    ("regexp", NodeCategory::StringLike),
    ("array", NodeCategory::Array),
    ("hash", NodeCategory::Hash),
];

impl NodeCategory {
    /// The category for a node type tag.
    #[must_use]
    pub fn of(kind: &str) -> Self {
        KNOWN_TAGS
            .iter()
            .find(|(tag, _)| *tag == kind)
            .map_or(Self::Default, |&(_, category)| category)
    }
}
