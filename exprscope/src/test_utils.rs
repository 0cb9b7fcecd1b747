//! Helpers for building parser output by hand.
//!
//! Tests describe a program's source text and then assemble the tree an
//! external parser would report for it, locating every range by substring
//! so offsets never have to be counted manually.
#![allow(clippy::panic)]

use crate::ast::{Child, Node, Range};

/// Locates ranges inside a source text by substring.
#[derive(Debug, Clone, Copy)]
pub struct Spans<'a> {
    source: &'a str,
}

impl<'a> Spans<'a> {
    /// Wraps the source text to search.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// The source text being searched.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Range of the first occurrence of `needle`.
    ///
    /// # Panics
    ///
    /// Panics if `needle` does not occur in the source.
    #[must_use]
    pub fn of(&self, needle: &str) -> Range {
        self.nth(needle, 0)
    }

    /// Range of the `n`th (0-based) occurrence of `needle`.
    ///
    /// # Panics
    ///
    /// Panics if `needle` occurs fewer than `n + 1` times.
    #[must_use]
    pub fn nth(&self, needle: &str, n: usize) -> Range {
        let begin = self
            .source
            .match_indices(needle)
            .nth(n)
            .map(|(begin, _)| begin)
            .unwrap_or_else(|| panic!("{needle:?} occurrence {n} not found in {:?}", self.source));
        Range::new(begin, begin + needle.len())
    }

    /// Range from the start of `first` to the end of `last` (first occurrences).
    #[must_use]
    pub fn between(&self, first: &str, last: &str) -> Range {
        Range::new(self.of(first).begin(), self.of(last).end())
    }

    /// Range covering the whole source.
    #[must_use]
    pub fn all(&self) -> Range {
        Range::new(0, self.source.len())
    }
}

/// A node with an expression range.
#[must_use]
pub fn node(kind: &str, range: Range, children: impl IntoIterator<Item = Child>) -> Node {
    let mut node = Node::new(kind, children.into_iter().collect());
    node.location.expression = Some(range);
    node
}

/// A literal-valued leaf such as `(int 1)` or `(lvar :x)`.
#[must_use]
pub fn leaf(kind: &str, range: Range, value: impl Into<serde_json::Value>) -> Node {
    node(kind, range, [Child::Literal(value.into())])
}

/// A symbol child (method names, variable names).
#[must_use]
pub fn sym(name: &str) -> Child {
    Child::symbol(name)
}

/// An absent child slot.
#[must_use]
pub fn nil() -> Child {
    Child::Absent
}

/// Builder methods for auxiliary location ranges.
pub trait WithLocation: Sized {
    /// Set the opening delimiter range.
    #[must_use]
    fn with_begin(self, range: Range) -> Self;
    /// Set the keyword range.
    #[must_use]
    fn with_keyword(self, range: Range) -> Self;
    /// Set the selector range.
    #[must_use]
    fn with_selector(self, range: Range) -> Self;
    /// Set the ternary `?` and `:` ranges.
    #[must_use]
    fn with_ternary(self, question: Range, colon: Range) -> Self;
}

impl WithLocation for Node {
    fn with_begin(mut self, range: Range) -> Self {
        self.location.begin = Some(range);
        self
    }

    fn with_keyword(mut self, range: Range) -> Self {
        self.location.keyword = Some(range);
        self
    }

    fn with_selector(mut self, range: Range) -> Self {
        self.location.selector = Some(range);
        self
    }

    fn with_ternary(mut self, question: Range, colon: Range) -> Self {
        self.location.question = Some(question);
        self.location.colon = Some(colon);
        self
    }
}
