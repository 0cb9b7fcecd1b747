//! Wrap-point selection.
//!
//! [`WrapPointCollector`] walks the tree once and proposes candidate ranges.
//! Each candidate is keyed by the line its range ends on; a line keeps the
//! candidate with the largest end column, and the first candidate visited
//! wins ties. The result holds at most one wrap point per line, ordered by
//! the line's first registration, which keeps nested hooks that share a
//! start offset correctly bracketed when they are spliced in.

use crate::ast::{Child, Node, Range};
use crate::constants::FAILURE_SENTINEL;
use crate::error::WrapError;
use crate::utils::LineIndex;
use crate::wrap::call_range::call_end;
use crate::wrap::heredoc::corrected_range;
use crate::wrap::policy::NodeCategory;
use crate::wrap::void_value::{child_is_void, is_void};
use indexmap::IndexMap;
use serde::Serialize;

/// Extra instruction attached to a wrap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Replace the wrapped source with the failure text.
    TotalFailure,
}

/// A range selected to be bracketed by before/after hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapPoint {
    /// The wrapped range.
    pub range: Range,
    /// Column of the range's end, used to break ties on one line.
    pub column: usize,
    /// Optional marker.
    pub marker: Option<Marker>,
}

/// Wrap points keyed by the line their range ends on, in first-registration order.
pub type WrapPoints = IndexMap<usize, WrapPoint>;

/// Minimum stack space to keep available while descending the tree.
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated when the red zone is reached.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Walks a syntax tree and records where values can be captured.
pub struct WrapPointCollector<'a> {
    /// The program text the tree was parsed from.
    source: &'a str,
    /// Helper for offset → (line, column) mapping.
    line_index: &'a LineIndex,
    /// Wrap points registered so far.
    points: WrapPoints,
}

impl<'a> WrapPointCollector<'a> {
    /// Creates a collector over `source`.
    #[must_use]
    pub fn new(source: &'a str, line_index: &'a LineIndex) -> Self {
        Self {
            source,
            line_index,
            points: WrapPoints::new(),
        }
    }

    /// Walks the tree rooted at `root` and returns the wrap-point table.
    pub fn collect(mut self, root: &Node) -> Result<WrapPoints, WrapError> {
        self.visit(root)?;
        Ok(self.points)
    }

    /// Proposes `range` as the wrap point for the line it ends on.
    ///
    /// The stored candidate is only replaced by one ending strictly further right.
    pub fn add_range(
        &mut self,
        node: &Node,
        range: Range,
        marker: Option<Marker>,
    ) -> Result<(), WrapError> {
        if range.end() > self.source.len() {
            return Err(WrapError::malformed(
                node.kind(),
                Some(range),
                format!("range ends past the source length {}", self.source.len()),
            ));
        }

        let (line, column) = self.line_index.decompose(range.end());
        match self.points.get(&line) {
            Some(existing) if existing.column >= column => {}
            _ => {
                self.points.insert(
                    line,
                    WrapPoint {
                        range,
                        column,
                        marker,
                    },
                );
            }
        }
        Ok(())
    }

    /// Proposes the node's own expression range.
    ///
    /// Synthetic nodes (no expression range, e.g. the `Encoding` constant
    /// inside `__ENCODING__`) have nothing to wrap and are skipped.
    fn add_node(&mut self, node: &Node) -> Result<(), WrapError> {
        match node.expression() {
            Some(range) => self.add_range(node, range, None),
            None => Ok(()),
        }
    }

    /// Visits one node according to its category.
    pub fn visit(&mut self, node: &Node) -> Result<(), WrapError> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || self.visit_node(node))
    }

    fn visit_node(&mut self, node: &Node) -> Result<(), WrapError> {
        match NodeCategory::of(node.kind()) {
            NodeCategory::NoOp => Ok(()),
            NodeCategory::Transparent => self.visit_children(node, 0),
            NodeCategory::Conditional => self.visit_conditional(node),
            NodeCategory::LastChild => self.visit_child(node.children.last()),
            NodeCategory::HandlerClause => {
                // (resbody exception_types variable body)
                self.visit_child(node.children.get(2))
            }
            NodeCategory::CallWithBlock => self.visit_block(node),
            NodeCategory::MultipleAssignment => self.visit_multiple_assignment(node),
            NodeCategory::Assignment => self.visit_assignment(node),
            NodeCategory::Send => self.visit_send(node),
            NodeCategory::Group => {
                // `(1)` is wrapped as a whole, `(return 1)` only inside
                let parenthesized = node
                    .source(self.source)
                    .is_some_and(|text| text.starts_with('('));
                if parenthesized && !is_void(node) {
                    self.add_node(node)?;
                }
                self.visit_children(node, 0)
            }
            NodeCategory::StringLike => match corrected_range(node, self.source) {
                Some(range) => self.add_range(node, range, None),
                None => Ok(()),
            },
            NodeCategory::Array => {
                self.add_node(node)?;
                let percent_literal = node
                    .location
                    .begin
                    .and_then(|begin| begin.source(self.source))
                    .is_some_and(|text| text.starts_with('%'));
                if percent_literal {
                    Ok(())
                } else {
                    self.visit_children(node, 0)
                }
            }
            NodeCategory::Hash => {
                // keyword arguments have no braces; wrapping them would break the call
                if node.location.begin.is_some() {
                    self.add_node(node)?;
                }
                self.visit_children(node, 0)
            }
            NodeCategory::Default => {
                self.add_node(node)?;
                self.visit_children(node, 0)
            }
        }
    }

    fn visit_child(&mut self, child: Option<&Child>) -> Result<(), WrapError> {
        match child.and_then(Child::as_node) {
            Some(node) => self.visit(node),
            None => Ok(()),
        }
    }

    fn visit_children(&mut self, node: &Node, skip: usize) -> Result<(), WrapError> {
        for child in node.child_nodes_from(skip) {
            self.visit(child)?;
        }
        Ok(())
    }

    fn visit_conditional(&mut self, node: &Node) -> Result<(), WrapError> {
        let any_void = node.children.iter().any(child_is_void);

        if node.location.question.is_some() {
            if !any_void {
                self.add_node(node)?;
            }
        } else {
            let keyword = node
                .location
                .keyword
                .and_then(|keyword| keyword.source(self.source))
                .ok_or_else(|| {
                    WrapError::malformed(
                        node.kind(),
                        node.expression(),
                        "conditional is neither a ternary nor has a keyword",
                    )
                })?;
            // `elsif` branches are covered by the enclosing `if`
            if matches!(keyword, "if" | "unless") && !any_void {
                self.add_node(node)?;
            }
        }

        self.visit_children(node, 0)
    }

    fn visit_block(&mut self, node: &Node) -> Result<(), WrapError> {
        self.add_node(node)?;

        // (block (send (send nil :a) :b) (args) body)
        //
        // Wrapping the inner send would produce `<a.b>{}`, so only its
        // receiver is visited, which still yields `<<a>\n.b {}>`.
        if let Some(call) = node.child(0) {
            if matches!(NodeCategory::of(call.kind()), NodeCategory::Send) {
                self.visit_child(call.children.first())?;
            }
        }

        self.visit_children(node, 1)
    }

    fn visit_multiple_assignment(&mut self, node: &Node) -> Result<(), WrapError> {
        // (masgn (mlhs ...) rhs)
        let Some(rhs) = node.last_child() else {
            return self.visit_children(node, 1);
        };

        let bracketed = rhs
            .source(self.source)
            .is_some_and(|text| text.starts_with('['));

        if !rhs.is("array") || bracketed {
            // `a, b = c` or `a, b = [1, <<A]`: the node's own range is right
            if !is_void(rhs) {
                self.add_node(node)?;
            }
            return self.visit_children(node, 1);
        }

        // `a, b = 1, <<A`: the implicit array's range ends with the heredoc
        // body, so the wrap range ends at the last element instead
        let begin = node.expression().map(|range| range.begin());
        let last = rhs.last_child().ok_or_else(|| {
            WrapError::malformed(
                rhs.kind(),
                rhs.expression(),
                "implicit right-hand list has no elements",
            )
        })?;
        let end = corrected_range(last, self.source).map(|range| range.end());

        if let (Some(begin), Some(end)) = (begin, end) {
            let range = self.range_for(node, begin, end)?;
            if !is_void(last) {
                self.add_range(node, range, None)?;
            }
        }

        self.visit_children(rhs, 0)
    }

    fn visit_assignment(&mut self, node: &Node) -> Result<(), WrapError> {
        // `for a in b` binds (lvasgn :a) with no value: nothing to wrap
        let Some(value) = node.last_child() else {
            return Ok(());
        };

        let begin = node.expression().map(|range| range.begin());
        let end = corrected_range(value, self.source).map(|range| range.end());
        if let (Some(begin), Some(end)) = (begin, end) {
            let range = self.range_for(node, begin, end)?;
            self.add_range(node, range, None)?;
        }

        self.visit_children(node, 1)
    }

    fn visit_send(&mut self, node: &Node) -> Result<(), WrapError> {
        if let Some(expression) = node.expression() {
            let end = call_end(node, self.source)?;
            let range = self.range_for(node, expression.begin(), end)?;
            let marker =
                (node.symbol(1) == Some(FAILURE_SENTINEL)).then_some(Marker::TotalFailure);
            self.add_range(node, range, marker)?;
        }
        self.visit_children(node, 0)
    }

    fn range_for(&self, node: &Node, begin: usize, end: usize) -> Result<Range, WrapError> {
        self.line_index.range_for(begin, end).ok_or_else(|| {
            WrapError::malformed(
                node.kind(),
                node.expression(),
                format!("cannot build a range from {begin} to {end}"),
            )
        })
    }
}

/// Collects the wrap points of the tree rooted at `root`.
pub fn collect(root: &Node, source: &str) -> Result<WrapPoints, WrapError> {
    let line_index = LineIndex::new(source);
    WrapPointCollector::new(source, &line_index).collect(root)
}
