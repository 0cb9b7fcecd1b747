//! Stable multi-edit rewriter.
//!
//! Every edit is anchored to a range of the *original* text, no matter how
//! many earlier edits have already changed the length of the working copy.
//! Edits are sorted by `(position, insertion index)` and applied in a single
//! left-to-right pass that carries a running length adjustment, so edits
//! sharing a position land in the order they were added.
//!
//! # Usage
//!
//! ```
//! use exprscope::ast::Range;
//! use exprscope::rewrite::StableRewriter;
//!
//! let mut rewriter = StableRewriter::new("1 + 2");
//! rewriter.insert_before(Range::new(0, 5), "(");
//! rewriter.insert_after(Range::new(0, 5), ")");
//! rewriter.insert_before(Range::new(0, 1), "[");
//! rewriter.insert_after(Range::new(0, 1), "]");
//! assert_eq!(rewriter.apply().expect("should apply"), "([1] + 2)");
//! ```

use crate::ast::Range;
use std::fmt;

/// How an edit changes the text around its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Insert text in front of the anchor, keeping the anchored content.
    InsertBefore,
    /// Insert text behind the anchor, keeping the anchored content.
    InsertAfter,
    /// Substitute the anchored content.
    Replace,
}

/// A single edit operation, anchored in original-text coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The original-text range this edit is relative to.
    pub anchor: Range,
    /// What the edit does to its anchor.
    pub kind: EditKind,
    /// Inserted or substituted text.
    pub text: String,
}

impl Edit {
    /// Insert `text` before `anchor`.
    #[must_use]
    pub fn insert_before(anchor: Range, text: impl Into<String>) -> Self {
        Self {
            anchor,
            kind: EditKind::InsertBefore,
            text: text.into(),
        }
    }

    /// Insert `text` after `anchor`.
    #[must_use]
    pub fn insert_after(anchor: Range, text: impl Into<String>) -> Self {
        Self {
            anchor,
            kind: EditKind::InsertAfter,
            text: text.into(),
        }
    }

    /// Replace the content of `anchor` with `text`.
    #[must_use]
    pub fn replace(anchor: Range, text: impl Into<String>) -> Self {
        Self {
            anchor,
            kind: EditKind::Replace,
            text: text.into(),
        }
    }

    /// The original-text span this edit overwrites.
    ///
    /// Insertions overwrite an empty span at the matching side of the anchor.
    #[must_use]
    pub const fn splice(&self) -> Range {
        match self.kind {
            EditKind::InsertBefore => Range::empty_at(self.anchor.begin()),
            EditKind::InsertAfter => Range::empty_at(self.anchor.end()),
            EditKind::Replace => self.anchor,
        }
    }

    /// Change in text length caused by this edit.
    #[must_use]
    pub fn length_delta(&self) -> isize {
        self.text.len() as isize - self.splice().len() as isize
    }
}

/// Where a sorted edit lands in the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSplice {
    /// Index of the edit in insertion order.
    pub edit_index: usize,
    /// The edit's original-text splice span.
    pub original: Range,
    /// Start offset in the working copy when this edit is applied.
    pub begin: usize,
    /// End offset in the working copy when this edit is applied.
    pub end: usize,
    /// Cumulative adjustment of all edits applied before this one.
    pub adjustment: isize,
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// Edit anchor is out of bounds of the original text
    OutOfBounds {
        /// Index of the bad edit
        edit_index: usize,
        /// End byte of the anchor
        end_byte: usize,
        /// Length of the source
        source_len: usize,
    },
    /// An earlier edit shrank the text so much that this one no longer fits
    ShiftedOutOfBounds {
        /// Index of the bad edit
        edit_index: usize,
        /// Computed (possibly negative) start in the working copy
        position: isize,
    },
    /// Edit would split a multi-byte character
    NotCharBoundary {
        /// Index of the bad edit
        edit_index: usize,
        /// Offending byte offset
        offset: usize,
    },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                edit_index,
                end_byte,
                source_len,
            } => {
                write!(
                    f,
                    "Edit {edit_index} out of bounds: end_byte {end_byte} > source length {source_len}"
                )
            }
            Self::ShiftedOutOfBounds {
                edit_index,
                position,
            } => {
                write!(
                    f,
                    "Edit {edit_index} shifted out of bounds by earlier edits: position {position}"
                )
            }
            Self::NotCharBoundary { edit_index, offset } => {
                write!(
                    f,
                    "Edit {edit_index} at byte {offset} is not on a character boundary"
                )
            }
        }
    }
}

impl std::error::Error for RewriteError {}

/// Rewriter that applies possibly co-located edits in a stable order.
#[derive(Debug, Clone)]
pub struct StableRewriter {
    /// Original source code
    source: String,
    /// Pending edits, in insertion order
    edits: Vec<Edit>,
}

impl StableRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Add multiple edits
    pub fn add_edits(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.edits.extend(edits);
    }

    /// Queue an insertion in front of `anchor`.
    pub fn insert_before(&mut self, anchor: Range, text: impl Into<String>) {
        self.add_edit(Edit::insert_before(anchor, text));
    }

    /// Queue an insertion behind `anchor`.
    pub fn insert_after(&mut self, anchor: Range, text: impl Into<String>) {
        self.add_edit(Edit::insert_after(anchor, text));
    }

    /// Queue a replacement of `anchor`.
    pub fn replace(&mut self, anchor: Range, text: impl Into<String>) {
        self.add_edit(Edit::replace(anchor, text));
    }

    /// Pending edits in insertion order.
    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Get the number of pending edits
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Validate anchors against the original text without applying them.
    ///
    /// # Errors
    /// Returns error if an anchor is out of bounds or splits a character
    pub fn validate(&self) -> Result<(), RewriteError> {
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.anchor.end() > self.source.len() {
                return Err(RewriteError::OutOfBounds {
                    edit_index: i,
                    end_byte: edit.anchor.end(),
                    source_len: self.source.len(),
                });
            }
            for offset in [edit.anchor.begin(), edit.anchor.end()] {
                if !self.source.is_char_boundary(offset) {
                    return Err(RewriteError::NotCharBoundary {
                        edit_index: i,
                        offset,
                    });
                }
            }
        }
        Ok(())
    }

    /// Sort the edits and compute where each one lands in the working copy.
    ///
    /// # Errors
    /// Returns error if an anchor is invalid, or if an earlier edit moves a
    /// later one outside the working copy
    pub fn plan(&self) -> Result<Vec<PlannedSplice>, RewriteError> {
        self.validate()?;

        let mut order: Vec<usize> = (0..self.edits.len()).collect();
        // Sort by position, then insertion index (sort_by_key is stable, but be explicit)
        order.sort_by_key(|&i| (self.edits[i].splice().begin(), i));

        let mut adjustment: isize = 0;
        let mut working_len = self.source.len() as isize;
        let mut planned = Vec::with_capacity(order.len());

        for edit_index in order {
            let edit = &self.edits[edit_index];
            let original = edit.splice();
            let position = original.begin() as isize + adjustment;
            let end = position + original.len() as isize;
            if position < 0 || end > working_len {
                return Err(RewriteError::ShiftedOutOfBounds {
                    edit_index,
                    position,
                });
            }

            planned.push(PlannedSplice {
                edit_index,
                original,
                begin: position.unsigned_abs(),
                end: end.unsigned_abs(),
                adjustment,
            });

            adjustment += edit.length_delta();
            working_len += edit.length_delta();
        }

        Ok(planned)
    }

    /// Apply all edits and return the rewritten source
    ///
    /// # Errors
    /// Returns error if an anchor is invalid or cannot be placed in the working copy
    pub fn apply(self) -> Result<String, RewriteError> {
        let planned = self.plan()?;
        let mut result = self.source;

        for splice in planned {
            for offset in [splice.begin, splice.end] {
                if !result.is_char_boundary(offset) {
                    return Err(RewriteError::NotCharBoundary {
                        edit_index: splice.edit_index,
                        offset,
                    });
                }
            }
            result.replace_range(splice.begin..splice.end, &self.edits[splice.edit_index].text);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replacement() {
        let mut rewriter = StableRewriter::new("hello world");
        rewriter.replace(Range::new(0, 5), "hi");

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "hi world");
    }

    #[test]
    fn test_insertions_keep_anchored_content() {
        let mut rewriter = StableRewriter::new("hello world");
        rewriter.insert_before(Range::new(6, 11), "big ");
        rewriter.insert_after(Range::new(0, 5), ",");

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "hello, big world");
    }

    #[test]
    fn test_colocated_edits_apply_in_insertion_order() {
        let mut rewriter = StableRewriter::new("ab");
        rewriter.insert_before(Range::new(1, 2), "1");
        rewriter.insert_before(Range::new(1, 2), "2");
        rewriter.insert_after(Range::new(0, 1), "0");

        // insert_after(0..1) lands at offset 1 but was added last
        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "a120b");
    }

    #[test]
    fn test_insert_then_replace_at_same_position() {
        let mut rewriter = StableRewriter::new("x = f()");
        let call = Range::new(4, 7);
        rewriter.insert_before(call, "<");
        rewriter.replace(call, "FAIL");
        rewriter.insert_after(call, ">");

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "x = <FAIL>");
    }

    #[test]
    fn test_nested_ranges_sharing_a_start() {
        // a.b.c with points for `a.b.c`, `a.b`, `a` registered outermost first
        let mut rewriter = StableRewriter::new("a.b.c");
        for (end, open, close) in [(5, "<3", ">3"), (3, "<2", ">2"), (1, "<1", ">1")] {
            rewriter.insert_before(Range::new(0, end), open);
            rewriter.insert_after(Range::new(0, end), close);
        }

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "<3<2<1a>1.b>2.c>3");
    }

    #[test]
    fn test_plan_tracks_cumulative_adjustment() {
        let mut rewriter = StableRewriter::new("one two three");
        rewriter.replace(Range::new(4, 7), "2");
        rewriter.insert_before(Range::new(0, 3), ">>");
        rewriter.insert_after(Range::new(8, 13), "!");

        let plan = rewriter.plan().expect("should plan");
        let order: Vec<usize> = plan.iter().map(|s| s.edit_index).collect();
        assert_eq!(order, vec![1, 0, 2]);

        let mut expected_adjustment = 0;
        for splice in &plan {
            assert_eq!(splice.adjustment, expected_adjustment);
            assert_eq!(
                splice.begin as isize,
                splice.original.begin() as isize + expected_adjustment
            );
            expected_adjustment += rewriter.edits()[splice.edit_index].length_delta();
        }

        assert_eq!(rewriter.apply().expect("should apply"), ">>one 2 three!");
    }

    #[test]
    fn test_apply_is_deterministic() {
        let build = || {
            let mut rewriter = StableRewriter::new("x = [1, 2]");
            rewriter.insert_before(Range::new(0, 10), "(");
            rewriter.insert_before(Range::new(4, 10), "(");
            rewriter.insert_after(Range::new(4, 10), ")");
            rewriter.insert_after(Range::new(0, 10), ")");
            rewriter
        };
        let first = build().apply().expect("should apply");
        let second = build().apply().expect("should apply");
        assert_eq!(first, second);
        assert_eq!(first, "(x = ([1, 2]))");
    }

    #[test]
    fn test_out_of_bounds_error() {
        let mut rewriter = StableRewriter::new("short");
        rewriter.replace(Range::new(0, 100), "long");

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OutOfBounds { .. })));
    }

    #[test]
    fn test_anchor_swallowed_by_earlier_replacement() {
        let mut rewriter = StableRewriter::new("abcdef");
        rewriter.replace(Range::new(0, 6), "");
        rewriter.insert_after(Range::new(0, 4), "!");

        let result = rewriter.apply();
        assert!(matches!(
            result,
            Err(RewriteError::ShiftedOutOfBounds {
                edit_index: 1,
                position: -2
            })
        ));
    }

    #[test]
    fn test_multibyte_boundary_error() {
        let mut rewriter = StableRewriter::new("é");
        rewriter.insert_before(Range::new(1, 2), "x");

        let result = rewriter.apply();
        assert!(matches!(
            result,
            Err(RewriteError::NotCharBoundary { offset: 1, .. })
        ));
    }

    #[test]
    fn test_empty_edits() {
        let source = "hello world";
        let rewriter = StableRewriter::new(source);
        assert_eq!(rewriter.edit_count(), 0);
        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, source);
    }
}
