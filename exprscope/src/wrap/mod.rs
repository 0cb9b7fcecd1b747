//! Expression wrapping.
//!
//! [`WrapExpressions`] ties the pieces together: the collector picks one
//! wrap point per line, the hooks supply the text for each point, and the
//! rewriter splices everything into the original program in one pass.

pub mod call_range;
pub mod collector;
pub mod heredoc;
pub mod hooks;
pub mod policy;
pub mod void_value;

pub use collector::{collect, Marker, WrapPoint, WrapPointCollector, WrapPoints};
pub use hooks::{Hooks, NoHooks, TemplateHooks};

use crate::ast::{Node, Range};
use crate::constants::{DATA_SEGMENT, FAILURE_TEXT};
use crate::error::WrapError;
use crate::parser::{ParsedProgram, SourceParser};
use crate::rewrite::{Edit, StableRewriter};

/// Wraps the expressions of one parsed program.
#[derive(Debug, Clone, Copy)]
pub struct WrapExpressions<'a> {
    source: &'a str,
    root: Option<&'a Node>,
}

impl<'a> WrapExpressions<'a> {
    /// Prepares to wrap `source`, whose parse result is `parsed`.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::Syntax`] if the parser rejected the program.
    pub fn new(source: &'a str, parsed: &'a ParsedProgram) -> Result<Self, WrapError> {
        if let Some(message) = &parsed.error {
            return Err(WrapError::Syntax {
                message: message.clone(),
            });
        }
        Ok(Self {
            source,
            root: parsed.ast.as_ref(),
        })
    }

    /// The program's root node and its range, if there is anything to wrap.
    fn root(&self) -> Option<(&'a Node, Range)> {
        let root = self.root?;
        Some((root, root.expression()?))
    }

    /// Collects the wrap points of the program.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::MalformedRange`] if the tree contradicts the source.
    pub fn points(&self) -> Result<WrapPoints, WrapError> {
        match self.root() {
            Some((root, _)) => collect(root, self.source),
            None => Ok(WrapPoints::new()),
        }
    }

    /// The edits that wrap `points` with `hooks`, in insertion order.
    pub fn edits(&self, points: &WrapPoints, hooks: &impl Hooks) -> Vec<Edit> {
        let Some((_, root)) = self.root() else {
            return Vec::new();
        };

        let mut edits = Vec::with_capacity(points.len() * 2 + 2);
        edits.push(Edit::insert_before(root, hooks.before_all()));
        for (&line, point) in points {
            edits.push(Edit::insert_before(point.range, hooks.before_each(line)));
            if point.marker == Some(Marker::TotalFailure) {
                edits.push(Edit::replace(point.range, FAILURE_TEXT));
            }
            edits.push(Edit::insert_after(point.range, hooks.after_each(line)));
        }
        edits.push(Edit::insert_after(root, self.after_all_text(root, hooks)));
        edits
    }

    /// Rewrites the program with every wrap point bracketed by `hooks`.
    ///
    /// An empty program comes back unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the wrap points cannot be computed or applied.
    pub fn rewrite(&self, hooks: &impl Hooks) -> Result<String, WrapError> {
        if self.root().is_none() {
            return Ok(self.source.to_owned());
        }
        let points = self.points()?;
        let mut rewriter = StableRewriter::new(self.source);
        rewriter.add_edits(self.edits(&points, hooks));
        Ok(rewriter.apply()?)
    }

    /// `after_all`, followed by a newline when the program is followed by a
    /// data segment so the `__END__` marker stays at the start of its line.
    fn after_all_text(&self, root: Range, hooks: &impl Hooks) -> String {
        let mut text = hooks.after_all();
        if ends_in_data_segment(self.source, root.end()) {
            text.push('\n');
        }
        text
    }
}

/// Whether the text at `offset` is the data segment marker.
fn ends_in_data_segment(source: &str, offset: usize) -> bool {
    let end = offset.saturating_add(DATA_SEGMENT.len()).min(source.len());
    source
        .get(offset..end)
        .is_some_and(|tail| chomp(tail) == chomp(DATA_SEGMENT))
}

/// `text` without one trailing line terminator.
fn chomp(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text)
}

/// Wraps a parsed program.
///
/// # Errors
///
/// See [`WrapExpressions::new`] and [`WrapExpressions::rewrite`].
pub fn wrap(source: &str, parsed: &ParsedProgram, hooks: &impl Hooks) -> Result<String, WrapError> {
    WrapExpressions::new(source, parsed)?.rewrite(hooks)
}

/// Parses `source` with `parser` and wraps it.
///
/// # Errors
///
/// Fails if the parser fails, or for any reason [`wrap`] fails.
pub fn wrap_with(
    parser: &impl SourceParser,
    source: &str,
    hooks: &impl Hooks,
) -> anyhow::Result<String> {
    let parsed = parser.parse(source)?;
    Ok(wrap(source, &parsed, hooks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FAILURE_SENTINEL;
    use crate::test_utils::{leaf, nil, node, sym, Spans, WithLocation};

    fn angles() -> TemplateHooks {
        TemplateHooks::each("<", ">")
    }

    fn call(spans: &Spans<'_>, name: &str) -> Node {
        node("send", spans.of(name), [nil(), sym(name)]).with_selector(spans.of(name))
    }

    fn run(source: &str, root: Node, hooks: &impl Hooks) -> String {
        wrap(source, &ParsedProgram::from_root(root), hooks).expect("wraps")
    }

    #[test]
    fn test_assignment_of_sum() {
        let source = "x = 1 + 2";
        let spans = Spans::new(source);
        let sum = node(
            "send",
            spans.between("1", "2"),
            [
                leaf("int", spans.of("1"), 1).into(),
                sym("+"),
                leaf("int", spans.of("2"), 2).into(),
            ],
        )
        .with_selector(spans.of("+"));
        let root = node("lvasgn", spans.all(), [sym("x"), sum.into()]);

        assert_eq!(run(source, root.clone(), &angles()), "<x = 1 + 2>");
        assert_eq!(
            run(source, root, &angles().with_all("[", "]")),
            "[<x = 1 + 2>]"
        );
    }

    #[test]
    fn test_hooks_receive_line_numbers() {
        let source = "a\nb";
        let spans = Spans::new(source);
        let root = node(
            "begin",
            spans.all(),
            [call(&spans, "a").into(), call(&spans, "b").into()],
        );
        let hooks = TemplateHooks::each("r({line}, ", ")");

        assert_eq!(run(source, root, &hooks), "r(1, a)\nr(2, b)");
    }

    #[test]
    fn test_nested_points_sharing_a_start() {
        let source = "a\n.b\n.c";
        let spans = Spans::new(source);
        let inner = node("send", spans.between("a", "b"), [call(&spans, "a").into(), sym("b")])
            .with_selector(spans.of("b"));
        let root = node("send", spans.all(), [inner.into(), sym("c")]).with_selector(spans.of("c"));

        assert_eq!(run(source, root, &angles()), "<<<a>\n.b>\n.c>");
    }

    #[test]
    fn test_void_condition_keeps_inner_value() {
        let source = "x if (return 1)";
        let spans = Spans::new(source);
        let jump = node(
            "return",
            spans.between("return", "1"),
            [leaf("int", spans.of("1"), 1).into()],
        );
        let group = node("begin", spans.of("(return 1)"), [jump.into()]);
        let root = node("if", spans.all(), [group.into(), call(&spans, "x").into(), nil()])
            .with_keyword(spans.of("if"));

        assert_eq!(run(source, root, &angles()), "x if (return <1>)");
    }

    #[test]
    fn test_heredoc_argument() {
        let source = "f(<<~A)\nhi\nA\n";
        let spans = Spans::new(source);
        let body = leaf("str", Range::new(spans.of("<<~A").begin(), source.len()), "hi\n")
            .with_begin(spans.of("<<~A"));
        let root = node("send", spans.all(), [nil(), sym("f"), body.into()])
            .with_selector(spans.of("f"));

        assert_eq!(run(source, root, &angles()), "<f(<<~A)>\nhi\nA\n");
    }

    #[test]
    fn test_hash_argument_braces() {
        let source = "f(a: 1\n)";
        let spans = Spans::new(source);
        let pair = node(
            "pair",
            spans.of("a: 1"),
            [
                leaf("sym", spans.of("a"), "a").into(),
                leaf("int", spans.of("1"), 1).into(),
            ],
        );
        let hash = node("hash", spans.of("a: 1"), [pair.into()]);
        let root = node("send", spans.all(), [nil(), sym("f"), hash.into()])
            .with_selector(spans.of("f"));
        assert_eq!(run(source, root, &angles()), "<f(a: <1>\n)>");

        let source = "f({a: 1}\n)";
        let spans = Spans::new(source);
        let pair = node(
            "pair",
            spans.of("a: 1"),
            [
                leaf("sym", spans.of("a"), "a").into(),
                leaf("int", spans.of("1"), 1).into(),
            ],
        );
        let hash = node("hash", spans.of("{a: 1}"), [pair.into()]).with_begin(spans.of("{"));
        let root = node("send", spans.all(), [nil(), sym("f"), hash.into()])
            .with_selector(spans.of("f"));
        assert_eq!(run(source, root, &angles()), "<f(<{a: 1}>\n)>");
    }

    #[test]
    fn test_failure_sentinel_is_replaced() {
        let source = FAILURE_SENTINEL;
        let spans = Spans::new(source);
        let root = call(&spans, FAILURE_SENTINEL);

        assert_eq!(run(source, root, &angles()), format!("<{FAILURE_TEXT}>"));
    }

    #[test]
    fn test_data_segment_gets_its_own_line() {
        let source = "x = <<A\nhi\nA\n__END__\ndata\n";
        let spans = Spans::new(source);
        let program_end = spans.of("__END__").begin();
        let body = leaf("str", Range::new(spans.of("<<A").begin(), program_end), "hi\n")
            .with_begin(spans.of("<<A"));
        let root = node("lvasgn", Range::new(0, program_end), [sym("x"), body.into()]);

        assert_eq!(
            run(source, root, &angles().with_all("", "END")),
            "<x = <<A>\nhi\nA\nEND\n__END__\ndata\n"
        );
    }

    #[test]
    fn test_no_data_segment() {
        let source = "1\n";
        let root = leaf("int", Range::new(0, 1), 1);
        assert_eq!(run(source, root, &angles().with_all("", "END")), "<1>END\n");
        assert!(!ends_in_data_segment("1\n__END__\n", 1));
        assert!(ends_in_data_segment("__END__", 0));
        assert!(ends_in_data_segment("__END__\r\n", 0));
    }

    #[test]
    fn test_empty_program_is_unchanged() {
        let source = "# just a comment\n";
        let result = wrap(source, &ParsedProgram::default(), &angles().with_all("[", "]"));
        assert_eq!(result.expect("wraps"), source);
    }

    #[test]
    fn test_syntax_error_is_reported_verbatim() {
        let parsed = ParsedProgram::syntax_error("unexpected end-of-input");
        let err = wrap("1 +", &parsed, &NoHooks).expect_err("syntax error");
        assert!(err.is_syntax_error());
        assert_eq!(err.to_string(), "unexpected end-of-input");
    }

    #[test]
    fn test_edits_are_in_insertion_order() {
        let source = "1";
        let parsed = ParsedProgram::from_root(leaf("int", Range::new(0, 1), 1));
        let wrapper = WrapExpressions::new(source, &parsed).expect("valid");
        let points = wrapper.points().expect("points");
        let edits = wrapper.edits(&points, &angles().with_all("[", "]"));

        let texts: Vec<&str> = edits.iter().map(|edit| edit.text.as_str()).collect();
        assert_eq!(texts, ["[", "<", ">", "]"]);
    }
}
