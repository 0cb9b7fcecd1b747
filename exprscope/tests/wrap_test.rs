//! Tests for wrapping whole programs.
//!
//! Trees are either parser documents or assembled by hand with
//! `exprscope::test_utils`, so no live parser is needed.
#![allow(clippy::unwrap_used)]

use exprscope::ast::{Node, Range};
use exprscope::parser::{ParsedProgram, TreeFile};
use exprscope::test_utils::{leaf, nil, node, sym, Spans, WithLocation};
use exprscope::wrap::{wrap, wrap_with, TemplateHooks, WrapExpressions};

fn angles() -> TemplateHooks {
    TemplateHooks::each("<", ">")
}

fn call(spans: &Spans<'_>, name: &str) -> Node {
    node("send", spans.of(name), [nil(), sym(name)]).with_selector(spans.of(name))
}

fn wrap_tree(source: &str, root: Node) -> String {
    wrap(source, &ParsedProgram::from_root(root), &angles()).unwrap()
}

/// `a = [1,\n  2]\nputs a\n` as a Ruby parser reports it.
const ARRAY_PROGRAM: &str = "a = [1,\n  2]\nputs a\n";
const ARRAY_TREE: &str = r#"{
  "ast": {
    "type": "begin",
    "children": [
      {
        "type": "lvasgn",
        "children": [
          "a",
          {
            "type": "array",
            "children": [
              {"type": "int", "children": [1], "location": {"expression": [5, 6]}},
              {"type": "int", "children": [2], "location": {"expression": [10, 11]}}
            ],
            "location": {"expression": [4, 12], "begin": [4, 5], "end": [11, 12]}
          }
        ],
        "location": {"expression": [0, 12], "name": [0, 1], "operator": [2, 3]}
      },
      {
        "type": "send",
        "children": [
          null,
          "puts",
          {"type": "lvar", "children": ["a"], "location": {"expression": [18, 19]}}
        ],
        "location": {"expression": [13, 19], "selector": [13, 17]}
      }
    ],
    "location": {"expression": [0, 19]}
  },
  "error": null
}"#;

#[test]
fn test_wraps_document_from_parser() {
    let parsed = ParsedProgram::from_json(ARRAY_TREE).unwrap();
    let wrapped = wrap(ARRAY_PROGRAM, &parsed, &angles()).unwrap();
    assert_eq!(wrapped, "<a = [<1>,\n  2]>\n<puts a>\n");
}

#[test]
fn test_wrap_with_parser() {
    let tree = TreeFile {
        path: "array.json".into(),
        document: ARRAY_TREE.to_owned(),
    };
    let wrapped = wrap_with(&tree, ARRAY_PROGRAM, &TemplateHooks::each("(", ")")).unwrap();
    assert_eq!(wrapped, "(a = [(1),\n  2])\n(puts a)\n");
}

#[test]
fn test_points_follow_first_registration() {
    let parsed = ParsedProgram::from_json(ARRAY_TREE).unwrap();
    let points = WrapExpressions::new(ARRAY_PROGRAM, &parsed)
        .unwrap()
        .points()
        .unwrap();

    let lines: Vec<usize> = points.keys().copied().collect();
    assert_eq!(lines, [2, 1, 3]);
    assert_eq!(points[&2].range, Range::new(0, 12));
    assert_eq!(points[&1].range, Range::new(5, 6));
}

#[test]
fn test_line_numbers_reach_hooks() {
    let parsed = ParsedProgram::from_json(ARRAY_TREE).unwrap();
    let hooks = TemplateHooks::each("v({line}, ", ")").with_all("begin\n", "\nend");
    let wrapped = wrap(ARRAY_PROGRAM, &parsed, &hooks).unwrap();
    assert_eq!(
        wrapped,
        "begin\nv(2, a = [v(1, 1),\n  2])\nv(3, puts a)\nend\n"
    );
}

#[test]
fn test_malformed_nested_child_fails_instead_of_vanishing() {
    for child in [
        r#"{"type": "int", "children": [22], "location": {"expression": [5, 2]}}"#,
        r#"{"typ": "int", "children": [22], "location": {"expression": [2, 4]}}"#,
    ] {
        let document = format!(
            r#"{{"ast": {{"type": "begin", "location": {{"expression": [0, 4]}}, "children": [
                {{"type": "int", "children": [1], "location": {{"expression": [0, 1]}}}},
                {child}
            ]}}}}"#
        );
        assert!(ParsedProgram::from_json(&document).is_err(), "{child}");
    }
}

#[test]
fn test_rescue_wraps_body_and_handler() {
    let source = "begin\n  foo\nrescue\n  bar\nend";
    let spans = Spans::new(source);
    let handler = node(
        "resbody",
        spans.between("rescue", "bar"),
        [nil(), nil(), call(&spans, "bar").into()],
    );
    let rescue = node(
        "rescue",
        spans.between("foo", "bar"),
        [call(&spans, "foo").into(), handler.into(), nil()],
    );
    let root = node("kwbegin", spans.all(), [rescue.into()]);

    assert_eq!(
        wrap_tree(source, root),
        "<begin\n  <foo>\nrescue\n  <bar>\nend>"
    );
}

#[test]
fn test_class_body_only() {
    let source = "class A\n  1\nend";
    let spans = Spans::new(source);
    let name = node("const", spans.of("A"), [nil(), sym("A")]);
    let root = node(
        "class",
        spans.all(),
        [name.into(), nil(), leaf("int", spans.of("1"), 1).into()],
    );

    assert_eq!(wrap_tree(source, root), "class A\n  <1>\nend");
}

#[test]
fn test_loop_with_break() {
    let source = "while x\n  break\nend";
    let spans = Spans::new(source);
    let root = node(
        "while",
        spans.all(),
        [
            call(&spans, "x").into(),
            node("break", spans.of("break"), []).into(),
        ],
    )
    .with_keyword(spans.of("while"));

    assert_eq!(wrap_tree(source, root), "<while <x>\n  break\nend>");
}

#[test]
fn test_block_receiver_is_wrapped_separately() {
    let source = "[1].map do |x|\n  x\nend";
    let spans = Spans::new(source);
    let list = node(
        "array",
        spans.of("[1]"),
        [leaf("int", spans.of("1"), 1).into()],
    )
    .with_begin(spans.of("["));
    let method = node("send", spans.between("[1]", "map"), [list.into(), sym("map")])
        .with_selector(spans.of("map"));
    let params = node(
        "args",
        spans.of("|x|"),
        [leaf("arg", spans.nth("x", 0), "x").into()],
    );
    let root = node(
        "block",
        spans.all(),
        [
            method.into(),
            params.into(),
            leaf("lvar", spans.nth("x", 1), "x").into(),
        ],
    );

    assert_eq!(wrap_tree(source, root), "<<[1]>.map do |x|\n  <x>\nend>");
}

#[test]
fn test_multiple_assignment_from_literal_array() {
    let source = "a, b = [1,\n2]";
    let spans = Spans::new(source);
    let targets = node(
        "mlhs",
        spans.of("a, b"),
        [
            leaf("lvasgn", spans.of("a"), "a").into(),
            leaf("lvasgn", spans.of("b"), "b").into(),
        ],
    );
    let values = node(
        "array",
        spans.between("[", "]"),
        [
            leaf("int", spans.of("1"), 1).into(),
            leaf("int", spans.of("2"), 2).into(),
        ],
    )
    .with_begin(spans.of("["));
    let root = node("masgn", spans.all(), [targets.into(), values.into()]);

    assert_eq!(wrap_tree(source, root), "<a, b = [<1>,\n2]>");
}

#[test]
fn test_multibyte_source() {
    let source = "s = \"héllo\"";
    let spans = Spans::new(source);
    let string = leaf("str", spans.of("\"héllo\""), "héllo").with_begin(spans.of("\""));
    let root = node("lvasgn", spans.all(), [sym("s"), string.into()]);

    assert_eq!(wrap_tree(source, root), "<s = \"héllo\">");
}
