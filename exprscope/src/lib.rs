//! Core library for the exprscope expression wrapper.
//!
//! Given a program and the syntax tree an external parser produced for it,
//! the library decides which expressions can be wrapped with "capture this
//! value" hooks and splices those hooks into the original text.
//!
//! ```
//! use exprscope::parser::ParsedProgram;
//! use exprscope::wrap::{wrap, TemplateHooks};
//!
//! let parsed = ParsedProgram::from_json(
//!     r#"{"ast": {"type": "int", "children": [1], "location": {"expression": [0, 1]}}}"#,
//! ).expect("valid tree document");
//! let hooks = TemplateHooks::each("record(", ")");
//! assert_eq!(wrap("1", &parsed, &hooks).expect("wraps"), "record(1)");
//! ```

#![allow(
    clippy::similar_names,
    clippy::format_push_string,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Read-only view over a parsed syntax tree.
pub mod ast;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Error types of the wrapping core.
pub mod error;

/// External parser collaborators and the tree document format.
pub mod parser;

/// Stable multi-edit text rewriter.
pub mod rewrite;

/// Wrap-point selection and the wrapping orchestrator.
pub mod wrap;

/// Module containing utility functions.
/// This includes position helpers and file handling used across the application.
pub mod utils;

/// Module containing test utilities.
/// Builds parser output by hand so tests do not need a live parser.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module defining the entry point logic shared by the binaries.
pub mod entry_point;

/// Module for CLI output formatting with colored text and tables.
pub mod output;
