//! Shared utilities for command implementations.

use crate::cli::InputArgs;
use crate::config::Config;
use crate::constants::{DISPLAYABLE_ERROR_STATUS, NONDISPLAYABLE_ERROR_STATUS};
use crate::error::WrapError;
use crate::output::{display_file, print_debug_section};
use crate::parser::{ExternalParser, ParsedProgram, SourceParser, TreeFile};
use crate::utils::{read_source, validate_output_path};

use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Print `[VERBOSE]` progress lines.
    pub verbose: bool,
    /// Print labelled diagnostic sections.
    pub debug: bool,
    /// Loaded configuration.
    pub config: Config,
}

impl Context {
    /// Print a progress line when verbose output is on.
    pub fn verbose(&self, message: impl std::fmt::Display) {
        if self.verbose {
            eprintln!("[VERBOSE] {message}");
        }
    }

    /// Print a diagnostic section when debug output is on.
    ///
    /// The body is only rendered when it is going to be shown.
    pub fn debug_section(&self, label: &str, body: impl FnOnce() -> String) -> Result<()> {
        if self.debug {
            print_debug_section(&mut std::io::stderr().lock(), label, &body())?;
        }
        Ok(())
    }
}

/// A program together with its parse result.
#[derive(Debug, Clone)]
pub struct LoadedProgram {
    /// Display name of the input.
    pub file: String,
    /// Program text.
    pub source: String,
    /// Parser output.
    pub parsed: ParsedProgram,
}

/// Picks the tree source for `input`: a JSON file, a command line override,
/// or the configured parser command.
fn select_parser(ctx: &Context, input: &InputArgs) -> Result<Box<dyn SourceParser>> {
    if let Some(path) = &input.ast {
        let tree = TreeFile::read(path)
            .with_context(|| format!("Failed to read syntax tree {}", path.display()))?;
        return Ok(Box::new(tree));
    }
    if !input.parser_command.is_empty() {
        return Ok(Box::new(ExternalParser::from_command(&input.parser_command)?));
    }
    Ok(Box::new(ctx.config.exprscope.parser()?))
}

/// Reads and parses the program named by `input`.
///
/// # Errors
///
/// Returns an error if the program or its tree cannot be obtained. A syntax
/// error is not an error here; it is carried in [`LoadedProgram::parsed`].
pub fn load_program(ctx: &Context, input: &InputArgs) -> Result<LoadedProgram> {
    let file = display_file(&input.file);
    let source = read_source(&input.file)?;

    let parser = select_parser(ctx, input)?;
    ctx.verbose(format_args!("Parsing {file} with {}", parser.describe()));
    let parsed = parser
        .parse(&source)
        .with_context(|| format!("Failed to parse {file}"))?;

    ctx.debug_section("PARSER", || {
        serde_json::to_string_pretty(&parsed).unwrap_or_else(|e| e.to_string())
    })?;

    Ok(LoadedProgram {
        file,
        source,
        parsed,
    })
}

/// Writes output to either a file or a writer.
pub fn write_output<W: Write>(writer: &mut W, content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let path = validate_output_path(path)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        write!(writer, "{content}")?;
        writer.flush()?;
    }
    Ok(())
}

/// Exit status for a failed command.
///
/// A program that parsed but could not be wrapped is a displayable error;
/// everything else (unreadable input, syntax errors, parser or configuration
/// failures) is not.
#[must_use]
pub fn exit_status(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<WrapError>() {
        Some(wrap) if !wrap.is_syntax_error() => DISPLAYABLE_ERROR_STATUS,
        _ => NONDISPLAYABLE_ERROR_STATUS,
    }
}
