use crate::rewrite::PlannedSplice;
use crate::utils::normalize_display_path;
use crate::wrap::{Marker, WrapPoints};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Longest source excerpt shown in the wrap point table.
const MAX_SNIPPET_CHARS: usize = 48;

/// One wrap point, as reported to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointReport {
    /// Line the wrapped range ends on.
    pub line: usize,
    /// Byte offset where the wrapped range starts.
    pub begin: usize,
    /// Byte offset where the wrapped range ends.
    pub end: usize,
    /// Byte column of `end` within `line`.
    pub column: usize,
    /// Marker attached to the point, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// The wrapped source text.
    pub source: String,
}

/// JSON output of the `points` command.
#[derive(Debug, Clone, Serialize)]
pub struct PointsReport {
    /// The program file (`-` for stdin).
    pub file: String,
    /// Wrap points in registration order.
    pub wrap_points: Vec<PointReport>,
}

/// JSON output of `wrap --json`.
#[derive(Debug, Clone, Serialize)]
pub struct WrapReport {
    /// The program file (`-` for stdin).
    pub file: String,
    /// The rewritten program.
    pub program: String,
    /// Wrap points in registration order.
    pub wrap_points: Vec<PointReport>,
}

/// Converts a wrap point table into report rows.
#[must_use]
pub fn point_reports(points: &WrapPoints, source: &str) -> Vec<PointReport> {
    points
        .iter()
        .map(|(&line, point)| PointReport {
            line,
            begin: point.range.begin(),
            end: point.range.end(),
            column: point.column,
            marker: point.marker,
            source: point.range.source(source).unwrap_or_default().to_owned(),
        })
        .collect()
}

/// Display name for an input path.
#[must_use]
pub fn display_file(path: &Path) -> String {
    if path == Path::new("-") {
        "-".to_owned()
    } else {
        normalize_display_path(path)
    }
}

/// First line of `text`, shortened for a table cell.
fn snippet(text: &str) -> String {
    let first = text.lines().next().unwrap_or_default();
    let multiline = first.len() < text.trim_end_matches('\n').len();
    let mut shown: String = first.chars().take(MAX_SNIPPET_CHARS).collect();
    if multiline || shown.len() < first.len() {
        shown.push_str(" …");
    }
    shown
}

/// Helper to create a styled table
fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Print the wrap points of `file` as a table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_points(
    writer: &mut impl Write,
    file: &str,
    points: &[PointReport],
) -> std::io::Result<()> {
    writeln!(writer, "{}", format!("Wrap points in {file}").bold().underline())?;

    if points.is_empty() {
        writeln!(writer, "{}", "No wrap points.".dimmed())?;
        return Ok(());
    }

    let mut table = create_table(vec!["Line", "Range", "Column", "Marker", "Source"]);
    for point in points {
        let marker = match point.marker {
            Some(Marker::TotalFailure) => Cell::new("total failure").fg(Color::Red),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(point.line).add_attribute(Attribute::Bold),
            Cell::new(format!("{}...{}", point.begin, point.end)),
            Cell::new(point.column).add_attribute(Attribute::Dim),
            marker,
            Cell::new(snippet(&point.source)),
        ]);
    }

    writeln!(writer, "{table}")?;
    writeln!(
        writer,
        "{}",
        format!("{} wrap point(s)", points.len()).dimmed()
    )?;
    Ok(())
}

/// Print a labelled diagnostic section.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_debug_section(
    writer: &mut impl Write,
    label: &str,
    body: &str,
) -> std::io::Result<()> {
    writeln!(writer, "{}", format!("[DEBUG] {label}").cyan().bold())?;
    writeln!(writer, "{}", "-".repeat(label.len() + 8).dimmed())?;
    writeln!(writer, "{}", body.trim_end_matches('\n'))?;
    writeln!(writer)?;
    Ok(())
}

/// Render the edit plan for a diagnostic section.
#[must_use]
pub fn format_plan(plan: &[PlannedSplice], texts: &[&str]) -> String {
    plan.iter()
        .map(|splice| {
            let text = texts.get(splice.edit_index).copied().unwrap_or_default();
            format!(
                "#{:<3} {}...{} -> {}...{} ({:+}) {text:?}",
                splice.edit_index,
                splice.original.begin(),
                splice.original.end(),
                splice.begin,
                splice.end,
                splice.adjustment,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a user-facing error.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_error(writer: &mut impl Write, message: &str) -> std::io::Result<()> {
    writeln!(writer, "{} {message}", "Error:".red().bold())
}
