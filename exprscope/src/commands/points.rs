//! The `points` command.

use super::utils::{load_program, Context};
use crate::cli::InputArgs;
use crate::output::{point_reports, print_points, PointsReport};
use crate::wrap::WrapExpressions;

use anyhow::Result;
use std::io::Write;

/// Lists the wrap points of a program.
///
/// # Errors
///
/// Returns an error if the program cannot be read, parsed, or analyzed, or
/// if writing the listing fails.
pub fn run_points<W: Write>(
    ctx: &Context,
    input: &InputArgs,
    json: bool,
    writer: &mut W,
) -> Result<()> {
    let loaded = load_program(ctx, input)?;
    let points = WrapExpressions::new(&loaded.source, &loaded.parsed)?.points()?;
    ctx.verbose(format_args!("Found {} wrap point(s)", points.len()));

    let reports = point_reports(&points, &loaded.source);
    if json {
        let report = PointsReport {
            file: loaded.file,
            wrap_points: reports,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        print_points(writer, &loaded.file, &reports)?;
    }
    Ok(())
}
