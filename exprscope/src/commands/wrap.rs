//! The `wrap` command.

use super::utils::{load_program, write_output, Context};
use crate::cli::{HookArgs, InputArgs};
use crate::error::WrapError;
use crate::output::{format_plan, point_reports, WrapReport};
use crate::rewrite::StableRewriter;
use crate::wrap::{TemplateHooks, WrapExpressions};

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

/// Options for [`run_wrap`].
#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    /// Program and tree inputs.
    pub input: InputArgs,
    /// Hook overrides.
    pub hooks: HookArgs,
    /// Emit a JSON report instead of the bare program.
    pub json: bool,
    /// Write to this file instead of the writer.
    pub output: Option<PathBuf>,
}

/// The configured hooks with command line overrides applied.
fn resolve_hooks(ctx: &Context, overrides: HookArgs) -> TemplateHooks {
    let mut hooks = ctx.config.exprscope.hooks();
    if let Some(text) = overrides.before_all {
        hooks.before_all = text;
    }
    if let Some(text) = overrides.after_all {
        hooks.after_all = text;
    }
    if let Some(text) = overrides.before_each {
        hooks.before_each = text;
    }
    if let Some(text) = overrides.after_each {
        hooks.after_each = text;
    }
    hooks
}

/// Rewrites a program with hooks around each of its wrap points.
///
/// # Errors
///
/// Returns an error if the program cannot be read, parsed, or wrapped, or
/// if writing the result fails.
pub fn run_wrap<W: Write>(ctx: &Context, options: WrapOptions, writer: &mut W) -> Result<()> {
    let loaded = load_program(ctx, &options.input)?;
    let wrapper = WrapExpressions::new(&loaded.source, &loaded.parsed)?;

    let points = wrapper.points()?;
    ctx.verbose(format_args!("Found {} wrap point(s)", points.len()));
    ctx.debug_section("WRAP POINTS", || {
        points
            .iter()
            .map(|(line, point)| format!("{line:>4}: {}", point.range))
            .collect::<Vec<_>>()
            .join("\n")
    })?;

    let hooks = resolve_hooks(ctx, options.hooks);
    let mut rewriter = StableRewriter::new(loaded.source.as_str());
    rewriter.add_edits(wrapper.edits(&points, &hooks));
    ctx.verbose(format_args!("Planned {} edit(s)", rewriter.edit_count()));

    if ctx.debug {
        let plan = rewriter.plan().map_err(WrapError::from)?;
        let texts: Vec<&str> = rewriter.edits().iter().map(|e| e.text.as_str()).collect();
        ctx.debug_section("EDITS", || format_plan(&plan, &texts))?;
    }

    let program = rewriter.apply().map_err(WrapError::from)?;
    ctx.debug_section("OUTPUT", || program.clone())?;

    let content = if options.json {
        let report = WrapReport {
            file: loaded.file,
            wrap_points: point_reports(&points, &loaded.source),
            program,
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        json
    } else {
        program
    };

    write_output(writer, &content, options.output.as_deref())
}
