use crate::cli::{Cli, Commands, InputArgs};
use crate::commands::{exit_status, run_points, run_wrap, Context, WrapOptions};
use crate::config::Config;
use crate::constants::{NONDISPLAYABLE_ERROR_STATUS, SUCCESS_STATUS};
use crate::output::print_error;
use anyhow::Result;
use clap::Parser;
use std::path::Path;

/// Run exprscope with the given arguments, writing results to stdout.
///
/// Returns the process exit status.
///
/// # Errors
///
/// Returns an error only if writing help or version text fails; command
/// failures are reported on stderr and mapped to an exit status.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run exprscope with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing help or version text fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["exprscope".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(SUCCESS_STATUS);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(NONDISPLAYABLE_ERROR_STATUS);
                }
            }
        }
    };

    match run_command(cli_var, writer) {
        Ok(()) => Ok(SUCCESS_STATUS),
        Err(err) => {
            print_error(&mut std::io::stderr().lock(), &format!("{err:#}"))?;
            Ok(exit_status(&err))
        }
    }
}

/// Loads the configuration: an explicit file, or the nearest
/// `.exprscope.toml` above the input (the current directory for stdin).
fn load_config(explicit: Option<&Path>, input: &InputArgs) -> Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::load_file(path)?);
    }
    if input.file == Path::new("-") {
        return Ok(Config::load()?);
    }
    Ok(Config::load_from_path(&input.file)?)
}

fn run_command<W: std::io::Write>(cli_var: Cli, writer: &mut W) -> Result<()> {
    let input = match &cli_var.command {
        Commands::Wrap { input, .. } | Commands::Points { input, .. } => input,
    };
    let config = load_config(cli_var.config.as_deref(), input)?;

    let ctx = Context {
        verbose: cli_var.verbose,
        debug: cli_var.debug,
        config,
    };

    ctx.verbose(format_args!("exprscope v{}", env!("CARGO_PKG_VERSION")));
    match &ctx.config.config_file_path {
        Some(path) => ctx.verbose(format_args!("Using config {}", path.display())),
        None => ctx.verbose("No config file found, using defaults"),
    }

    match cli_var.command {
        Commands::Wrap {
            input,
            hooks,
            json,
            output,
        } => run_wrap(
            &ctx,
            WrapOptions {
                input,
                hooks,
                json,
                output,
            },
            writer,
        ),
        Commands::Points { input, json } => run_points(&ctx, &input, json, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> (i32, String) {
        let mut buffer = Vec::new();
        let code = run_with_args_to(args.iter().map(|s| (*s).to_owned()).collect(), &mut buffer)
            .unwrap();
        (code, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_help_goes_to_writer() {
        let (code, output) = run(&["--help"]);
        assert_eq!(code, SUCCESS_STATUS);
        assert!(output.contains("CONFIGURATION FILE (.exprscope.toml)"));
    }

    #[test]
    fn test_unknown_subcommand_is_nondisplayable() {
        let (code, output) = run(&["frobnicate"]);
        assert_eq!(code, NONDISPLAYABLE_ERROR_STATUS);
        assert!(output.is_empty());
    }

    #[test]
    fn test_missing_file_is_nondisplayable() {
        let (code, _) = run(&["points", "definitely/not/here.rb", "--ast", "nope.json"]);
        assert_eq!(code, NONDISPLAYABLE_ERROR_STATUS);
    }
}
