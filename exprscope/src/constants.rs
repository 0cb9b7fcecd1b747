use regex::Regex;
use std::sync::OnceLock;

/// Name of the project-level configuration file.
pub const CONFIG_FILENAME: &str = ".exprscope.toml";

/// Message name that asks for a call's source to be replaced by [`FAILURE_TEXT`].
pub const FAILURE_SENTINEL: &str = "__EXPRSCOPE_FAILURE__";

/// Text substituted for a wrap point carrying the failure marker.
pub const FAILURE_TEXT: &str = ".....TOTAL FAILURE!.....";

/// Marker that starts a program's data segment.
pub const DATA_SEGMENT: &str = "__END__\n";

/// Placeholder replaced by the line number in each-hook templates.
pub const LINE_PLACEHOLDER: &str = "{line}";

/// Exit status: everything worked.
pub const SUCCESS_STATUS: i32 = 0;
/// Exit status: an error we can show alongside the output.
pub const DISPLAYABLE_ERROR_STATUS: i32 = 1;
/// Exit status: invoked incorrectly, or the program could not be parsed.
pub const NONDISPLAYABLE_ERROR_STATUS: i32 = 2;

/// Regex matching the opening token of a heredoc (`<<EOS`, `<<-EOS`, `<<~EOS`).
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_heredoc_opener_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"\A<<[~-]?").expect("Invalid heredoc opener regex pattern"))
}

pub use get_heredoc_opener_re as HEREDOC_OPENER_RE;
