use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.exprscope.toml):
  Looked up from the input file's directory upwards.

  [exprscope]
  # Command that reads a program on stdin and prints its tree as JSON
  parser_command = [\"ruby\", \"scripts/ruby_ast_json.rb\"]

  # Hook templates; {line} is replaced by the wrap point's line number
  before_all  = \"\"
  after_all   = \"\"
  before_each = \"(\"
  after_each  = \")\"

EXIT STATUS:
  0  success
  1  the program could not be wrapped (malformed tree or edit)
  2  bad invocation, syntax error, parser or configuration failure
";

/// Where the program and its syntax tree come from.
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// Program file to instrument (`-` reads stdin).
    pub file: PathBuf,

    /// Read the syntax tree from this JSON document instead of running the parser.
    #[arg(long, value_name = "JSON")]
    pub ast: Option<PathBuf>,

    /// Parser command, overriding the configuration (e.g. `--parser ruby --parser dump.rb`).
    #[arg(
        long = "parser",
        value_name = "ARG",
        conflicts_with = "ast",
        allow_hyphen_values = true
    )]
    pub parser_command: Vec<String>,
}

/// Hook templates overriding the configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct HookArgs {
    /// Text inserted once before the program.
    #[arg(long, allow_hyphen_values = true)]
    pub before_all: Option<String>,

    /// Text inserted once after the program.
    #[arg(long, allow_hyphen_values = true)]
    pub after_all: Option<String>,

    /// Text inserted before each wrap point (`{line}` is substituted).
    #[arg(long, allow_hyphen_values = true)]
    pub before_each: Option<String>,

    /// Text inserted after each wrap point (`{line}` is substituted).
    #[arg(long, allow_hyphen_values = true)]
    pub after_each: Option<String>,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    name = "exprscope",
    author,
    version,
    about = "exprscope - wrap every observable expression of a program with capture hooks",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,

    /// Print progress information to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the parser output, wrap points and rewritten program to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use this configuration file instead of searching for `.exprscope.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// Available subcommands.
pub enum Commands {
    /// Rewrite a program with hooks around every wrap point
    Wrap {
        /// Program and tree inputs.
        #[command(flatten)]
        input: InputArgs,

        /// Hook templates.
        #[command(flatten)]
        hooks: HookArgs,

        /// Output a JSON report with the program and its wrap points.
        #[arg(long)]
        json: bool,

        /// Write the result to this file instead of stdout.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// List the wrap points of a program
    Points {
        /// Program and tree inputs.
        #[command(flatten)]
        input: InputArgs,

        /// Output JSON.
        #[arg(long)]
        json: bool,
    },
}
