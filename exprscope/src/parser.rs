//! Collaborators that turn program text into a syntax tree.
//!
//! Parsing is delegated to an external command that prints a tree document:
//!
//! ```json
//! {"ast": {"type": "int", "children": [1], "location": {"expression": [0, 1]}},
//!  "error": null}
//! ```
//!
//! `ast` is `null` for an empty program; a non-null `error` is the parser's
//! syntax error message.

use crate::ast::Node;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Stack reserved while decoding a tree document; deeply nested programs
/// produce deeply nested JSON.
const DECODE_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Errors raised while obtaining a tree document.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// The parser command could not be started.
    #[error("failed to start parser `{program}`: {source}")]
    Spawn {
        /// The command that was run.
        program: String,
        /// Why it could not be started.
        #[source]
        source: std::io::Error,
    },
    /// Writing the program to the parser or reading its output failed.
    #[error("failed to communicate with parser `{program}`: {source}")]
    Io {
        /// The command that was run.
        program: String,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The parser exited unsuccessfully.
    #[error("parser `{program}` exited with {status}: {stderr}")]
    Failed {
        /// The command that was run.
        program: String,
        /// Its exit status.
        status: std::process::ExitStatus,
        /// What it printed on stderr.
        stderr: String,
    },
    /// No parser command was configured.
    #[error("parser command is empty")]
    EmptyCommand,
    /// The parser's output is not a tree document.
    #[error("invalid tree document: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Output of a parse: a tree, a syntax error, or neither (empty program).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedProgram {
    /// Root of the tree; `None` for an empty program.
    #[serde(default)]
    pub ast: Option<Node>,
    /// The parser's syntax error message.
    #[serde(default)]
    pub error: Option<String>,
}

impl ParsedProgram {
    /// A successfully parsed program.
    #[must_use]
    pub fn from_root(root: Node) -> Self {
        Self {
            ast: Some(root),
            error: None,
        }
    }

    /// A program the parser rejected.
    #[must_use]
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self {
            ast: None,
            error: Some(message.into()),
        }
    }

    /// Decodes a tree document.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidJson`] if `text` is not a tree document.
    pub fn from_json(text: &str) -> Result<Self, ParserError> {
        Self::from_slice(text.as_bytes())
    }

    /// Decodes a tree document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidJson`] if `bytes` is not a tree document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParserError> {
        stacker::grow(DECODE_STACK_SIZE, || {
            let mut de = serde_json::Deserializer::from_slice(bytes);
            de.disable_recursion_limit();
            let program = Self::deserialize(&mut de)?;
            de.end()?;
            Ok(program)
        })
    }
}

/// Something that can parse program text.
pub trait SourceParser {
    /// Parses `source` into a tree document.
    ///
    /// # Errors
    ///
    /// Returns an error when no document could be obtained. A syntax error
    /// in `source` is not an error here; it is reported in
    /// [`ParsedProgram::error`].
    fn parse(&self, source: &str) -> Result<ParsedProgram, ParserError>;

    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

/// Runs a command that reads the program on stdin and prints a tree document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalParser {
    /// Executable to run.
    pub program: String,
    /// Its arguments.
    pub args: Vec<String>,
}

impl ExternalParser {
    /// Builds a parser from a command line such as `["ruby", "dump.rb"]`.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::EmptyCommand`] if `command` is empty.
    pub fn from_command(command: &[String]) -> Result<Self, ParserError> {
        let (program, args) = command.split_first().ok_or(ParserError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn io_error(&self, source: std::io::Error) -> ParserError {
        ParserError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl SourceParser for ExternalParser {
    fn parse(&self, source: &str) -> Result<ParsedProgram, ParserError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ParserError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.io_error(std::io::Error::other("stdin was not captured")))?;

        // Feed stdin from a second thread so a parser that writes before it
        // finishes reading cannot deadlock on a full stdout pipe.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output.map_err(|e| self.io_error(e))?;

        if !output.status.success() {
            return Err(ParserError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        written.map_err(|e| self.io_error(e))?;

        ParsedProgram::from_slice(&output.stdout)
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A tree document read from a file ahead of time.
#[derive(Debug, Clone)]
pub struct TreeFile {
    /// Where the document was read from.
    pub path: PathBuf,
    /// The document text.
    pub document: String,
}

impl TreeFile {
    /// Reads the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let document = std::fs::read_to_string(&path)?;
        Ok(Self { path, document })
    }
}

impl SourceParser for TreeFile {
    fn parse(&self, _source: &str) -> Result<ParsedProgram, ParserError> {
        ParsedProgram::from_json(&self.document)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
