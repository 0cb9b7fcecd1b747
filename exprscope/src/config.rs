use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_FILENAME;
use crate::parser::{ExternalParser, ParserError};
use crate::wrap::TemplateHooks;

/// Text wrapped around each wrap point when nothing else is configured.
pub const DEFAULT_BEFORE_EACH: &str = "(";
/// See [`DEFAULT_BEFORE_EACH`].
pub const DEFAULT_AFTER_EACH: &str = ")";

/// Parser command used when nothing else is configured.
pub const DEFAULT_PARSER_COMMAND: &[&str] = &["ruby", "scripts/ruby_ast_json.rb"];

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[exprscope]` section.
    pub exprscope: ExprScopeConfig,
    /// The path to the configuration file this was loaded from.
    /// Set by the loaders, `None` if using defaults.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
/// Configuration options for exprscope.
pub struct ExprScopeConfig {
    /// Command that reads a program on stdin and prints its tree document.
    pub parser_command: Option<Vec<String>>,
    /// Inserted once before the program.
    pub before_all: Option<String>,
    /// Inserted once after the program.
    pub after_all: Option<String>,
    /// Inserted before each wrap point; `{line}` is replaced by its line.
    pub before_each: Option<String>,
    /// Inserted after each wrap point; `{line}` is replaced by its line.
    pub after_each: Option<String>,
}

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has unexpected value types.
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        /// The configuration file.
        path: PathBuf,
        /// The TOML error, with its position.
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads configuration from `.exprscope.toml` in the current directory or above.
    ///
    /// # Errors
    ///
    /// Returns an error if a discovered file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// Returns the defaults if no configuration file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if a discovered file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load_file(&candidate);
            }
            if !current.pop() {
                break;
            }
        }

        Ok(Config::default())
    }

    /// Loads a specific configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config =
            toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }
}

impl ExprScopeConfig {
    /// The configured hooks, falling back to the defaults.
    #[must_use]
    pub fn hooks(&self) -> TemplateHooks {
        TemplateHooks {
            before_all: self.before_all.clone().unwrap_or_default(),
            after_all: self.after_all.clone().unwrap_or_default(),
            before_each: self
                .before_each
                .clone()
                .unwrap_or_else(|| DEFAULT_BEFORE_EACH.to_owned()),
            after_each: self
                .after_each
                .clone()
                .unwrap_or_else(|| DEFAULT_AFTER_EACH.to_owned()),
        }
    }

    /// The configured parser command, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured command is empty.
    pub fn parser(&self) -> Result<ExternalParser, ParserError> {
        match &self.parser_command {
            Some(command) => ExternalParser::from_command(command),
            None => {
                let command: Vec<String> =
                    DEFAULT_PARSER_COMMAND.iter().map(|s| (*s).to_owned()).collect();
                ExternalParser::from_command(&command)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceParser;
    use crate::wrap::Hooks;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.exprscope.hooks(), TemplateHooks::each("(", ")"));
    }

    #[test]
    fn test_load_from_path_exprscope_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".exprscope.toml")).unwrap();
        writeln!(
            file,
            r#"[exprscope]
parser_command = ["ruby", "dump.rb"]
before_each = "record({{line}}, ("
after_each = "))"
after_all = "report"
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path()).unwrap();
        assert_eq!(
            config.config_file_path,
            Some(dir.path().join(".exprscope.toml"))
        );

        let hooks = config.exprscope.hooks();
        assert_eq!(hooks.before_each(4), "record(4, (");
        assert_eq!(hooks.after_each(4), "))");
        assert_eq!(hooks.before_all(), "");
        assert_eq!(hooks.after_all(), "report");

        let parser = config.exprscope.parser().unwrap();
        assert_eq!(parser.program, "ruby");
        assert_eq!(parser.args, ["dump.rb"]);
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("lib").join("app");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(
            dir.path().join(".exprscope.toml"),
            "[exprscope]\nbefore_all = \"BEGIN\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&nested).unwrap();
        assert_eq!(config.exprscope.before_all.as_deref(), Some("BEGIN"));
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".exprscope.toml"),
            "[exprscope]\nafter_each = \"]\"\n",
        )
        .unwrap();

        let rb_file = dir.path().join("test.rb");
        std::fs::write(&rb_file, "x = 1").unwrap();

        let config = Config::load_from_path(&rb_file).unwrap();
        assert_eq!(config.exprscope.after_each.as_deref(), Some("]"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".exprscope.toml"), "[exprscope\n").unwrap();

        let err = Config::load_from_path(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_parser_command_is_rejected() {
        let config: Config = toml::from_str("[exprscope]\nparser_command = []\n").unwrap();
        assert!(config.exprscope.parser().is_err());
    }

    #[test]
    fn test_default_parser_command() {
        let parser = ExprScopeConfig::default().parser().unwrap();
        assert_eq!(parser.describe(), "ruby scripts/ruby_ast_json.rb");
    }
}
