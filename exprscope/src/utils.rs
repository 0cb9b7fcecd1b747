use crate::ast::Range;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Converts byte offsets into `(line, column)` pairs.
///
/// The parser reports byte offsets, but wrap points are keyed by the line
/// their range ends on, and candidates on one line are compared by column.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
    /// Length of the indexed text.
    len: usize,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Converts a byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Splits a byte offset into a 1-indexed line and a 0-indexed byte column.
    #[must_use]
    pub fn decompose(&self, offset: usize) -> (usize, usize) {
        let line = self.line_index(offset);
        (line, offset - self.line_starts[line - 1])
    }

    /// Builds a range from an offset pair, rejecting inverted or out-of-bounds pairs.
    #[must_use]
    pub fn range_for(&self, begin: usize, end: usize) -> Option<Range> {
        Range::spanning(begin, end).filter(|range| range.end() <= self.len)
    }
}

/// Reads a program from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file (or stdin) cannot be read as UTF-8.
pub fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use exprscope::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\lib\\foo.rb")), "lib/foo.rb");
/// assert_eq!(normalize_display_path(Path::new("./lib/foo.rb")), "lib/foo.rb");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Validates that an output path doesn't escape the working directory via traversal.
///
/// Resolves the longest existing ancestor (following symlinks) and requires the
/// non-existent remainder to contain no `..` components.
///
/// # Errors
///
/// Returns an error if the current directory cannot be resolved or if the path
/// lies outside of it.
pub fn validate_output_path(path: &Path) -> anyhow::Result<PathBuf> {
    let canonical_root = std::env::current_dir()?.canonicalize()?;

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        canonical_root.join(path)
    };

    let mut ancestor = absolute_path.as_path();
    while !ancestor.exists() {
        match ancestor.parent() {
            Some(p) => ancestor = p,
            None => break,
        }
    }

    let canonical_ancestor = ancestor.canonicalize().map_err(|e| {
        anyhow::anyhow!(
            "Failed to canonicalize ancestor path {}: {}",
            ancestor.display(),
            e
        )
    })?;
    if !canonical_ancestor.starts_with(&canonical_root) {
        anyhow::bail!(
            "Output path '{}' is outside the current working directory '{}'.",
            canonical_ancestor.display(),
            canonical_root.display()
        );
    }

    if let Ok(remainder) = absolute_path.strip_prefix(ancestor) {
        if remainder
            .components()
            .any(|component| matches!(component, std::path::Component::ParentDir))
        {
            anyhow::bail!(
                "Output path contains '..' in non-existent portion: '{}'",
                path.display()
            );
        }
    }

    Ok(absolute_path)
}
