//! Text spliced around the program and around each wrap point.

use crate::constants::LINE_PLACEHOLDER;

/// Supplies the text inserted by [`super::WrapExpressions`].
///
/// Every method defaults to the empty string.
pub trait Hooks {
    /// Inserted once before the whole program.
    fn before_all(&self) -> String {
        String::new()
    }

    /// Inserted once after the whole program.
    fn after_all(&self) -> String {
        String::new()
    }

    /// Inserted before the wrap point ending on `line`.
    fn before_each(&self, _line: usize) -> String {
        String::new()
    }

    /// Inserted after the wrap point ending on `line`.
    fn after_each(&self, _line: usize) -> String {
        String::new()
    }
}

/// Hooks that insert nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl Hooks for NoHooks {}

/// Hooks built from fixed templates.
///
/// `{line}` in the per-point templates is replaced by the wrap point's line
/// number; the prologue and epilogue are inserted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateHooks {
    /// Program prologue.
    pub before_all: String,
    /// Program epilogue.
    pub after_all: String,
    /// Template inserted before each wrap point.
    pub before_each: String,
    /// Template inserted after each wrap point.
    pub after_each: String,
}

impl TemplateHooks {
    /// Hooks that bracket every wrap point with `before_each`/`after_each`.
    #[must_use]
    pub fn each(before_each: impl Into<String>, after_each: impl Into<String>) -> Self {
        Self {
            before_each: before_each.into(),
            after_each: after_each.into(),
            ..Self::default()
        }
    }

    /// Sets the program prologue and epilogue.
    #[must_use]
    pub fn with_all(mut self, before_all: impl Into<String>, after_all: impl Into<String>) -> Self {
        self.before_all = before_all.into();
        self.after_all = after_all.into();
        self
    }
}

fn render(template: &str, line: usize) -> String {
    if template.contains(LINE_PLACEHOLDER) {
        template.replace(LINE_PLACEHOLDER, &line.to_string())
    } else {
        template.to_owned()
    }
}

impl Hooks for TemplateHooks {
    fn before_all(&self) -> String {
        self.before_all.clone()
    }

    fn after_all(&self) -> String {
        self.after_all.clone()
    }

    fn before_each(&self, line: usize) -> String {
        render(&self.before_each, line)
    }

    fn after_each(&self, line: usize) -> String {
        render(&self.after_each, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        assert_eq!(NoHooks.before_all(), "");
        assert_eq!(NoHooks.after_each(3), "");
    }

    #[test]
    fn test_line_placeholder_is_substituted() {
        let hooks = TemplateHooks::each("record({line}, (", "))").with_all("{line}", "");
        assert_eq!(hooks.before_each(12), "record(12, (");
        assert_eq!(hooks.after_each(12), "))");
        assert_eq!(hooks.before_all(), "{line}");
    }
}
