//! Shell-style glob patterns over relative paths.
//!
//! The dialect is deliberately small: `*` matches any run of characters
//! (including `/` and the empty string) and every other character matches
//! itself. A pattern must match the whole path, not a substring.

use regex::Regex;
use std::fmt;

/// A compiled glob.
#[derive(Debug, Clone)]
pub struct Pattern {
    glob: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `glob` into a whole-string matcher.
    ///
    /// Translation is total: every non-`*` character is escaped, so the
    /// resulting expression is always valid. The error path only exists for
    /// the regex engine's size limits.
    pub fn compile(glob: &str) -> Result<Self, regex::Error> {
        let body = glob
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^(?s:{})$", body))?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}
