//! Ignore rules for directories that should never be recorded.
//!
//! The pattern file holds one shell glob per line. Lines starting with `#`
//! (after leading whitespace) and blank lines are skipped. A path is ignored
//! when its full string matches any pattern, with `fnmatch` semantics: `*`
//! crosses `/`, braces and backslashes are literal, and an unclosed `[`
//! matches itself.
//!
//! The file is read on every check so edits apply to the next operation.

use std::fs;
use std::io;
use std::path::PathBuf;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

/// Handle to the ignore-pattern file.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    path: Option<PathBuf>,
}

impl IgnoreFilter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A filter without a pattern file; nothing is ever ignored.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Returns true if `path` matches any pattern in the ignore file.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.load_rules().is_match(path)
    }

    /// Reads and compiles the current pattern file.
    ///
    /// Fails open: a missing or unreadable file yields an empty rule set.
    pub fn load_rules(&self) -> IgnoreRules {
        let Some(path) = self.path.as_deref() else {
            return IgnoreRules::default();
        };

        match fs::read_to_string(path) {
            Ok(contents) => IgnoreRules::parse(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => IgnoreRules::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignore file unreadable, ignoring nothing");
                IgnoreRules::default()
            }
        }
    }
}

/// Compiled set of ignore patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl IgnoreRules {
    /// Parses pattern-file contents. Invalid globs are skipped with a warning.
    pub fn parse(contents: &str) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();

        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match GlobBuilder::new(&fnmatch_to_glob(trimmed))
                .backslash_escape(false)
                .build()
            {
                Ok(glob) => {
                    builder.add(glob);
                    patterns.push(trimmed.to_string());
                }
                Err(err) => warn!(pattern = trimmed, error = %err, "skipping invalid ignore pattern"),
            }
        }

        if patterns.is_empty() {
            return Self::default();
        }

        match builder.build() {
            Ok(set) => Self {
                patterns,
                set: Some(set),
            },
            Err(err) => {
                warn!(error = %err, "failed to build ignore matcher, ignoring nothing");
                Self::default()
            }
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.as_ref().is_some_and(|set| set.is_match(path))
    }

    #[cfg(test)]
    fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Rewrites an `fnmatch` pattern into globset syntax. Braces become literal
/// and a `[` with no closing `]` matches itself; classes are copied as is.
fn fnmatch_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '[' => {
                if let Some(end) = class_end(&chars, i) {
                    glob.extend(&chars[i..=end]);
                    i = end + 1;
                    continue;
                }
                glob.push_str("[[]");
            }
            '{' => glob.push_str("[{]"),
            '}' => glob.push_str("[}]"),
            c => glob.push(c),
        }
        i += 1;
    }
    glob
}

/// Index of the `]` closing the class opened at `start`. A `]` right after
/// the opening `[` or `[!` is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars
        .get(j..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}
