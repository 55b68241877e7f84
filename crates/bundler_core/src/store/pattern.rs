//! Simple glob filter for project file listings.

use super::{StoreError, StoreResult};
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Pattern used when the caller does not choose one.
pub const DEFAULT_FILE_PATTERN: &str = "*.py";

/// Compiled filename glob supporting `*` (any run) and `?` (one char).
///
/// Patterns match whole names of direct children only, so separators are
/// not allowed.
#[derive(Debug, Clone)]
pub struct FilePattern {
    glob: String,
    regex: Regex,
}

impl FilePattern {
    /// Compiles a glob such as `*.py` or `test_??.rs`.
    ///
    /// # Errors
    /// - Returns `StoreError::InvalidPattern` when `glob` is blank or contains
    ///   a path separator.
    pub fn parse(glob: &str) -> StoreResult<Self> {
        let trimmed = glob.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidPattern(glob.to_string()));
        }
        if trimmed.contains(['/', '\\']) {
            return Err(StoreError::InvalidPattern(glob.to_string()));
        }

        let mut source = String::with_capacity(trimmed.len() * 2 + 2);
        source.push('^');
        for ch in trimmed.chars() {
            match ch {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|_| StoreError::InvalidPattern(glob.to_string()))?;
        Ok(Self {
            glob: trimmed.to_string(),
            regex,
        })
    }

    /// The normalized glob text.
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.regex.is_match(filename)
    }
}

impl PartialEq for FilePattern {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob
    }
}

impl Eq for FilePattern {}

impl Display for FilePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.glob)
    }
}

#[cfg(test)]
mod tests {
    use super::FilePattern;
    use crate::store::StoreError;

    #[test]
    fn extension_glob_matches_whole_name_only() {
        let pattern = FilePattern::parse("*.py").unwrap();
        assert!(pattern.matches("main.py"));
        assert!(pattern.matches(".py"));
        assert!(!pattern.matches("main.pyc"));
        assert!(!pattern.matches("main_py"));
    }

    #[test]
    fn question_mark_matches_single_char_and_dots_are_literal() {
        let pattern = FilePattern::parse(" v?.txt ").unwrap();
        assert_eq!(pattern.as_str(), "v?.txt");
        assert!(pattern.matches("v1.txt"));
        assert!(!pattern.matches("v10.txt"));
        assert!(!pattern.matches("v1xtxt"));
    }

    #[test]
    fn blank_or_nested_patterns_are_rejected() {
        for glob in ["", "   ", "src/*.rs", "..\\*.py"] {
            let err = FilePattern::parse(glob).unwrap_err();
            assert!(matches!(err, StoreError::InvalidPattern(_)), "{glob}");
        }
    }
}
