//! Pattern option flags.
//!
//! Split configurations carry their dialect options as a string of
//! single-letter flags in the ECMAScript style (`"g"`, `"gu"`, `"gi"`).
//! Only `g`, `i`, `m`, `s` and `u` are accepted. The ECMAScript `y` (sticky),
//! `d` (indices) and `v` (set notation) flags have no equivalent here and
//! are rejected.

use crate::error::{Result, TokenizerError};
use std::fmt;
use std::str::FromStr;

/// Parsed pattern flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// `g`: find all matches. The splitter always does; kept for round-tripping.
    pub global: bool,
    /// `i`: case-insensitive matching.
    pub case_insensitive: bool,
    /// `m`: `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `s`: `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// `u`: Unicode mode. Both engines are Unicode-aware regardless.
    pub unicode: bool,
}

impl PatternOptions {
    /// Inline flag group understood by both regex engines, e.g. `(?im)`.
    ///
    /// Empty when no flag changes matching behaviour.
    pub fn inline_flags(&self) -> String {
        let mut flags = String::new();
        if self.case_insensitive {
            flags.push('i');
        }
        if self.multi_line {
            flags.push('m');
        }
        if self.dot_matches_new_line {
            flags.push('s');
        }

        if flags.is_empty() {
            flags
        } else {
            format!("(?{flags})")
        }
    }

    /// Wrap `pattern` with the inline flags.
    pub fn apply(&self, pattern: &str) -> String {
        format!("{}{}", self.inline_flags(), pattern)
    }
}

impl FromStr for PatternOptions {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self> {
        let mut options = PatternOptions::default();

        for flag in s.chars() {
            let slot = match flag {
                'g' => &mut options.global,
                'i' => &mut options.case_insensitive,
                'm' => &mut options.multi_line,
                's' => &mut options.dot_matches_new_line,
                'u' => &mut options.unicode,
                _ => {
                    return Err(TokenizerError::Config(format!(
                        "unsupported pattern flag '{flag}' in \"{s}\""
                    )))
                }
            };
            if *slot {
                return Err(TokenizerError::Config(format!(
                    "repeated pattern flag '{flag}' in \"{s}\""
                )));
            }
            *slot = true;
        }

        Ok(options)
    }
}

impl fmt::Display for PatternOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, flag) in [
            (self.global, 'g'),
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.unicode, 'u'),
        ] {
            if set {
                write!(f, "{flag}")?;
            }
        }
        Ok(())
    }
}
