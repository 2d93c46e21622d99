//! Pattern-driven pre-tokenization.
//!
//! A [`Splitter`] scans text left to right and keeps only the substrings that
//! match its configured pattern. Text between matches is dropped; it is not
//! an error for a pattern to match nothing at all.

pub mod matcher;
pub mod options;

pub use matcher::{compile_matcher, BasicMatcher, FancyMatcher, SpanMatcher, SpanMatcherHandle};
pub use options::PatternOptions;

use crate::error::{Result, TokenizerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally supplied split rule: a pattern plus its dialect flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitConfig {
    /// Pattern matching the pre-tokens themselves (not the delimiters).
    pub pattern: String,
    /// Flag letters, see [`PatternOptions`].
    #[serde(default)]
    pub pattern_options: String,
}

impl SplitConfig {
    /// Create a new split configuration.
    pub fn new(pattern: impl Into<String>, pattern_options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            pattern_options: pattern_options.into(),
        }
    }

    /// Parse the option flags.
    pub fn options(&self) -> Result<PatternOptions> {
        self.pattern_options.parse()
    }

    /// Compile into a [`Splitter`].
    pub fn compile(&self) -> Result<Splitter> {
        Splitter::new(self.clone())
    }
}

impl Default for SplitConfig {
    /// Runs of non-whitespace.
    fn default() -> Self {
        Self::new(r"\S+", "g")
    }
}

impl fmt::Display for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.pattern_options)
    }
}

/// A matched substring and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreToken<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Compiled split rule.
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitConfig,
    matcher: SpanMatcherHandle,
}

impl Splitter {
    /// Compile a split configuration.
    ///
    /// Fails with a configuration error before any text is seen.
    pub fn new(config: SplitConfig) -> Result<Self> {
        let options = config.options()?;
        let source = options.apply(&config.pattern);
        let matcher =
            compile_matcher(&source).map_err(|reason| TokenizerError::InvalidPattern {
                pattern: config.pattern.clone(),
                reason,
            })?;

        Ok(Self { config, matcher })
    }

    /// Use an already compiled matcher, e.g. one written for another dialect.
    ///
    /// `config` is kept only as the description carried by models.
    pub fn with_matcher(config: SplitConfig, matcher: SpanMatcherHandle) -> Self {
        Self { config, matcher }
    }

    /// The configuration this splitter was built from.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `text` into pre-tokens, in order of appearance.
    pub fn split<'a>(&self, text: &'a str) -> Vec<PreToken<'a>> {
        self.matcher
            .find_spans(text)
            .into_iter()
            .filter(|span| !span.is_empty())
            .map(|span| PreToken {
                text: &text[span.start..span.end],
                offset: span.start,
            })
            .collect()
    }

    /// Split `text` and keep only the substrings.
    pub fn split_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.split(text).into_iter().map(|p| p.text).collect()
    }
}

/// Compile `config` and split `text` in one step.
pub fn split<'a>(text: &'a str, config: &SplitConfig) -> Result<Vec<PreToken<'a>>> {
    Ok(config.compile()?.split(text))
}
