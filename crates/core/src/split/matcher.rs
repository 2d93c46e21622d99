//! Compiled span matchers.
//!
//! Split patterns are compiled with the [`regex`] crate when they fit its
//! syntax, and fall up to [`fancy_regex`] when they need look-around or
//! back-references. Callers only ever see the [`SpanMatcher`] trait.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Shared handle to a compiled matcher.
pub type SpanMatcherHandle = Arc<dyn SpanMatcher>;

/// Capability to find the matching spans of a text.
pub trait SpanMatcher: Send + Sync + fmt::Debug {
    /// Byte ranges of all non-overlapping matches, in order of appearance.
    fn find_spans(&self, text: &str) -> Vec<Range<usize>>;

    /// The pattern source this matcher was compiled from.
    fn as_str(&self) -> &str;
}

/// Matcher backed by the linear-time [`regex`] engine.
#[derive(Debug, Clone)]
pub struct BasicMatcher(regex::Regex);

impl BasicMatcher {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(source).map(Self)
    }
}

impl SpanMatcher for BasicMatcher {
    fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.0.find_iter(text).map(|m| m.range()).collect()
    }

    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Matcher backed by the backtracking [`fancy_regex`] engine.
#[derive(Debug, Clone)]
pub struct FancyMatcher(fancy_regex::Regex);

impl FancyMatcher {
    pub fn new(source: &str) -> Result<Self, fancy_regex::Error> {
        fancy_regex::Regex::new(source).map(Self)
    }
}

impl SpanMatcher for FancyMatcher {
    fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        for found in self.0.find_iter(text) {
            match found {
                Ok(m) => spans.push(m.range()),
                Err(err) => {
                    log::warn!(
                        "pattern `{}` aborted after {} matches: {}",
                        self.0.as_str(),
                        spans.len(),
                        err
                    );
                    break;
                }
            }
        }
        spans
    }

    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Compile `source`, preferring the basic engine.
///
/// Returns the error message of the engine that had the last word.
pub fn compile_matcher(source: &str) -> Result<SpanMatcherHandle, String> {
    match BasicMatcher::new(source) {
        Ok(matcher) => Ok(Arc::new(matcher)),
        Err(regex::Error::CompiledTooBig(limit)) => Err(format!(
            "compiled pattern exceeds size limit of {limit} bytes"
        )),
        Err(basic_err) => {
            log::debug!("pattern `{source}` needs fancy-regex: {basic_err}");
            FancyMatcher::new(source)
                .map(|matcher| Arc::new(matcher) as SpanMatcherHandle)
                .map_err(|err| err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPT2_PATTERN: &str =
        r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

    #[test]
    fn test_basic_spans() {
        let matcher = compile_matcher(r"\S+").unwrap();
        assert_eq!(matcher.find_spans("ab  cd"), vec![0..2, 4..6]);
        assert_eq!(matcher.as_str(), r"\S+");
    }

    #[test]
    fn test_falls_up_to_fancy() {
        assert!(BasicMatcher::new(GPT2_PATTERN).is_err());

        let matcher = compile_matcher(GPT2_PATTERN).unwrap();
        let text = "Hello  world";
        let pieces: Vec<&str> = matcher
            .find_spans(text)
            .into_iter()
            .map(|r| &text[r])
            .collect();
        assert_eq!(pieces, vec!["Hello", " ", " world"]);
    }

    #[test]
    fn test_backreference() {
        let matcher = compile_matcher(r"(\w)\1").unwrap();
        assert_eq!(matcher.find_spans("aabcc"), vec![0..2, 3..5]);
    }

    #[test]
    fn test_backtrack_limit_keeps_earlier_spans() {
        let matcher = compile_matcher(r"x|(?:(a)\1?|a)+(?=b)").unwrap();
        let text = format!("x x {}c x", "a".repeat(60));

        // the run of `a`s exhausts the backtracking budget before the last `x`
        assert_eq!(matcher.find_spans(&text), vec![0..1, 2..3]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(compile_matcher("(unclosed").is_err());
        assert!(compile_matcher("[z-a]").is_err());
    }
}
