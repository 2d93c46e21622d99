//! Built-in split rules and the pattern generator seam.

use subword_core::{Result, SplitConfig, TokenizerError};

/// A named, ready-made split configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub pattern: &'static str,
    pub options: &'static str,
    pub description: &'static str,
}

impl Preset {
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig::new(self.pattern, self.options)
    }
}

/// All built-in presets; the first one is the default.
///
/// Patterns run in the Rust regex dialect, where `\w` and `\s` are
/// Unicode-aware. In ECMAScript `\w` is ASCII-only, so the presets built on
/// `\w` keep accented and non-Latin letters inside words (`"café"` is one
/// pre-token, not `"caf"` and `"é"`).
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Whitespace",
        pattern: r"\S+",
        options: "g",
        description: "Splits text by whitespace characters. Matches any non-whitespace sequence.",
    },
    Preset {
        name: "Word & Punctuation",
        pattern: r"\w+|[^\w\s]+",
        options: "g",
        description: "Matches words (alphanumeric) and sequences of punctuation separately.",
    },
    Preset {
        name: "Simple Word",
        pattern: r"[a-zA-Z]+",
        options: "g",
        description: "Extracts only alphabetic words, ignoring numbers and punctuation.",
    },
    Preset {
        name: "Twitter / Social",
        pattern: r"[#@]?[\w]+|[^\w\s]+",
        options: "g",
        description: "Keeps hashtags (#tag) and mentions (@user) together as single tokens.",
    },
    Preset {
        name: "Code (Simple)",
        pattern: r"\w+|==|!=|<=|>=|&&|\|\||\p{P}",
        options: "gu",
        description: "Attempts to keep code operators together while splitting keywords.",
    },
];

/// Look up a preset by name, ignoring ASCII case.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Like [`find_preset`], but a missing preset is a configuration error.
pub fn preset(name: &str) -> Result<&'static Preset> {
    find_preset(name).ok_or_else(|| {
        let known: Vec<&str> = PRESETS.iter().map(|p| p.name).collect();
        TokenizerError::Config(format!(
            "unknown preset {name:?} (known: {})",
            known.join(", ")
        ))
    })
}

/// Something that turns a free-text description into a split rule, e.g. a
/// remote language model.
pub trait PatternGenerator {
    fn generate(&self, prompt: &str) -> Result<SplitConfig>;
}

/// Ask `generator` for a split rule, falling back to `fallback` when there is
/// no generator, it fails, or its pattern does not compile.
pub fn resolve_split_config(
    generator: Option<&dyn PatternGenerator>,
    prompt: &str,
    fallback: &Preset,
) -> SplitConfig {
    let Some(generator) = generator else {
        return fallback.split_config();
    };

    match generator.generate(prompt) {
        Ok(config) => match config.compile() {
            Ok(_) => config,
            Err(e) => {
                log::warn!("Generated split rule {config} rejected: {e}; using {}", fallback.name);
                fallback.split_config()
            }
        },
        Err(e) => {
            log::warn!("Pattern generation failed: {e}; using {}", fallback.name);
            fallback.split_config()
        }
    }
}
