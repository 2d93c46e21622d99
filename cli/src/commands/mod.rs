//! CLI commands for the subword tokenizer.

pub mod decode;
pub mod encode;
pub mod presets;
pub mod split;
pub mod train;

pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use presets::PresetsCommand;
pub use split::SplitCommand;
pub use train::TrainCommand;

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;
use subword_tokenizer::{presets as tokenizer_presets, SplitConfig, Tokenizer};

/// Read `source` as a file path, or stdin when it is "-".
pub(crate) fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {source}"))
    }
}

/// Treat `input` as literal text, or read stdin when it is "-".
pub(crate) fn read_text(input: &str) -> Result<String> {
    if input == "-" {
        read_source(input)
    } else {
        Ok(input.to_string())
    }
}

pub(crate) fn load_tokenizer(path: &str) -> Result<Tokenizer> {
    let file = fs::File::open(path).with_context(|| format!("failed to open model {path}"))?;
    Tokenizer::from_reader(io::BufReader::new(file))
        .with_context(|| format!("failed to load model {path}"))
}

/// Split rule selection shared by commands that take one.
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Built-in preset name (see `subword presets`)
    #[arg(long, conflicts_with = "pattern")]
    pub preset: Option<String>,

    /// Custom split pattern
    #[arg(long)]
    pub pattern: Option<String>,

    /// Flags for --pattern, e.g. "gi"
    #[arg(long, default_value = "g")]
    pub options: String,
}

impl SplitArgs {
    /// The selected rule; the first preset when nothing is given.
    pub fn split_config(&self) -> Result<SplitConfig> {
        let config = match (&self.preset, &self.pattern) {
            (_, Some(pattern)) => SplitConfig::new(pattern.as_str(), self.options.as_str()),
            (Some(name), None) => tokenizer_presets::preset(name)?.split_config(),
            (None, None) => tokenizer_presets::PRESETS[0].split_config(),
        };
        config
            .compile()
            .with_context(|| format!("invalid split rule {config}"))?;
        Ok(config)
    }
}
