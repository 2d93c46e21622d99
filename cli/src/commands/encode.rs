//! Encode command implementation.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use subword_tokenizer::{Encoding, Token, TokenStats};

use super::{load_tokenizer, read_text};

/// Encode command arguments.
#[derive(Parser, Debug)]
pub struct EncodeCommand {
    /// Path to the trained model JSON
    #[arg(short, long)]
    pub model: String,

    /// Text to encode, or "-" for stdin
    #[arg(short, long)]
    pub input: String,

    /// Print tokens with offsets as JSON instead of bare IDs
    #[arg(long)]
    pub json: bool,

    /// Append token statistics
    #[arg(long)]
    pub stats: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Serialize)]
struct EncodeReport<'a> {
    ids: &'a [u32],
    tokens: &'a [Token],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<TokenStats>,
}

fn render(encoding: &Encoding, json: bool, stats: bool) -> Result<String> {
    let stats = stats.then(|| encoding.stats());

    if json {
        let report = EncodeReport {
            ids: &encoding.ids,
            tokens: &encoding.tokens,
            stats,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = encoding
        .ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(stats) = stats {
        out.push_str(&format!(
            "\ntokens: {}, unique: {}, chars: {}, avg length: {:.2}",
            stats.total_tokens, stats.unique_tokens, stats.character_count, stats.average_length
        ));
    }
    Ok(out)
}

pub fn run(cmd: EncodeCommand) -> Result<()> {
    let tokenizer = load_tokenizer(&cmd.model)?;
    let text = read_text(&cmd.input)?;

    let encoding = tokenizer.encode(&text);
    log::debug!("Encoded {} bytes into {} tokens", text.len(), encoding.len());

    let output = render(&encoding, cmd.json, cmd.stats)?;
    match &cmd.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("failed to write {path}"))?;
        }
        None => println!("{output}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use subword_tokenizer::Tokenizer;

    fn encoding() -> Encoding {
        Tokenizer::builder()
            .vocab_size(12)
            .special_tokens(["<UNK>"])
            .train("ab ab abc")
            .unwrap()
            .encode("ab c")
    }

    #[test]
    fn test_render_ids() {
        let encoding = encoding();
        let expected = encoding
            .ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(render(&encoding, false, false).unwrap(), expected);
        assert!(render(&encoding, false, true)
            .unwrap()
            .ends_with("tokens: 2, unique: 2, chars: 3, avg length: 1.50"));
    }

    #[test]
    fn test_render_json() {
        let encoding = encoding();
        let value: serde_json::Value =
            serde_json::from_str(&render(&encoding, true, true).unwrap()).unwrap();

        assert_eq!(value["tokens"][0]["value"], "ab");
        assert_eq!(value["tokens"][1]["offset"], 3);
        assert_eq!(value["stats"]["totalTokens"], 2);

        let value: serde_json::Value =
            serde_json::from_str(&render(&encoding, true, false).unwrap()).unwrap();
        assert!(value.get("stats").is_none());
    }
}
