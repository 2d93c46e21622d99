//! Decode command implementation.

use anyhow::Result;
use clap::Parser;

use super::load_tokenizer;

/// Decode command arguments.
#[derive(Parser, Debug)]
pub struct DecodeCommand {
    /// Path to the trained model JSON
    #[arg(short, long)]
    pub model: String,

    /// Token IDs to decode, separated by commas or whitespace
    #[arg(short, long)]
    pub ids: String,

    /// Skip special tokens during decoding
    #[arg(short, long, default_value_t = false)]
    pub skip_special: bool,
}

/// Parse an id list, dropping entries that are not integers.
fn parse_ids(input: &str) -> Vec<u32> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("Ignoring {s:?}: not a token id");
                None
            }
        })
        .collect()
}

pub fn run(cmd: DecodeCommand) -> Result<()> {
    let tokenizer = load_tokenizer(&cmd.model)?;
    let ids = parse_ids(&cmd.ids);

    let text = tokenizer.decode(&ids, cmd.skip_special);
    println!("{}", text);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("1, 2, 3"), vec![1, 2, 3]);
        assert_eq!(parse_ids("4 5\n6,,7"), vec![4, 5, 6, 7]);
        assert_eq!(parse_ids("8, x, -1, 9.5, 10"), vec![8, 10]);
        assert!(parse_ids("  ").is_empty());
    }
}
