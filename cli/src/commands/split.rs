//! Split command implementation.

use anyhow::Result;
use clap::Parser;
use subword_core::PreToken;

use super::{read_text, SplitArgs};

/// Split command arguments.
#[derive(Parser, Debug)]
pub struct SplitCommand {
    /// Text to split, or "-" for stdin
    #[arg(short, long)]
    pub input: String,

    #[command(flatten)]
    pub split: SplitArgs,
}

fn render(pre_tokens: &[PreToken<'_>]) -> String {
    pre_tokens
        .iter()
        .map(|p| format!("{}\t{:?}", p.offset, p.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run(cmd: SplitCommand) -> Result<()> {
    let splitter = cmd.split.split_config()?.compile()?;
    let text = read_text(&cmd.input)?;

    let pre_tokens = splitter.split(&text);
    log::debug!("{} pre-tokens with {}", pre_tokens.len(), splitter.config());
    if !pre_tokens.is_empty() {
        println!("{}", render(&pre_tokens));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use subword_core::SplitConfig;

    #[test]
    fn test_render() {
        let splitter = SplitConfig::new(r"\w+|[^\w\s]+", "g").compile().unwrap();
        let pre_tokens = splitter.split("hi, you");

        assert_eq!(render(&pre_tokens), "0\t\"hi\"\n2\t\",\"\n4\t\"you\"");
    }
}
