//! Train command implementation.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use subword_tokenizer::{Tokenizer, TrainingStrategy};

use super::{read_source, SplitArgs};

/// Train command arguments.
#[derive(Parser, Debug)]
pub struct TrainCommand {
    /// Training corpus file, or "-" for stdin
    #[arg(short, long)]
    pub corpus: String,

    /// Target vocabulary size, special tokens included
    #[arg(short = 's', long, default_value_t = 200)]
    pub vocab_size: usize,

    #[command(flatten)]
    pub split: SplitArgs,

    /// Special token, repeatable; defaults to <UNK> <PAD> <EOS>
    #[arg(long = "special", value_name = "TOKEN")]
    pub special: Vec<String>,

    /// Merge selection strategy: incremental or rescan
    #[arg(long, default_value = "incremental")]
    pub strategy: TrainingStrategy,

    /// Where to write the model JSON; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn run(cmd: TrainCommand) -> Result<()> {
    let corpus = read_source(&cmd.corpus)?;
    let split = cmd.split.split_config()?;
    log::info!(
        "Training on {} bytes: vocab size {}, split {}, strategy {}",
        corpus.len(),
        cmd.vocab_size,
        split,
        cmd.strategy
    );

    let mut builder = Tokenizer::builder()
        .vocab_size(cmd.vocab_size)
        .split(split)
        .strategy(cmd.strategy);
    if !cmd.special.is_empty() {
        builder = builder.special_tokens(cmd.special);
    }

    let start = Instant::now();
    let tokenizer = builder.train(&corpus).context("training failed")?;
    log::info!(
        "Trained {} tokens in {:.2}s",
        tokenizer.vocab_size(),
        start.elapsed().as_secs_f64()
    );

    match &cmd.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
            let mut writer = BufWriter::new(file);
            tokenizer.to_writer(&mut writer)?;
            writer.flush()?;
            log::info!("Model saved to {path}");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            tokenizer.to_writer(&mut out)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_args() {
        let cmd = TrainCommand::try_parse_from([
            "train",
            "--corpus",
            "corpus.txt",
            "--vocab-size",
            "120",
            "--preset",
            "Word & Punctuation",
            "--special",
            "<UNK>",
            "--special",
            "<EOS>",
            "--strategy",
            "rescan",
        ])
        .unwrap();

        assert_eq!(cmd.vocab_size, 120);
        assert_eq!(cmd.special, vec!["<UNK>", "<EOS>"]);
        assert_eq!(cmd.strategy, TrainingStrategy::Rescan);
        assert_eq!(cmd.split.preset.as_deref(), Some("Word & Punctuation"));
        assert!(cmd.output.is_none());
    }

    #[test]
    fn test_preset_conflicts_with_pattern() {
        let parsed = TrainCommand::try_parse_from([
            "train", "--corpus", "-", "--preset", "Whitespace", "--pattern", r"\w+",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_bad_strategy() {
        let parsed = TrainCommand::try_parse_from(["train", "--corpus", "-", "--strategy", "fast"]);
        assert!(parsed.is_err());
    }
}
