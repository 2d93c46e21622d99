//! Presets command implementation.

use anyhow::Result;
use clap::Parser;
use subword_tokenizer::{Preset, PRESETS};

/// Presets command arguments.
#[derive(Parser, Debug)]
pub struct PresetsCommand {
    /// Print only the preset names
    #[arg(long)]
    pub names: bool,
}

fn describe(preset: &Preset) -> String {
    format!(
        "{}\n  /{}/{}\n  {}",
        preset.name, preset.pattern, preset.options, preset.description
    )
}

pub fn run(cmd: PresetsCommand) -> Result<()> {
    for preset in PRESETS {
        if cmd.names {
            println!("{}", preset.name);
        } else {
            println!("{}", describe(preset));
        }
    }
    Ok(())
}
