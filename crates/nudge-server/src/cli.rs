//! Command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nudge-server")]
#[command(author, version, about = "Sentiment-aware next-word suggestions")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train from the configured corpus and serve suggestions over HTTP
    Serve(ServeArgs),

    /// Train from a corpus and print one suggestion for TEXT
    Suggest(SuggestArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Configuration file path (YAML)
    #[arg(short, long, env = "NUDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Corpus to train from, overriding the configuration
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Configuration file path (YAML); its `model` section is used
    #[arg(short, long, env = "NUDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Corpus to train from, overriding the configuration
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Slider state: 0 = positive, 1 = neutral, 2 = negative
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub signal: i64,

    /// Text typed so far
    #[arg(required = true, trailing_var_arg = true)]
    pub text: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl SuggestArgs {
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}
