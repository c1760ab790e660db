//! Command line argument parsing for the termscan CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::language::DEFAULT_LANGUAGE;
use crate::analysis::token_filter::LowercaseTransform;
use crate::extraction::DEFAULT_THRESHOLD;
use crate::matching::MatcherConfig;

/// termscan - Approximate dictionary term extraction
#[derive(Parser, Debug, Clone)]
#[command(name = "termscan")]
#[command(about = "Find dictionary terms in free text by approximate matching")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TermscanArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TermscanArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract dictionary terms from a text
    Extract(ExtractArgs),

    /// Build an extractor from a dictionary and save it as JSON
    Save(SaveArgs),

    /// List the supported languages
    Languages,
}

/// Matcher options shared by the commands building an extractor
#[derive(Args, Debug, Clone, PartialEq)]
pub struct MatcherArgs {
    /// Language of the text
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Fall back to the English sentence model and no stop words for an unsupported language
    #[arg(long)]
    pub lenient_language: bool,

    /// Allow matches to begin or end at a stop word
    #[arg(long)]
    pub keep_stop_words: bool,

    /// Let whitespace contribute bigrams
    #[arg(long)]
    pub keep_whitespace: bool,

    /// Lowercase words before matching
    #[arg(long)]
    pub lowercase: bool,

    /// Words shorter than this keep their case (implies --lowercase)
    #[arg(long, value_name = "N")]
    pub lowercase_min_len: Option<usize>,

    /// Short all-capital words keep their case, others are lowercased (implies --lowercase)
    #[arg(long)]
    pub except_caps: bool,
}

impl MatcherArgs {
    /// Matcher configuration described by the flags.
    pub fn to_config(&self) -> MatcherConfig {
        let config = MatcherConfig::new(self.language.clone())
            .with_strict_language(!self.lenient_language)
            .with_strip_stop_words(!self.keep_stop_words)
            .with_omit_whitespace(!self.keep_whitespace);

        match self.lowercase_transform() {
            Some(transform) => config.with_transform(transform),
            None => config,
        }
    }

    fn lowercase_transform(&self) -> Option<LowercaseTransform> {
        if !(self.lowercase || self.except_caps || self.lowercase_min_len.is_some()) {
            return None;
        }
        Some(
            LowercaseTransform::new()
                .with_min_len(self.lowercase_min_len.unwrap_or(0))
                .with_except_caps(self.except_caps),
        )
    }
}

/// Arguments for extracting terms
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// Dictionary JSON mapping each term to a record object
    #[arg(short, long, required_unless_present = "extractor", conflicts_with = "extractor")]
    pub dictionary: Option<PathBuf>,

    /// Extractor saved by the `save` command (matcher options are taken from it)
    #[arg(short, long)]
    pub extractor: Option<PathBuf>,

    /// Text file to scan (reads standard input when omitted)
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// Default matching threshold, in (0, 1]
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    #[command(flatten)]
    pub matcher: MatcherArgs,
}

/// Arguments for saving an extractor
#[derive(Parser, Debug, Clone)]
pub struct SaveArgs {
    /// Dictionary JSON mapping each term to a record object
    #[arg(short, long)]
    pub dictionary: PathBuf,

    /// Path of the extractor JSON to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Default matching threshold, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: f64,

    #[command(flatten)]
    pub matcher: MatcherArgs,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// One JSON object per line
    Jsonl,
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(format!("threshold must be in (0, 1], got {threshold}"))
    }
}
