//! Command implementations for the termscan CLI.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};
use serde_json::Value;

use crate::analysis::language::{self, DEFAULT_LANGUAGE};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, TermscanError};
use crate::extraction::{
    DEFAULT_THRESHOLD, Dictionary, Extractor, JsonRecord, MemoryDictionary, Record, TYPE_FIELD,
    TypeRegistry,
};

/// Execute a CLI command.
pub fn execute_command(args: TermscanArgs) -> Result<()> {
    match &args.command {
        Command::Extract(extract_args) => extract_terms(extract_args.clone(), &args),
        Command::Save(save_args) => save_extractor(save_args.clone(), &args),
        Command::Languages => list_languages(&args),
    }
}

/// Extract dictionary terms from a text.
fn extract_terms(args: ExtractArgs, cli_args: &TermscanArgs) -> Result<()> {
    let registry = TypeRegistry::default();
    let extractor = match (&args.extractor, &args.dictionary) {
        (Some(path), _) => {
            let extractor = Extractor::load(path, &registry)
                .with_context(|| format!("failed to load extractor {}", path.display()))?;
            match args.threshold {
                Some(threshold) => extractor.with_default_threshold(threshold),
                None => extractor,
            }
        }
        (None, Some(path)) => build_extractor(
            path,
            args.threshold.unwrap_or(DEFAULT_THRESHOLD),
            &args.matcher,
            &registry,
        )?,
        (None, None) => {
            return Err(TermscanError::invalid_config(
                "either --dictionary or --extractor is required",
            ));
        }
    };

    let text = read_text(args.text.as_deref())?;

    let start = Instant::now();
    let matches = extractor
        .extract(&text)
        .map(|found| found.to_json())
        .collect::<Result<Vec<_>>>()?;
    let duration = start.elapsed();

    info!(
        "Found {} matches of {} terms in {} chars",
        matches.len(),
        extractor.dictionary().len(),
        text.chars().count()
    );

    let source = args
        .text
        .as_deref()
        .map_or_else(|| "standard input".to_string(), |path| path.display().to_string());
    let results = ExtractionResults {
        total_matches: matches.len(),
        matches,
        duration_ms: duration.as_millis() as u64,
    };
    output_result(&format!("Matches in {source}:"), &results, cli_args)
}

/// Build an extractor from a dictionary file and save it.
fn save_extractor(args: SaveArgs, cli_args: &TermscanArgs) -> Result<()> {
    let registry = TypeRegistry::default();
    let extractor = build_extractor(&args.dictionary, args.threshold, &args.matcher, &registry)?;

    extractor
        .save(&args.output)
        .with_context(|| format!("failed to write extractor {}", args.output.display()))?;

    let result = SaveResult {
        path: args.output.display().to_string(),
        terms: extractor.dictionary().len(),
        default_threshold: extractor.default_threshold(),
        language: extractor.config().language.clone(),
    };
    output_result("Extractor saved", &result, cli_args)
}

/// List the supported languages.
fn list_languages(cli_args: &TermscanArgs) -> Result<()> {
    let result = LanguageList {
        languages: language::available().iter().map(ToString::to_string).collect(),
        default: DEFAULT_LANGUAGE.to_string(),
    };
    output_result("Supported languages", &result, cli_args)
}

fn build_extractor(
    dictionary: &Path,
    threshold: f64,
    matcher: &MatcherArgs,
    registry: &TypeRegistry,
) -> Result<Extractor> {
    let dictionary = load_dictionary(dictionary, registry)?;
    Extractor::with_options(dictionary, threshold, matcher.to_config())
}

/// Load a dictionary file: a JSON object mapping each term to its record.
///
/// Records carrying a `_type` tag are rebuilt through the registry, plain
/// objects become [`JsonRecord`]s.
pub fn load_dictionary(path: &Path, registry: &TypeRegistry) -> Result<MemoryDictionary> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read dictionary {}", path.display()))?;
    let Value::Object(entries) = serde_json::from_str::<Value>(&content)
        .with_context(|| format!("failed to parse dictionary {}", path.display()))?
    else {
        return Err(TermscanError::invalid_config(format!(
            "dictionary {} must be a JSON object mapping terms to records",
            path.display()
        )));
    };

    let mut dictionary = MemoryDictionary::new();
    for (term, value) in entries {
        let record = dictionary_record(value, registry)
            .with_context(|| format!("invalid record for term '{term}'"))?;
        dictionary.insert(term, record);
    }

    debug!("Loaded {} terms from {}", dictionary.len(), path.display());
    Ok(dictionary)
}

fn dictionary_record(value: Value, registry: &TypeRegistry) -> Result<Arc<dyn Record>> {
    if value.get(TYPE_FIELD).is_some() {
        registry.record(value)
    } else {
        Ok(Arc::new(JsonRecord::from_value(value)?))
    }
}

fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)
            .with_context(|| format!("failed to read text {}", path.display()))?),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            Ok(text)
        }
    }
}
