//! Per-language resources.
//!
//! Sentence models and stop-word lists are loaded once per process and
//! shared through reference-counted handles. The caches only ever grow;
//! a loaded entry is never replaced.

use std::sync::{Arc, LazyLock};

use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;

use crate::analysis::sentence::{SentenceModel, builtin_abbreviations};
use crate::analysis::stop_words::{StopWords, builtin_stop_words};
use crate::error::Result;

/// Language used when a lenient lookup misses.
pub const DEFAULT_LANGUAGE: &str = "english";

const SUPPORTED_LANGUAGES: &[&str] = &[
    "czech",
    "dutch",
    "english",
    "french",
    "german",
    "italian",
    "spanish",
    "ukrainian",
];

type Cache<T> = LazyLock<RwLock<AHashMap<String, Arc<T>>>>;

static SENTENCE_MODELS: Cache<SentenceModel> = LazyLock::new(Default::default);
static STOP_WORDS: Cache<StopWords> = LazyLock::new(Default::default);

/// Languages with a built-in sentence model and stop-word list.
pub fn available() -> &'static [&'static str] {
    SUPPORTED_LANGUAGES
}

/// Check whether a language is supported.
pub fn is_available(language: &str) -> bool {
    builtin_abbreviations(language).is_some() && builtin_stop_words(language).is_some()
}

/// Shared sentence model for a language.
pub fn sentence_model(language: &str) -> Result<Arc<SentenceModel>> {
    cached(&SENTENCE_MODELS, language, SentenceModel::for_language)
}

/// Shared stop-word list for a language.
pub fn stop_words(language: &str) -> Result<Arc<StopWords>> {
    cached(&STOP_WORDS, language, StopWords::for_language)
}

fn cached<T>(
    cache: &Cache<T>,
    language: &str,
    load: impl FnOnce(&str) -> Result<T>,
) -> Result<Arc<T>> {
    if let Some(entry) = cache.read().get(language) {
        return Ok(Arc::clone(entry));
    }

    let mut entries = cache.write();
    if let Some(entry) = entries.get(language) {
        return Ok(Arc::clone(entry));
    }

    let entry = Arc::new(load(language)?);
    debug!("Loaded {} resources for language '{language}'", std::any::type_name::<T>());
    entries.insert(language.to_string(), Arc::clone(&entry));
    Ok(entry)
}
