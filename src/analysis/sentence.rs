//! Sentence boundary detection.
//!
//! Sentence splitting is delegated to a [`SentenceSplitter`]. The splitter
//! only has to return the sentences as substrings of the input; the
//! [`Tokenizer`](crate::analysis::tokenizer::Tokenizer) re-anchors them onto
//! the original offsets, so splitters are free to drop inter-sentence
//! whitespace.
//!
//! The built-in [`UnicodeSentenceSplitter`] applies the UAX #29 sentence
//! boundary rules and then undoes breaks that follow a known abbreviation of
//! the configured [`SentenceModel`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use termscan::analysis::sentence::{SentenceModel, SentenceSplitter, UnicodeSentenceSplitter};
//!
//! let model = Arc::new(SentenceModel::for_language("english").unwrap());
//! let splitter = UnicodeSentenceSplitter::new(model);
//!
//! let sentences = splitter.split("Mr. Smith is here. He waits.");
//! assert_eq!(sentences, vec!["Mr. Smith is here.", "He waits."]);
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use ahash::AHashSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, TermscanError};

/// Trait for sentence boundary detectors.
///
/// Implementations return the sentences of `text` in order, as substrings of
/// `text`. Leading and trailing whitespace may be omitted; no other
/// characters may be dropped or reordered.
pub trait SentenceSplitter: Debug + Send + Sync {
    /// Split text into sentences.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Name of the language the splitter is configured for.
    fn language(&self) -> &str;
}

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "inc.", "ltd.", "co.", "corp.", "no.", "fig.", "approx.", "dept.", "est.", "gen.", "gov.",
    "lt.", "col.", "capt.", "sgt.", "rev.", "hon.", "mt.", "jan.", "feb.", "mar.", "apr.",
    "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.", "dec.", "u.s.", "u.k.", "a.m.",
    "p.m.", "cf.", "al.",
];

const GERMAN_ABBREVIATIONS: &[&str] = &[
    "z.b.", "bzw.", "usw.", "d.h.", "ca.", "nr.", "dr.", "prof.", "hr.", "fr.", "vgl.", "str.",
    "u.a.", "evtl.", "ggf.", "inkl.", "bzgl.", "sog.", "jh.", "s.",
];

const FRENCH_ABBREVIATIONS: &[&str] = &[
    "m.", "mme.", "mlle.", "dr.", "etc.", "p.ex.", "cf.", "av.", "bd.", "st.", "ste.", "env.",
    "vol.", "chap.", "n°.", "p.",
];

const CZECH_ABBREVIATIONS: &[&str] = &[
    "např.", "tzv.", "atd.", "apod.", "tj.", "resp.", "mj.", "př.", "str.", "č.", "ing.",
    "mgr.", "doc.", "prof.", "dr.", "tzn.", "min.", "max.", "ul.", "sv.",
];

const DUTCH_ABBREVIATIONS: &[&str] = &[
    "dhr.", "mevr.", "bijv.", "o.a.", "d.w.z.", "enz.", "blz.", "nr.", "ca.", "dr.", "prof.",
    "mr.", "ir.", "drs.", "m.b.t.",
];

const SPANISH_ABBREVIATIONS: &[&str] = &[
    "sr.", "sra.", "srta.", "dr.", "dra.", "etc.", "ud.", "uds.", "pág.", "núm.", "av.",
    "prof.", "lic.", "ing.", "p.ej.",
];

const ITALIAN_ABBREVIATIONS: &[&str] = &[
    "sig.", "sigg.", "dott.", "prof.", "ecc.", "pag.", "avv.", "ing.", "arch.", "geom.",
    "p.es.", "s.p.a.",
];

const UKRAINIAN_ABBREVIATIONS: &[&str] = &[
    "т.д.", "т.п.", "р.", "ст.", "див.", "напр.", "ім.", "вул.", "м.", "проф.", "д-р.", "с.",
];

/// Built-in abbreviation table for a language, if the language is supported.
pub(crate) fn builtin_abbreviations(language: &str) -> Option<&'static [&'static str]> {
    let table = match language {
        "english" => ENGLISH_ABBREVIATIONS,
        "german" => GERMAN_ABBREVIATIONS,
        "french" => FRENCH_ABBREVIATIONS,
        "czech" => CZECH_ABBREVIATIONS,
        "dutch" => DUTCH_ABBREVIATIONS,
        "spanish" => SPANISH_ABBREVIATIONS,
        "italian" => ITALIAN_ABBREVIATIONS,
        "ukrainian" => UKRAINIAN_ABBREVIATIONS,
        _ => return None,
    };
    Some(table)
}

/// Language-specific sentence splitting data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceModel {
    language: String,
    abbreviations: AHashSet<String>,
}

impl SentenceModel {
    /// Create a model from an abbreviation list (each entry ending with `.`).
    pub fn new<S, I, A>(language: S, abbreviations: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        SentenceModel {
            language: language.into(),
            abbreviations: abbreviations
                .into_iter()
                .map(|abbreviation| abbreviation.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Load the built-in model for a language.
    pub fn for_language(language: &str) -> Result<Self> {
        builtin_abbreviations(language)
            .map(|table| Self::new(language, table.iter().copied()))
            .ok_or_else(|| TermscanError::unsupported_language(language))
    }

    /// The language this model belongs to.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Check whether a word (including its trailing period) is an abbreviation.
    ///
    /// Single-letter initials such as `J.` are always abbreviations.
    pub fn is_abbreviation(&self, word: &str) -> bool {
        let Some(stem) = word.strip_suffix('.') else {
            return false;
        };
        let mut chars = stem.chars();
        if let (Some(initial), None) = (chars.next(), chars.next())
            && initial.is_alphabetic()
        {
            return true;
        }
        self.abbreviations.contains(&word.to_lowercase())
    }

    /// Check whether a text segment ends with an abbreviation.
    pub fn ends_with_abbreviation(&self, segment: &str) -> bool {
        segment
            .split_whitespace()
            .last()
            .map(|word| word.trim_start_matches(['"', '\'', '(', '[', '“', '‘', '«']))
            .is_some_and(|word| self.is_abbreviation(word))
    }
}

/// Sentence splitter based on UAX #29 sentence boundaries.
#[derive(Clone, Debug)]
pub struct UnicodeSentenceSplitter {
    model: Arc<SentenceModel>,
}

impl UnicodeSentenceSplitter {
    /// Create a new splitter using the given model.
    pub fn new(model: Arc<SentenceModel>) -> Self {
        UnicodeSentenceSplitter { model }
    }

    /// The model used by this splitter.
    pub fn model(&self) -> &Arc<SentenceModel> {
        &self.model
    }
}

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut pending: Option<usize> = None;

        for (offset, segment) in text.split_sentence_bound_indices() {
            let begin = pending.unwrap_or(offset);
            let end = offset + segment.len();

            if self.model.ends_with_abbreviation(&text[begin..end]) {
                pending = Some(begin);
                continue;
            }

            pending = None;
            push_trimmed(&mut sentences, &text[begin..end]);
        }

        if let Some(begin) = pending {
            push_trimmed(&mut sentences, &text[begin..]);
        }

        sentences
    }

    fn language(&self) -> &str {
        self.model.language()
    }
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, segment: &'a str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
