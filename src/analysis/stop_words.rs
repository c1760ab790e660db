//! Stop-word sets.
//!
//! Stop words are tokens that may appear inside a match window but may not
//! start or end one. Lists for the supported languages are compiled into the
//! crate; custom lists can be built from words or loaded from a file with one
//! word per line.
//!
//! # Examples
//!
//! ```
//! use termscan::analysis::stop_words::StopWords;
//!
//! let english = StopWords::for_language("english").unwrap();
//! assert!(english.contains("is"));
//! assert!(!english.contains("dominant"));
//!
//! assert!(StopWords::none().is_empty());
//! ```

use std::fs;
use std::path::Path;

use ahash::AHashSet;

use crate::error::{Result, TermscanError};

const ENGLISH: &str = include_str!("../../resources/stopwords/english.txt");
const GERMAN: &str = include_str!("../../resources/stopwords/german.txt");
const FRENCH: &str = include_str!("../../resources/stopwords/french.txt");
const CZECH: &str = include_str!("../../resources/stopwords/czech.txt");
const DUTCH: &str = include_str!("../../resources/stopwords/dutch.txt");
const SPANISH: &str = include_str!("../../resources/stopwords/spanish.txt");
const ITALIAN: &str = include_str!("../../resources/stopwords/italian.txt");
const UKRAINIAN: &str = include_str!("../../resources/stopwords/ukrainian.txt");

/// Built-in stop-word list source for a language, if the language is supported.
pub(crate) fn builtin_stop_words(language: &str) -> Option<&'static str> {
    let source = match language {
        "english" => ENGLISH,
        "german" => GERMAN,
        "french" => FRENCH,
        "czech" => CZECH,
        "dutch" => DUTCH,
        "spanish" => SPANISH,
        "italian" => ITALIAN,
        "ukrainian" => UKRAINIAN,
        _ => return None,
    };
    Some(source)
}

/// A set of stop words.
///
/// Membership is exact: the built-in lists are lowercase, so capitalised
/// words only match when a lowercasing transform ran first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopWords {
    words: AHashSet<String>,
}

impl StopWords {
    /// The empty stop-word set.
    pub fn none() -> Self {
        StopWords::default()
    }

    /// Create a stop-word set from a list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopWords {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a word list with one word per line (blank lines ignored).
    pub fn parse(source: &str) -> Self {
        Self::from_words(
            source
                .lines()
                .map(str::trim)
                .filter(|word| !word.is_empty()),
        )
    }

    /// Load a word list file with one word per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Ok(Self::parse(&source))
    }

    /// Load the built-in list for a language.
    pub fn for_language(language: &str) -> Result<Self> {
        builtin_stop_words(language)
            .map(Self::parse)
            .ok_or_else(|| TermscanError::unsupported_language(language))
    }

    /// Languages with a built-in stop-word list.
    pub fn available() -> &'static [&'static str] {
        crate::analysis::language::available()
    }

    /// Check whether a word is a stop word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the stop-word set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate the stop words (in no particular order).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
