//! Dictionary term extraction.
//!
//! [`Extractor`] finds approximate occurrences of every dictionary term in a
//! text. Extraction is lazy: sentences are indexed and terms are matched only
//! as the caller pulls matches from the returned [`Extraction`].
//!
//! Matches are reported sentence by sentence; within a sentence, in
//! dictionary order; within a term, left to right. They are not globally
//! sorted by position.
//!
//! An extractor (its default threshold, matcher options and dictionary) can
//! be saved to and loaded from JSON:
//!
//! ```json
//! {
//!   "default_threshold": 0.9,
//!   "matcher_arguments": {"language": "english", "token_transforms": []},
//!   "dictionary": {"Kryten": {"_type": "json", "fictional": true}}
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use termscan::extraction::{Extractor, JsonRecord, MemoryDictionary};
//!
//! let dictionary = MemoryDictionary::new()
//!     .with_record("Naylor, Doug", JsonRecord::new().with_field("birth", "31 December 1955"));
//!
//! let extractor = Extractor::new(dictionary).unwrap().with_default_threshold(0.8);
//! let text = "Red Dwarf was created by Rob Grant and Doug Naylor.";
//!
//! let matches: Vec<_> = extractor.extract(text).collect();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].token, "Doug Naylor");
//! assert_eq!((matches[0].begin, matches[0].end), (39, 50));
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::iter;
use std::path::Path;
use std::sync::Arc;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::tokenizer::Sentences;
use crate::bigram::BigramMultiset;
use crate::error::{Result, TermscanError};
use crate::extraction::dictionary::{Dictionary, MemoryDictionary};
use crate::extraction::record::Record;
use crate::extraction::registry::TypeRegistry;
use crate::matching::engine::{CandidateWindow, ScanCursor};
use crate::matching::matcher::{Matcher, MatcherConfig, SequenceIndex};
use crate::matching::resolver::ResolveState;

/// Default matching threshold: exact matches only.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// A dictionary term found in a text.
#[derive(Clone, Debug)]
pub struct Match {
    /// The dictionary term
    pub term: String,

    /// Character offset where the match starts in the text (inclusive)
    pub begin: usize,

    /// Character offset where the match ends in the text (exclusive)
    pub end: usize,

    /// Sørensen–Dice coefficient of the match
    pub score: f64,

    /// The dictionary record of the term
    pub record: Arc<dyn Record>,

    /// The matched part of the text
    pub token: String,
}

impl Match {
    /// JSON form of the match, the record in its persisted form.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::json!({
            "term": self.term,
            "begin": self.begin,
            "end": self.end,
            "score": self.score,
            "token": self.token,
            "record": TypeRegistry::record_to_json(self.record.as_ref())?,
        }))
    }
}

/// Matches are equal when their fields are; records compare by identity.
impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
            && self.begin == other.begin
            && self.end == other.end
            && self.score == other.score
            && self.token == other.token
            && Arc::ptr_eq(&self.record, &other.record)
    }
}

/// Approximate dictionary term extractor.
#[derive(Clone, Debug)]
pub struct Extractor<D = MemoryDictionary> {
    dictionary: D,
    default_threshold: f64,
    matcher: Matcher,
}

/// Persisted form of an extractor.
#[derive(Debug, Serialize, Deserialize)]
struct ExtractorDocument {
    #[serde(default = "default_threshold")]
    default_threshold: f64,

    #[serde(default = "empty_object")]
    matcher_arguments: Value,

    dictionary: Map<String, Value>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Check that a threshold lies in `(0, 1]`.
fn is_valid_threshold(threshold: f64) -> bool {
    threshold > 0.0 && threshold <= 1.0
}

impl<D: Dictionary> Extractor<D> {
    /// Create an extractor with the default matcher options and threshold.
    pub fn new(dictionary: D) -> Result<Self> {
        Self::with_options(dictionary, DEFAULT_THRESHOLD, MatcherConfig::default())
    }

    /// Create an extractor.
    ///
    /// Fails if the matcher cannot be built for `config` (unsupported
    /// language under the strict policy).
    pub fn with_options(dictionary: D, default_threshold: f64, config: MatcherConfig) -> Result<Self> {
        debug_assert!(
            is_valid_threshold(default_threshold),
            "threshold {default_threshold} out of (0, 1]"
        );

        Ok(Extractor {
            dictionary,
            default_threshold,
            matcher: Matcher::new(config)?,
        })
    }

    /// Set the threshold used for terms whose record sets none.
    pub fn with_default_threshold(mut self, threshold: f64) -> Self {
        debug_assert!(is_valid_threshold(threshold), "threshold {threshold} out of (0, 1]");
        self.default_threshold = threshold;
        self
    }

    /// Replace the matcher options.
    pub fn with_config(mut self, config: MatcherConfig) -> Result<Self> {
        self.matcher = Matcher::new(config)?;
        Ok(self)
    }

    /// The dictionary.
    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    /// The threshold used for terms whose record sets none.
    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    /// The matcher options.
    pub fn config(&self) -> &MatcherConfig {
        self.matcher.config()
    }

    /// The matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Extract dictionary term matches from a text.
    pub fn extract<'a>(&'a self, text: &'a str) -> Extraction<'a> {
        let entries: Vec<TermEntry<'a>> = self
            .dictionary
            .items()
            .map(|(term, record)| TermEntry {
                term,
                record,
                bigrams: self.matcher.sequence_bigrams(term),
                threshold: self.term_threshold(term, record.as_ref()),
            })
            .collect();

        debug!("Extracting {} terms from {} bytes of text", entries.len(), text.len());

        Extraction {
            matcher: &self.matcher,
            entries,
            sentences: self.matcher.sentences(text),
            offset: 0,
            current: None,
            scan: None,
        }
    }

    /// Threshold of a term: its record's, when that lies in `(0, 1]`.
    fn term_threshold(&self, term: &str, record: &dyn Record) -> f64 {
        match record.matching_threshold() {
            Some(threshold) if is_valid_threshold(threshold) => threshold,
            Some(threshold) => {
                warn!(
                    "Ignoring matching threshold {threshold} of '{term}', using {}",
                    self.default_threshold
                );
                self.default_threshold
            }
            None => self.default_threshold,
        }
    }

    /// Persisted form of the extractor.
    pub fn to_json(&self) -> Result<Value> {
        let dictionary = self
            .dictionary
            .items()
            .map(|(term, record)| {
                TypeRegistry::record_to_json(record.as_ref()).map(|value| (term.to_string(), value))
            })
            .collect::<Result<Map<_, _>>>()?;

        let document = ExtractorDocument {
            default_threshold: self.default_threshold,
            matcher_arguments: self.matcher.config().to_json()?,
            dictionary,
        };
        Ok(serde_json::to_value(document)?)
    }

    /// Write the persisted form as pretty-printed JSON.
    pub fn serialize<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_json()?)?;
        Ok(())
    }

    /// Save the persisted form to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.serialize(&mut writer)?;
        writer.flush()?;
        debug!("Saved extractor to {}", path.as_ref().display());
        Ok(())
    }
}

impl Extractor<MemoryDictionary> {
    /// Rebuild an extractor from its persisted form.
    ///
    /// Record and transform type tags are resolved in `registry`; any unknown
    /// tag fails the whole load.
    pub fn from_json(value: Value, registry: &TypeRegistry) -> Result<Self> {
        if !value.is_object() {
            return Err(TermscanError::invalid_config(
                "extractor document must be a JSON object",
            ));
        }

        let document: ExtractorDocument = serde_json::from_value(value)?;
        if !is_valid_threshold(document.default_threshold) {
            return Err(TermscanError::invalid_config(format!(
                "default threshold {} out of (0, 1]",
                document.default_threshold
            )));
        }
        let config = MatcherConfig::from_json(document.matcher_arguments, registry)?;

        let mut dictionary = MemoryDictionary::new();
        for (term, record) in document.dictionary {
            dictionary.insert(term, registry.record(record)?);
        }

        Self::with_options(dictionary, document.default_threshold, config)
    }

    /// Read an extractor from JSON.
    pub fn deserialize<R: Read>(reader: R, registry: &TypeRegistry) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json(value, registry)
    }

    /// Load an extractor from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P, registry: &TypeRegistry) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let extractor = Self::deserialize(reader, registry)?;
        debug!(
            "Loaded extractor with {} terms from {}",
            extractor.dictionary.len(),
            path.as_ref().display()
        );
        Ok(extractor)
    }
}

/// A dictionary term prepared for matching.
#[derive(Debug)]
struct TermEntry<'a> {
    term: &'a str,
    record: &'a Arc<dyn Record>,
    bigrams: BigramMultiset,
    threshold: f64,
}

/// The sentence currently being matched.
#[derive(Debug)]
struct SentenceState<'a> {
    sentence: &'a str,
    index: SequenceIndex,
    /// Byte position of every char of the sentence, plus its length
    byte_offsets: Vec<usize>,
    /// Char offset of the sentence in the text
    offset: usize,
    next_term: usize,
}

impl<'a> SentenceState<'a> {
    fn new(matcher: &Matcher, sentence: &'a str, offset: usize) -> Self {
        let byte_offsets = sentence
            .char_indices()
            .map(|(position, _)| position)
            .chain(iter::once(sentence.len()))
            .collect();

        SentenceState {
            sentence,
            index: matcher.sequence_index(sentence),
            byte_offsets,
            offset,
            next_term: 0,
        }
    }

    fn char_len(&self) -> usize {
        self.byte_offsets.len() - 1
    }

    fn to_match(&self, entry: &TermEntry<'_>, window: CandidateWindow) -> Match {
        let span = self.index.span(window);
        Match {
            term: entry.term.to_string(),
            begin: self.offset + span.begin,
            end: self.offset + span.end,
            score: span.score,
            record: Arc::clone(entry.record),
            token: self.sentence[self.byte_offsets[span.begin]..self.byte_offsets[span.end]]
                .to_string(),
        }
    }
}

/// A term being matched against the current sentence, resumable between
/// matches.
#[derive(Debug)]
struct TermScan {
    /// Index of the term in the prepared entries
    entry: usize,
    cursor: ScanCursor,
    resolver: ResolveState,
}

/// Lazy iterator over the matches of an extraction.
///
/// Each call to `next` scans only as far as needed to resolve one match.
#[derive(Debug)]
pub struct Extraction<'a> {
    matcher: &'a Matcher,
    entries: Vec<TermEntry<'a>>,
    sentences: Sentences<'a>,
    offset: usize,
    current: Option<SentenceState<'a>>,
    scan: Option<TermScan>,
}

impl Extraction<'_> {
    /// Next match of the term being scanned in the current sentence.
    fn resume_scan(&mut self) -> Option<Match> {
        let state = self.current.as_ref()?;
        let scan = self.scan.as_mut()?;
        let entry = &self.entries[scan.entry];

        let engine = state.index.engine();
        let cursor = &mut scan.cursor;
        let mut windows = iter::from_fn(|| cursor.next_window(engine, &entry.bigrams));

        let window = scan.resolver.next_from(&mut windows)?;
        Some(state.to_match(entry, window))
    }
}

impl Iterator for Extraction<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.entries.is_empty() {
            return None;
        }

        loop {
            if self.scan.is_some() {
                if let Some(found) = self.resume_scan() {
                    return Some(found);
                }
                self.scan = None;
            }

            let terms = self.entries.len();
            let exhausted = self
                .current
                .as_ref()
                .is_none_or(|state| state.next_term >= terms);

            if exhausted {
                let sentence = self.sentences.next()?;
                let state = SentenceState::new(self.matcher, sentence, self.offset);
                trace!(
                    "Sentence at {} ({} tokens): {sentence:?}",
                    self.offset,
                    state.index.len()
                );
                self.offset += state.char_len();
                self.current = Some(state);
                continue;
            }

            if let Some(state) = self.current.as_mut() {
                let entry = state.next_term;
                state.next_term += 1;
                self.scan = Some(TermScan {
                    entry,
                    cursor: ScanCursor::new(self.entries[entry].threshold),
                    resolver: ResolveState::new(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::analysis::token_filter::LowercaseTransform;
    use crate::extraction::record::JsonRecord;

    fn dictionary() -> MemoryDictionary {
        MemoryDictionary::new()
            .with_record("Kryten", JsonRecord::new())
            .with_record("Holly", JsonRecord::new().with_matching_threshold(0.5))
    }

    #[test]
    fn test_extractor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Extractor>();
    }

    #[test]
    fn test_default_threshold_is_exact() {
        let extractor = Extractor::new(dictionary()).unwrap();
        assert_eq!(extractor.default_threshold(), 1.0);

        let matches: Vec<_> = extractor.extract("Krytan and Kryten.").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "Kryten");
        assert_eq!((matches[0].begin, matches[0].end), (11, 17));
        assert_eq!(matches[0].score, 1.0);
    }

    #[test]
    fn test_record_threshold_overrides_default() {
        let extractor = Extractor::new(dictionary()).unwrap();

        let matches: Vec<_> = extractor.extract("Hollie speaks.").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].term, "Holly");
        assert_eq!(matches[0].token, "Hollie");
    }

    #[test]
    fn test_offsets_are_char_based() {
        let extractor = Extractor::new(dictionary()).unwrap();
        let text = "Red Dwarf—save for Kryten. “Kryten” again.";

        let matches: Vec<_> = extractor.extract(text).collect();
        assert_eq!(matches.len(), 2);
        for found in &matches {
            let token: String = text.chars().skip(found.begin).take(found.end - found.begin).collect();
            assert_eq!(token, found.token);
        }
        assert_eq!((matches[0].begin, matches[1].begin), (19, 28));
    }

    #[test]
    fn test_lazy_and_restartable() {
        let extractor = Extractor::new(dictionary()).unwrap();
        let text = "Kryten. Kryten. Kryten.";

        let mut extraction = extractor.extract(text);
        assert_eq!(extraction.next().map(|found| found.begin), Some(0));
        drop(extraction);

        let all: Vec<_> = extractor.extract(text).map(|found| found.begin).collect();
        assert_eq!(all, vec![0, 8, 16]);
    }

    #[test]
    fn test_next_resolves_one_match_at_a_time() {
        let extractor = Extractor::new(dictionary()).unwrap();
        let text = "Kryten Kryten Kryten Kryten.";

        let mut extraction = extractor.extract(text);
        let first = extraction.next().unwrap();
        assert_eq!((first.begin, first.end), (0, 6));

        let state = extraction.current.as_ref().unwrap();
        let scan = extraction.scan.as_ref().unwrap();
        assert_eq!(scan.entry, 0);
        assert!(scan.cursor.begin() <= 2, "scanned up to token {}", scan.cursor.begin());
        assert!(scan.cursor.begin() < state.index.len() / 2);

        let rest: Vec<_> = extraction.map(|found| found.begin).collect();
        assert_eq!(rest, vec![7, 14, 21]);
    }

    #[test]
    fn test_out_of_range_record_threshold_uses_default() {
        for threshold in [0.0, -0.5, 1.5] {
            let dictionary = MemoryDictionary::new()
                .with_record("Kryten", JsonRecord::new().with_matching_threshold(threshold));
            let extractor = Extractor::new(dictionary).unwrap();

            let matches: Vec<_> = extractor.extract("Kryten cleans. Krytan cooks.").collect();
            assert_eq!(matches.len(), 1, "threshold {threshold}");
            assert_eq!((matches[0].begin, matches[0].end), (0, 6));
            assert_eq!(matches[0].score, 1.0);
        }
    }

    #[test]
    fn test_empty_inputs() {
        let extractor = Extractor::new(dictionary()).unwrap();
        assert_eq!(extractor.extract("").count(), 0);
        assert_eq!(extractor.extract("   ").count(), 0);

        let empty = Extractor::new(MemoryDictionary::new()).unwrap();
        assert_eq!(empty.extract("Kryten").count(), 0);
    }

    #[test]
    fn test_with_config() {
        let extractor = Extractor::new(dictionary())
            .unwrap()
            .with_config(MatcherConfig::default().with_transform(LowercaseTransform::new()))
            .unwrap();

        let matches: Vec<_> = extractor.extract("KRYTEN!").collect();
        assert_eq!(matches.len(), 1);

        assert!(
            Extractor::new(dictionary())
                .unwrap()
                .with_config(MatcherConfig::new("martian"))
                .is_err()
        );
    }

    #[test]
    fn test_match_json() {
        let extractor = Extractor::new(dictionary()).unwrap();
        let found = extractor.extract("Kryten").next().unwrap();

        assert_eq!(
            found.to_json().unwrap(),
            json!({
                "term": "Kryten",
                "begin": 0,
                "end": 6,
                "score": 1.0,
                "token": "Kryten",
                "record": {"_type": "json"}
            })
        );
    }

    #[test]
    fn test_to_json() {
        let extractor = Extractor::new(dictionary()).unwrap().with_default_threshold(0.9);
        let value = extractor.to_json().unwrap();

        assert_eq!(value["default_threshold"], json!(0.9));
        assert_eq!(value["matcher_arguments"]["language"], json!("english"));
        assert_eq!(
            value["dictionary"]["Holly"],
            json!({"_type": "json", "_matching_threshold": 0.5})
        );
    }

    #[test]
    fn test_from_json_errors() {
        let registry = TypeRegistry::default();
        assert!(Extractor::from_json(json!([]), &registry).is_err());
        assert!(Extractor::from_json(json!({"default_threshold": 0.9}), &registry).is_err());
        assert!(matches!(
            Extractor::from_json(json!({"default_threshold": 0, "dictionary": {}}), &registry),
            Err(TermscanError::InvalidConfig(_))
        ));
        assert!(matches!(
            Extractor::from_json(
                json!({"dictionary": {"Cat": {"_type": "person"}}}),
                &registry
            ),
            Err(TermscanError::UnknownTag { kind: "record", .. })
        ));
    }
}
