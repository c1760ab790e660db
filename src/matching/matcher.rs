//! Approximate matching of token sequences.
//!
//! [`Matcher`] ties the analysis pipeline to the similarity engine: it
//! tokenizes and transforms text, turns tokens into bigram multisets, and
//! builds a [`SequenceIndex`] per sentence. Queries against an index go
//! through overlap resolution, so each index yields non-overlapping
//! [`Span`]s.
//!
//! # Examples
//!
//! ```
//! use termscan::matching::{Matcher, MatcherConfig, Span};
//!
//! let matcher = Matcher::new(MatcherConfig::default()).unwrap();
//! let text = matcher.text("Hello world!");
//!
//! let spans = text.matches_pattern("worl", 0.85);
//! assert_eq!(spans.len(), 1);
//! assert_eq!((spans[0].begin, spans[0].end), (6, 11));
//!
//! assert!(text.matches_pattern("worl", 0.9).is_empty());
//! ```

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::language::{self, DEFAULT_LANGUAGE};
use crate::analysis::stop_words::StopWords;
use crate::analysis::token::{Token, TokenKind, TokenStream};
use crate::analysis::token_filter::TokenTransform;
use crate::analysis::tokenizer::{Sentences, Tokenizer};
use crate::bigram::BigramMultiset;
use crate::error::{Result, TermscanError};
use crate::extraction::registry::TypeRegistry;
use crate::matching::engine::{CandidateWindow, SequenceMatcher, SimilarityEngine};
use crate::matching::resolver::MatchResolver;

/// Matcher construction options.
#[derive(Clone, Debug)]
pub struct MatcherConfig {
    /// Language of the sentence model and stop-word list
    pub language: String,

    /// Fail on unsupported languages instead of falling back
    pub strict_language: bool,

    /// Forbid matches from beginning or ending with a stop word
    pub strip_stop_words: bool,

    /// Whitespace tokens contribute no bigrams
    pub omit_whitespace: bool,

    /// Transforms applied to tokens, in order
    pub token_transforms: Vec<Arc<dyn TokenTransform>>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            language: DEFAULT_LANGUAGE.to_string(),
            strict_language: true,
            strip_stop_words: true,
            omit_whitespace: true,
            token_transforms: Vec::new(),
        }
    }
}

/// Persisted form of [`MatcherConfig`], transforms kept as tagged values.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct ConfigDocument {
    language: String,
    strict_language: bool,
    strip_stop_words: bool,
    omit_whitespace: bool,
    token_transforms: Vec<Value>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        let config = MatcherConfig::default();
        ConfigDocument {
            language: config.language,
            strict_language: config.strict_language,
            strip_stop_words: config.strip_stop_words,
            omit_whitespace: config.omit_whitespace,
            token_transforms: Vec::new(),
        }
    }
}

impl MatcherConfig {
    /// Create a configuration for a language, other options at their defaults.
    pub fn new<S: Into<String>>(language: S) -> Self {
        MatcherConfig {
            language: language.into(),
            ..Default::default()
        }
    }

    /// Set the language policy.
    pub fn with_strict_language(mut self, strict: bool) -> Self {
        self.strict_language = strict;
        self
    }

    /// Set stop-word stripping.
    pub fn with_strip_stop_words(mut self, strip: bool) -> Self {
        self.strip_stop_words = strip;
        self
    }

    /// Set whitespace omission.
    pub fn with_omit_whitespace(mut self, omit: bool) -> Self {
        self.omit_whitespace = omit;
        self
    }

    /// Append a token transform.
    pub fn with_transform<T: TokenTransform + 'static>(mut self, transform: T) -> Self {
        self.token_transforms.push(Arc::new(transform));
        self
    }

    /// Serialize to a JSON object, transforms carrying their type tag.
    pub fn to_json(&self) -> Result<Value> {
        let token_transforms = self
            .token_transforms
            .iter()
            .map(|transform| TypeRegistry::transform_to_json(transform.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let document = ConfigDocument {
            language: self.language.clone(),
            strict_language: self.strict_language,
            strip_stop_words: self.strip_stop_words,
            omit_whitespace: self.omit_whitespace,
            token_transforms,
        };
        Ok(serde_json::to_value(document)?)
    }

    /// Deserialize from a JSON object, resolving transform tags in `registry`.
    ///
    /// Missing options take their default values.
    pub fn from_json(value: Value, registry: &TypeRegistry) -> Result<Self> {
        if !value.is_object() {
            return Err(TermscanError::invalid_config(
                "matcher arguments must be a JSON object",
            ));
        }

        let document: ConfigDocument = serde_json::from_value(value)?;
        let token_transforms = document
            .token_transforms
            .into_iter()
            .map(|value| registry.transform(value))
            .collect::<Result<Vec<_>>>()?;

        Ok(MatcherConfig {
            language: document.language,
            strict_language: document.strict_language,
            strip_stop_words: document.strip_stop_words,
            omit_whitespace: document.omit_whitespace,
            token_transforms,
        })
    }
}

/// A resolved match span, in character offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Character offset where the match starts (inclusive)
    pub begin: usize,

    /// Character offset where the match ends (exclusive)
    pub end: usize,

    /// Sørensen–Dice coefficient of the match
    pub score: f64,
}

/// Approximate token sequence matcher.
#[derive(Clone, Debug)]
pub struct Matcher {
    config: MatcherConfig,
    tokenizer: Tokenizer,
    stop_words: Arc<StopWords>,
}

impl Matcher {
    /// Create a matcher.
    ///
    /// With a strict language policy an unsupported language fails. With a
    /// lenient one, sentence splitting falls back to the default language
    /// and no stop words are used.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        let language = config.language.as_str();

        let tokenizer = if config.strict_language {
            Tokenizer::new(language)?
        } else {
            Tokenizer::with_fallback(language)?
        };

        let stop_words = if !config.strip_stop_words {
            Arc::new(StopWords::none())
        } else if config.strict_language || language::is_available(language) {
            language::stop_words(language)?
        } else {
            debug!("No stop words for language '{language}', none will be stripped");
            Arc::new(StopWords::none())
        };

        Ok(Matcher {
            config,
            tokenizer,
            stop_words,
        })
    }

    /// The configuration the matcher was built from.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// The language actually used for sentence splitting.
    pub fn language(&self) -> &str {
        self.tokenizer.language()
    }

    /// The active stop words.
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Split text into sentences.
    pub fn sentences<'a>(&self, text: &'a str) -> Sentences<'a> {
        self.tokenizer.sentences(text)
    }

    /// Tokenize a string and apply the token transforms.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> TokenStream<'a> {
        let mut tokens: TokenStream<'a> = Box::new(self.tokenizer.tokenize(text));
        for transform in &self.config.token_transforms {
            tokens = transform.transform(text, tokens);
        }
        tokens
    }

    /// Check whether a token may not begin or end a match.
    pub fn is_strip_token(&self, token: &Token) -> bool {
        !token.is_word() || self.stop_words.contains(&token.text)
    }

    /// Bigrams of a single token.
    pub fn token_bigrams(&self, token: &Token) -> BigramMultiset {
        if token.kind == TokenKind::Whitespace && self.config.omit_whitespace {
            return BigramMultiset::new();
        }
        BigramMultiset::from_text(&token.text)
    }

    /// Bigrams of a token sequence, without its leading and trailing
    /// strippable tokens.
    pub fn sequence_bigrams(&self, sequence: &str) -> BigramMultiset {
        let tokens: Vec<Token> = self.tokenize(sequence).collect();

        let Some(first) = tokens.iter().position(|token| !self.is_strip_token(token)) else {
            return BigramMultiset::new();
        };
        let last = tokens
            .iter()
            .rposition(|token| !self.is_strip_token(token))
            .unwrap_or(first);

        let mut bigrams = BigramMultiset::new();
        for token in &tokens[first..=last] {
            bigrams += self.token_bigrams(token);
        }
        bigrams
    }

    /// Build the sequence index of a single sentence.
    pub fn sequence_index(&self, sentence: &str) -> SequenceIndex {
        self.index_at(sentence, 0)
    }

    /// Pre-process a text, split into sentences.
    pub fn text(&self, text: &str) -> Text {
        let mut offset = 0;
        let sentences = self
            .sentences(text)
            .map(|sentence| {
                let index = self.index_at(sentence, offset);
                offset += sentence.chars().count();
                index
            })
            .collect();

        Text { matcher: self, sentences }
    }

    /// Pre-process a text as a single sentence.
    pub fn sentence(&self, text: &str) -> Text {
        Text {
            matcher: self,
            sentences: vec![self.sequence_index(text)],
        }
    }

    fn index_at(&self, sentence: &str, offset: usize) -> SequenceIndex {
        let mut index = SequenceIndex::default();
        for token in self.tokenize(sentence) {
            let bigrams = self.token_bigrams(&token);
            let strip = self.is_strip_token(&token);
            index.push(token.shifted(offset), bigrams, strip);
        }
        index
    }
}

/// Tokens of one sentence paired with a similarity engine.
#[derive(Clone, Debug, Default)]
pub struct SequenceIndex<E = SequenceMatcher> {
    tokens: Vec<Token>,
    engine: E,
}

impl<E: SimilarityEngine> SequenceIndex<E> {
    /// Create an empty index over an engine.
    pub fn with_engine(engine: E) -> Self {
        SequenceIndex {
            tokens: Vec::new(),
            engine,
        }
    }

    /// Append a token with its bigrams and strip flag.
    pub fn push(&mut self, token: Token, bigrams: BigramMultiset, strip: bool) {
        self.engine.append(bigrams, strip);
        self.tokens.push(token);
    }

    /// The indexed tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of indexed tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the index holds no token.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The similarity engine over the indexed tokens.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Character span covered by a window of this index.
    pub fn span(&self, window: CandidateWindow) -> Span {
        Span {
            begin: self.tokens[window.begin].begin,
            end: self.tokens[window.end - 1].end,
            score: window.score,
        }
    }

    /// Resolved matches of a query, as character spans.
    pub fn matches<'a>(
        &'a self,
        query: &'a BigramMultiset,
        threshold: f64,
    ) -> impl Iterator<Item = Span> + 'a {
        MatchResolver::new(self.engine.matches(query, threshold)).map(move |window| self.span(window))
    }
}

/// A pre-processed text: one sequence index per sentence.
#[derive(Debug)]
pub struct Text<'m> {
    matcher: &'m Matcher,
    sentences: Vec<SequenceIndex>,
}

impl Text<'_> {
    /// Sequence indexes of the sentences.
    pub fn sentences(&self) -> &[SequenceIndex] {
        &self.sentences
    }

    /// Resolved matches of query bigrams, sentence by sentence.
    pub fn matches<'a>(
        &'a self,
        query: &'a BigramMultiset,
        threshold: f64,
    ) -> impl Iterator<Item = Span> + 'a {
        self.sentences
            .iter()
            .flat_map(move |sentence| sentence.matches(query, threshold))
    }

    /// Resolved matches of a pattern string.
    pub fn matches_pattern(&self, pattern: &str, threshold: f64) -> Vec<Span> {
        let query = self.matcher.sequence_bigrams(pattern);
        self.matches(&query, threshold).collect()
    }
}
