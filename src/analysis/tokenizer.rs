//! Sentence splitting and tokenization with span tracking.
//!
//! The tokenizer cuts a sentence into words and the runs of split characters
//! between them. The split set is every Unicode punctuation character
//! (general category `P`), ASCII punctuation and ASCII whitespace, except the
//! apostrophes `'` and `’`, which stay inside words so that contractions and
//! possessives remain single tokens.
//!
//! Every character of the input belongs to exactly one token, so the spans of
//! the produced tokens tile the input.
//!
//! # Examples
//!
//! ```
//! use termscan::analysis::token::{Token, TokenKind};
//! use termscan::analysis::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::new("english").unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("I'm sorry.").collect();
//!
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::new("I'm", 0, 3, TokenKind::Word),
//!         Token::new(" ", 3, 4, TokenKind::Whitespace),
//!         Token::new("sorry", 4, 9, TokenKind::Word),
//!         Token::new(".", 9, 10, TokenKind::Punctuation),
//!     ]
//! );
//! ```

use std::iter::Peekable;
use std::sync::{Arc, LazyLock};

use log::warn;
use regex::Regex;

use crate::analysis::language::{self, DEFAULT_LANGUAGE};
use crate::analysis::sentence::{SentenceSplitter, UnicodeSentenceSplitter};
use crate::analysis::token::{Token, TokenKind};
use crate::error::Result;

/// Punctuation part of the split set (apostrophes excluded).
const PUNCTUATION_CLASS: &str = r"\p{P}!-/:-@\[-`{-~--['’]";

/// Whitespace part of the split set.
const WHITESPACE_CLASS: &str = r" \t\n\r\x0B\x0C";

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "[^[{PUNCTUATION_CLASS}]{WHITESPACE_CLASS}]+"
    ))
    .expect("word pattern is valid")
});

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("[{PUNCTUATION_CLASS}]")).expect("punctuation pattern is valid")
});

/// Check whether a character is a punctuation member of the split set.
pub fn is_punctuation(c: char) -> bool {
    let mut buffer = [0; 4];
    PUNCTUATION.is_match(c.encode_utf8(&mut buffer))
}

/// Check whether a character belongs to the split set.
pub fn is_split_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C') || is_punctuation(c)
}

/// Sentence splitter and word tokenizer for one language.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    splitter: Arc<dyn SentenceSplitter>,
}

impl Tokenizer {
    /// Create a tokenizer for a language, failing if it is not supported.
    pub fn new(language: &str) -> Result<Self> {
        let model = language::sentence_model(language)?;
        Ok(Self::with_splitter(Arc::new(UnicodeSentenceSplitter::new(
            model,
        ))))
    }

    /// Create a tokenizer for a language, falling back to the default
    /// language if it is not supported.
    pub fn with_fallback(language: &str) -> Result<Self> {
        if language::is_available(language) {
            return Self::new(language);
        }

        warn!("Language '{language}' is not supported, falling back to '{DEFAULT_LANGUAGE}'");
        Self::new(DEFAULT_LANGUAGE)
    }

    /// Create a tokenizer using a custom sentence splitter.
    pub fn with_splitter(splitter: Arc<dyn SentenceSplitter>) -> Self {
        Tokenizer { splitter }
    }

    /// Languages with a built-in sentence model.
    pub fn available() -> &'static [&'static str] {
        language::available()
    }

    /// The language of the sentence splitter.
    pub fn language(&self) -> &str {
        self.splitter.language()
    }

    /// Split text into sentences.
    ///
    /// The sentences are substrings of `text` whose concatenation is `text`:
    /// whitespace the splitter dropped between two sentences is attached to
    /// the following sentence and any trailing remainder to the last one.
    pub fn sentences<'a>(&self, text: &'a str) -> Sentences<'a> {
        Sentences {
            text,
            pieces: self.splitter.split(text).into_iter().peekable(),
            begin: 0,
        }
    }

    /// Tokenize a string.
    pub fn tokenize<'a>(&self, text: &'a str) -> Tokens<'a> {
        Tokens::new(text)
    }
}

/// Iterator over the sentences of a text.
#[derive(Debug)]
pub struct Sentences<'a> {
    text: &'a str,
    pieces: Peekable<std::vec::IntoIter<&'a str>>,
    begin: usize,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.begin >= self.text.len() {
            return None;
        }

        while let Some(piece) = self.pieces.next() {
            if piece.is_empty() {
                continue;
            }
            let Some(found) = self.text[self.begin..].find(piece) else {
                continue;
            };

            let end = if self.pieces.peek().is_some() {
                self.begin + found + piece.len()
            } else {
                self.text.len()
            };

            let sentence = &self.text[self.begin..end];
            self.begin = end;
            return Some(sentence);
        }

        let rest = &self.text[self.begin..];
        self.begin = self.text.len();
        Some(rest)
    }
}

/// Iterator over the tokens of a string.
#[derive(Debug)]
pub struct Tokens<'a> {
    text: &'a str,
    words: regex::Matches<'static, 'a>,
    byte_offset: usize,
    char_offset: usize,
    pending: Option<Token>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            text,
            words: WORD.find_iter(text),
            byte_offset: 0,
            char_offset: 0,
            pending: None,
        }
    }

    /// Emit the run of split characters up to `until` (a byte offset), if any.
    fn split_token(&mut self, until: usize) -> Option<Token> {
        if self.byte_offset >= until {
            return None;
        }

        let run = &self.text[self.byte_offset..until];
        let begin = self.char_offset;
        let end = begin + run.chars().count();
        let kind = if PUNCTUATION.is_match(run) {
            TokenKind::Punctuation
        } else {
            TokenKind::Whitespace
        };

        self.byte_offset = until;
        self.char_offset = end;
        Some(Token::new(run, begin, end, kind))
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        let Some(word) = self.words.next() else {
            return self.split_token(self.text.len());
        };

        let gap = self.split_token(word.start());

        let begin = self.char_offset;
        let end = begin + word.as_str().chars().count();
        let token = Token::word(word.as_str(), begin, end);
        self.byte_offset = word.end();
        self.char_offset = end;

        match gap {
            Some(gap) => {
                self.pending = Some(token);
                Some(gap)
            }
            None => Some(token),
        }
    }
}
