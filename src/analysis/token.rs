//! Token types for text analysis.
//!
//! A [`Token`] is the unit the tokenizer produces and the bigram encoder
//! consumes. Tokens carry their (possibly transformed) text, the half-open
//! character span they occupy in the analysed string and a coarse
//! [`TokenKind`].
//!
//! Spans are counted in Unicode scalar values (chars), not bytes, so they can
//! be reported to callers independently of the text encoding.
//!
//! # Examples
//!
//! ```
//! use termscan::analysis::token::{Token, TokenKind};
//!
//! let token = Token::new("world", 6, 11, TokenKind::Word);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.span_len(), 5);
//! assert!(token.is_word());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single token with its text, character span and classification.
///
/// Transforms may rewrite `text`; `begin` and `end` always refer to the
/// original string the token was cut from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// The token text (after transforms)
    pub text: String,

    /// Character offset where the token starts (inclusive)
    pub begin: usize,

    /// Character offset where the token ends (exclusive)
    pub end: usize,

    /// Coarse token class
    pub kind: TokenKind,
}

/// Coarse classification of tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A maximal run of non-split characters
    Word,
    /// A run of split characters containing whitespace only
    Whitespace,
    /// A run of split characters containing at least one punctuation character
    Punctuation,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(text: S, begin: usize, end: usize, kind: TokenKind) -> Self {
        Token {
            text: text.into(),
            begin,
            end,
            kind,
        }
    }

    /// Create a new word token.
    pub fn word<S: Into<String>>(text: S, begin: usize, end: usize) -> Self {
        Self::new(text, begin, end, TokenKind::Word)
    }

    /// Check whether this is a word token.
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Number of characters the token spans in the original string.
    pub fn span_len(&self) -> usize {
        self.end - self.begin
    }

    /// Replace the token text, keeping the span.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Move the span by `offset` characters.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.begin += offset;
        self.end += offset;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Word => "word",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Punctuation => "punctuation",
        };
        f.write_str(name)
    }
}

/// A lazily produced sequence of tokens.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token> + 'a>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream<'a> {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream<'a>;
}

impl<'a> IntoTokenStream<'a> for Vec<Token> {
    fn into_token_stream(self) -> TokenStream<'a> {
        Box::new(self.into_iter())
    }
}
