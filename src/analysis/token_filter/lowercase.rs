//! Lowercase transform.
//!
//! Lowercases word tokens. Short words can be protected so that acronyms are
//! not mistaken for common words once lowercased (`AMI` the machine image is
//! not `ami` the friend).
//!
//! # Examples
//!
//! ```
//! use termscan::analysis::token::{IntoTokenStream, Token};
//! use termscan::analysis::token_filter::TokenTransform;
//! use termscan::analysis::token_filter::lowercase::LowercaseTransform;
//!
//! let transform = LowercaseTransform::new().with_min_len(4).with_except_caps(true);
//! let tokens = vec![
//!     Token::word("AMI", 0, 3),
//!     Token::word("Abc", 4, 7),
//!     Token::word("NOUVELLE", 8, 16),
//! ];
//!
//! let result: Vec<_> = transform
//!     .transform("", tokens.into_token_stream())
//!     .map(|token| token.text)
//!     .collect();
//!
//! assert_eq!(result, vec!["AMI", "abc", "nouvelle"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::TokenTransform;
use crate::error::Result;

/// A transform that lowercases word tokens.
///
/// # Behavior
///
/// - Non-word tokens are left untouched
/// - Words of at least `min_len` characters are lowercased
/// - Shorter words are kept as they are, unless `except_caps` is set, in
///   which case they are lowercased too when not written in all caps
///
/// The defaults (`min_len = 0`, `except_caps = false`) lowercase every word.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowercaseTransform {
    /// Minimal length (in characters) a word must have to be lowercased
    pub min_len: usize,

    /// Lowercase shorter words as well, unless they are all caps
    pub except_caps: bool,
}

impl LowercaseTransform {
    /// Type tag used in persisted configurations.
    pub const TAG: &'static str = "lowercase";

    /// Create a new lowercase transform lowercasing every word.
    pub fn new() -> Self {
        LowercaseTransform::default()
    }

    /// Set the minimal word length.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Set the all-caps exception for short words.
    pub fn with_except_caps(mut self, except_caps: bool) -> Self {
        self.except_caps = except_caps;
        self
    }

    /// Decide whether a word is lowercased.
    pub fn applies_to(&self, word: &str) -> bool {
        if word.chars().count() >= self.min_len {
            return true;
        }
        self.except_caps && word.to_uppercase() != word
    }
}

impl TokenTransform for LowercaseTransform {
    fn transform<'a>(&'a self, _sequence: &'a str, tokens: TokenStream<'a>) -> TokenStream<'a> {
        Box::new(tokens.map(move |token| {
            if token.is_word() && self.applies_to(&token.text) {
                let lowered = token.text.to_lowercase();
                token.with_text(lowered)
            } else {
                token
            }
        }))
    }

    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
