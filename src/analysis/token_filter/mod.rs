//! Token transforms.
//!
//! Transforms rewrite the text of tokens produced by the
//! [`Tokenizer`](crate::analysis::tokenizer::Tokenizer) before bigrams are
//! computed. They run in the configured order on both the searched text and
//! the dictionary terms, so a transform like lowercasing makes matching
//! case-insensitive on both sides.
//!
//! Transforms must not alter token spans or kinds, nor add or remove tokens.
//!
//! # Examples
//!
//! ```
//! use termscan::analysis::token::{IntoTokenStream, Token};
//! use termscan::analysis::token_filter::TokenTransform;
//! use termscan::analysis::token_filter::lowercase::LowercaseTransform;
//!
//! let transform = LowercaseTransform::new();
//! let tokens = vec![Token::word("Hello", 0, 5)];
//! let result: Vec<_> = transform
//!     .transform("Hello", tokens.into_token_stream())
//!     .collect();
//!
//! assert_eq!(result[0].text, "hello");
//! ```

use std::fmt::Debug;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for token text transforms.
///
/// Implementations are persisted as their [`name`](Self::name) (the type tag)
/// plus the JSON object returned by [`to_fields`](Self::to_fields), and are
/// rebuilt through a [`TypeRegistry`](crate::extraction::registry::TypeRegistry).
pub trait TokenTransform: Debug + Send + Sync {
    /// Rewrite the tokens of `sequence`.
    ///
    /// `sequence` is the string the tokens were cut from.
    fn transform<'a>(&'a self, sequence: &'a str, tokens: TokenStream<'a>) -> TokenStream<'a>;

    /// Type tag of this transform.
    fn name(&self) -> &'static str;

    /// Field values of this transform, as a JSON object.
    fn to_fields(&self) -> Result<serde_json::Value>;
}

pub mod lowercase;

pub use lowercase::LowercaseTransform;
