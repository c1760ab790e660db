//! Text analysis for termscan.
//!
//! This module turns raw text into the token sequences the matcher works on:
//! sentence splitting, tokenization with character spans, token transforms,
//! and the per-language resources (sentence models and stop words) these
//! steps depend on.

pub mod language;
pub mod sentence;
pub mod stop_words;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use sentence::{SentenceModel, SentenceSplitter, UnicodeSentenceSplitter};
pub use stop_words::StopWords;
pub use token::{IntoTokenStream, Token, TokenKind, TokenStream};
pub use token_filter::{LowercaseTransform, TokenTransform};
pub use tokenizer::Tokenizer;
