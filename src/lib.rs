//! # termscan
//!
//! Approximate dictionary term extraction from free text.
//!
//! Terms are located with approximate string matching rather than exact
//! search, so spelling variants, inflected forms and OCR noise still resolve
//! to the right dictionary entry. Similarity is the Sørensen–Dice coefficient
//! of character bigram multisets, computed over token windows.
//!
//! ## Features
//!
//! - Tokenization with character spans and sentence splitting
//! - Stop-word aware match boundaries
//! - Pluggable token transforms (lowercasing built in)
//! - Single-pass overlap resolution
//! - Lazy extraction over arbitrary dictionaries
//! - JSON persistence of extractors

pub mod analysis;
pub mod bigram;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod matching;

pub mod prelude {
    pub use crate::analysis::token_filter::{LowercaseTransform, TokenTransform};
    pub use crate::error::{Result, TermscanError};
    pub use crate::extraction::{
        Dictionary, Extractor, JsonRecord, Match, MemoryDictionary, Record, TaggedRecord,
        TypeRegistry,
    };
    pub use crate::matching::{Matcher, MatcherConfig, Span};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
