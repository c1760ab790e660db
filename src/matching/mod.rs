//! Approximate matching.
//!
//! - [`engine`]: sliding-window Sørensen–Dice search over token bigrams
//! - [`resolver`]: reduction of overlapping candidate windows
//! - [`matcher`]: tokenization, bigram encoding and per-sentence indexes

pub mod engine;
pub mod matcher;
pub mod resolver;

pub use engine::{CandidateWindow, ScanCursor, SequenceMatcher, SimilarityEngine};
pub use matcher::{Matcher, MatcherConfig, SequenceIndex, Span, Text};
pub use resolver::{MatchResolver, ResolveState, resolve_unordered};
