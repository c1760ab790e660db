//! Dictionary term extraction.
//!
//! - [`record`]: user payloads attached to dictionary terms
//! - [`dictionary`]: sources of `(term, record)` pairs
//! - [`registry`]: type tags for persisted records and transforms
//! - [`extractor`]: matching every term of a dictionary against a text

pub mod dictionary;
pub mod extractor;
pub mod record;
pub mod registry;

pub use dictionary::{Dictionary, DictionaryItems, MemoryDictionary};
pub use extractor::{DEFAULT_THRESHOLD, Extraction, Extractor, Match};
pub use record::{JsonRecord, MATCHING_THRESHOLD_FIELD, Record, TaggedRecord};
pub use registry::{TYPE_FIELD, TypeRegistry};
