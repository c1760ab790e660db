//! Error types for termscan.
//!
//! All fallible operations return [`TermscanError`]. Failures are structural
//! (bad configuration, unknown language, unresolvable type tag, I/O); nothing
//! in the matching pipeline fails once a [`Matcher`](crate::matching::Matcher)
//! or [`Extractor`](crate::extraction::Extractor) has been constructed.
//!
//! # Examples
//!
//! ```
//! use termscan::error::{Result, TermscanError};
//!
//! fn check(threshold: f64) -> Result<()> {
//!     if threshold <= 0.0 || threshold > 1.0 {
//!         return Err(TermscanError::invalid_config("threshold out of (0, 1]"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(0.5).is_ok());
//! assert!(check(1.5).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for termscan operations.
#[derive(Error, Debug)]
pub enum TermscanError {
    /// I/O errors (dictionary, text and configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No sentence model or stop-word list exists for the language
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage { language: String },

    /// A persisted type tag has no registered constructor
    #[error("Unknown {kind} type tag: {tag}")]
    UnknownTag { kind: &'static str, tag: String },

    /// Malformed configuration document or argument
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A record could not be converted to or from its persisted fields
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Errors raised with context by the command line front end
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`TermscanError`].
pub type Result<T> = std::result::Result<T, TermscanError>;

impl TermscanError {
    /// Create a new unsupported language error.
    pub fn unsupported_language<S: Into<String>>(language: S) -> Self {
        TermscanError::UnsupportedLanguage {
            language: language.into(),
        }
    }

    /// Create a new unknown record tag error.
    pub fn unknown_record_tag<S: Into<String>>(tag: S) -> Self {
        TermscanError::UnknownTag {
            kind: "record",
            tag: tag.into(),
        }
    }

    /// Create a new unknown transform tag error.
    pub fn unknown_transform_tag<S: Into<String>>(tag: S) -> Self {
        TermscanError::UnknownTag {
            kind: "transform",
            tag: tag.into(),
        }
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TermscanError::InvalidConfig(msg.into())
    }

    /// Create a new invalid record error.
    pub fn invalid_record<S: Into<String>>(msg: S) -> Self {
        TermscanError::InvalidRecord(msg.into())
    }
}
