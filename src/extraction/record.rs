//! Dictionary records.
//!
//! Every dictionary term maps to a record, an arbitrary user payload handed
//! back with each match. A record may override the matching threshold of its
//! term.
//!
//! Records are persisted as a JSON object of their fields plus a type tag, so
//! a record type must be able to convert itself to fields and must be
//! registered in a [`TypeRegistry`](crate::extraction::registry::TypeRegistry)
//! under its tag to be loaded back. Serde types get all of that by
//! implementing [`TaggedRecord`].
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use termscan::extraction::record::{Record, TaggedRecord};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Person {
//!     birth: Option<String>,
//! }
//!
//! impl TaggedRecord for Person {
//!     const TAG: &'static str = "person";
//! }
//!
//! let person = Person { birth: Some("28 March 1960".to_string()) };
//! assert_eq!(person.tag(), "person");
//! assert_eq!(Record::matching_threshold(&person), None);
//! ```

use std::any::Any;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TermscanError};

/// Reserved field carrying a per-term matching threshold.
pub const MATCHING_THRESHOLD_FIELD: &str = "_matching_threshold";

/// A dictionary record.
pub trait Record: Any + Debug + Send + Sync {
    /// Threshold overriding the extractor default for this record's term.
    fn matching_threshold(&self) -> Option<f64> {
        None
    }

    /// Type tag under which the record type is registered.
    fn tag(&self) -> &str;

    /// Field values of the record.
    fn to_fields(&self) -> Result<Map<String, Value>>;

    /// Access to the concrete record type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Record {
    /// Downcast to a concrete record type.
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// A serde record type with a fixed type tag.
pub trait TaggedRecord: Serialize + DeserializeOwned + Debug + Send + Sync + 'static {
    /// Type tag of the record type.
    const TAG: &'static str;

    /// Threshold overriding the extractor default for this record's term.
    fn matching_threshold(&self) -> Option<f64> {
        None
    }
}

impl<T: TaggedRecord> Record for T {
    fn matching_threshold(&self) -> Option<f64> {
        TaggedRecord::matching_threshold(self)
    }

    fn tag(&self) -> &str {
        T::TAG
    }

    fn to_fields(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            other => Err(TermscanError::invalid_record(format!(
                "record of type '{}' serialized to {other}, expected an object",
                T::TAG
            ))),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A schemaless record holding a JSON object.
///
/// The reserved `_matching_threshold` field, when numeric, overrides the
/// matching threshold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRecord {
    fields: Map<String, Value>,
}

impl JsonRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        JsonRecord::default()
    }

    /// Create a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(JsonRecord { fields }),
            other => Err(TermscanError::invalid_record(format!(
                "expected a JSON object, found {other}"
            ))),
        }
    }

    /// Set a field.
    pub fn with_field<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set the matching threshold override.
    pub fn with_matching_threshold(self, threshold: f64) -> Self {
        self.with_field(MATCHING_THRESHOLD_FIELD, threshold)
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TaggedRecord for JsonRecord {
    const TAG: &'static str = "json";

    fn matching_threshold(&self) -> Option<f64> {
        self.fields.get(MATCHING_THRESHOLD_FIELD).and_then(Value::as_f64)
    }
}
