//! Type tag registry for persisted records and token transforms.
//!
//! Persisted records and transforms are JSON objects holding their fields
//! plus the type tag under [`TYPE_FIELD`]. Loading looks the tag up in a
//! [`TypeRegistry`] and hands the remaining fields to the registered
//! constructor. Unknown tags fail the load.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use termscan::extraction::record::TaggedRecord;
//! use termscan::extraction::registry::TypeRegistry;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Person {
//!     birth: String,
//! }
//!
//! impl TaggedRecord for Person {
//!     const TAG: &'static str = "person";
//! }
//!
//! let mut registry = TypeRegistry::default();
//! registry.register_record::<Person>();
//!
//! let record = registry
//!     .record(json!({"_type": "person", "birth": "28 March 1960"}))
//!     .unwrap();
//! assert_eq!(record.downcast_ref::<Person>().unwrap().birth, "28 March 1960");
//!
//! assert!(registry.record(json!({"_type": "robot"})).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::analysis::token_filter::{LowercaseTransform, TokenTransform};
use crate::error::{Result, TermscanError};
use crate::extraction::record::{JsonRecord, Record, TaggedRecord};

/// Field holding the type tag of a persisted value.
pub const TYPE_FIELD: &str = "_type";

type RecordConstructor = Arc<dyn Fn(Value) -> Result<Arc<dyn Record>> + Send + Sync>;
type TransformConstructor = Arc<dyn Fn(Value) -> Result<Arc<dyn TokenTransform>> + Send + Sync>;

/// Mapping of type tags to record and transform constructors.
#[derive(Clone)]
pub struct TypeRegistry {
    records: AHashMap<String, RecordConstructor>,
    transforms: AHashMap<String, TransformConstructor>,
}

impl Default for TypeRegistry {
    /// A registry knowing [`JsonRecord`] (`json`) and
    /// [`LowercaseTransform`] (`lowercase`).
    fn default() -> Self {
        let mut registry = TypeRegistry::empty();
        registry
            .register_record::<JsonRecord>()
            .register_serde_transform::<LowercaseTransform>(LowercaseTransform::TAG);
        registry
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut records: Vec<_> = self.records.keys().collect();
        let mut transforms: Vec<_> = self.transforms.keys().collect();
        records.sort();
        transforms.sort();

        f.debug_struct("TypeRegistry")
            .field("records", &records)
            .field("transforms", &transforms)
            .finish()
    }
}

impl TypeRegistry {
    /// A registry knowing no type at all.
    pub fn empty() -> Self {
        TypeRegistry {
            records: AHashMap::new(),
            transforms: AHashMap::new(),
        }
    }

    /// Register a serde record type under its tag.
    pub fn register_record<T: TaggedRecord>(&mut self) -> &mut Self {
        self.register_record_with(T::TAG, |fields| {
            let record: T = serde_json::from_value(fields)?;
            Ok(Arc::new(record))
        })
    }

    /// Register a record constructor under a tag.
    ///
    /// The constructor receives the persisted fields without the type tag.
    pub fn register_record_with<S, F>(&mut self, tag: S, constructor: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(Value) -> Result<Arc<dyn Record>> + Send + Sync + 'static,
    {
        self.records.insert(tag.into(), Arc::new(constructor));
        self
    }

    /// Register a transform constructor under a tag.
    pub fn register_transform<S, F>(&mut self, tag: S, constructor: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(Value) -> Result<Arc<dyn TokenTransform>> + Send + Sync + 'static,
    {
        self.transforms.insert(tag.into(), Arc::new(constructor));
        self
    }

    /// Register a serde transform type under a tag.
    pub fn register_serde_transform<T>(&mut self, tag: &str) -> &mut Self
    where
        T: TokenTransform + DeserializeOwned + 'static,
    {
        self.register_transform(tag, |fields| {
            let transform: T = serde_json::from_value(fields)?;
            Ok(Arc::new(transform))
        })
    }

    /// Check whether a record tag is registered.
    pub fn has_record(&self, tag: &str) -> bool {
        self.records.contains_key(tag)
    }

    /// Check whether a transform tag is registered.
    pub fn has_transform(&self, tag: &str) -> bool {
        self.transforms.contains_key(tag)
    }

    /// Rebuild a record from its persisted form.
    pub fn record(&self, value: Value) -> Result<Arc<dyn Record>> {
        let (tag, fields) = split_tag(value, "record")?;
        let constructor = self
            .records
            .get(&tag)
            .ok_or_else(|| TermscanError::unknown_record_tag(&tag))?;
        constructor(Value::Object(fields))
    }

    /// Rebuild a transform from its persisted form.
    pub fn transform(&self, value: Value) -> Result<Arc<dyn TokenTransform>> {
        let (tag, fields) = split_tag(value, "transform")?;
        let constructor = self
            .transforms
            .get(&tag)
            .ok_or_else(|| TermscanError::unknown_transform_tag(&tag))?;
        constructor(Value::Object(fields))
    }

    /// Persisted form of a record.
    pub fn record_to_json(record: &dyn Record) -> Result<Value> {
        Ok(join_tag(record.tag(), record.to_fields()?))
    }

    /// Persisted form of a transform.
    pub fn transform_to_json(transform: &dyn TokenTransform) -> Result<Value> {
        match transform.to_fields()? {
            Value::Object(fields) => Ok(join_tag(transform.name(), fields)),
            other => Err(TermscanError::invalid_config(format!(
                "transform '{}' serialized to {other}, expected an object",
                transform.name()
            ))),
        }
    }
}

fn split_tag(value: Value, kind: &str) -> Result<(String, Map<String, Value>)> {
    let Value::Object(mut fields) = value else {
        return Err(TermscanError::invalid_config(format!(
            "persisted {kind} must be a JSON object"
        )));
    };

    match fields.shift_remove(TYPE_FIELD) {
        Some(Value::String(tag)) => Ok((tag, fields)),
        _ => Err(TermscanError::invalid_config(format!(
            "persisted {kind} lacks a string '{TYPE_FIELD}' field"
        ))),
    }
}

fn join_tag(tag: &str, fields: Map<String, Value>) -> Value {
    let mut tagged = Map::with_capacity(fields.len() + 1);
    tagged.insert(TYPE_FIELD.to_string(), Value::String(tag.to_string()));
    tagged.extend(fields);
    Value::Object(tagged)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_types() {
        let registry = TypeRegistry::default();
        assert!(registry.has_record("json"));
        assert!(registry.has_transform("lowercase"));
        assert!(!TypeRegistry::empty().has_record("json"));
    }

    #[test]
    fn test_json_record_round_trip() {
        let registry = TypeRegistry::default();
        let value = json!({"_type": "json", "birth": "unknown", "_matching_threshold": 0.75});

        let record = registry.record(value.clone()).unwrap();
        assert_eq!(record.tag(), "json");
        assert_eq!(record.matching_threshold(), Some(0.75));
        assert_eq!(TypeRegistry::record_to_json(record.as_ref()).unwrap(), value);
    }

    #[test]
    fn test_transform_round_trip() {
        let registry = TypeRegistry::default();
        let value = json!({"_type": "lowercase", "min_len": 4, "except_caps": true});

        let transform = registry.transform(value.clone()).unwrap();
        assert_eq!(transform.name(), "lowercase");
        assert_eq!(TypeRegistry::transform_to_json(transform.as_ref()).unwrap(), value);
    }

    #[test]
    fn test_unknown_tags() {
        let registry = TypeRegistry::default();

        match registry.record(json!({"_type": "robot"})) {
            Err(TermscanError::UnknownTag { kind, tag }) => {
                assert_eq!(kind, "record");
                assert_eq!(tag, "robot");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(matches!(
            registry.transform(json!({"_type": "uppercase"})),
            Err(TermscanError::UnknownTag { kind: "transform", .. })
        ));
    }

    #[test]
    fn test_missing_tag() {
        let registry = TypeRegistry::default();
        assert!(matches!(
            registry.record(json!({"birth": "unknown"})),
            Err(TermscanError::InvalidConfig(_))
        ));
        assert!(matches!(
            registry.record(json!("json")),
            Err(TermscanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_constructor() {
        let mut registry = TypeRegistry::empty();
        registry.register_record_with("constant", |_| {
            Ok(Arc::new(JsonRecord::new().with_field("constant", true)))
        });

        let record = registry.record(json!({"_type": "constant", "ignored": 1})).unwrap();
        let record = record.downcast_ref::<JsonRecord>().unwrap();
        assert_eq!(record.get("constant"), Some(&json!(true)));
    }
}
