//! Term dictionaries.
//!
//! A dictionary is anything that can enumerate `(term, record)` pairs in a
//! stable order. Extraction reports matches in that order within each
//! sentence.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;

use crate::extraction::record::Record;

/// Iterator over the `(term, record)` pairs of a dictionary.
pub type DictionaryItems<'a> = Box<dyn Iterator<Item = (&'a str, &'a Arc<dyn Record>)> + 'a>;

/// Trait for term dictionaries.
///
/// Terms must be unique and the iteration order must not change between
/// calls as long as the dictionary is not modified.
pub trait Dictionary: Send + Sync {
    /// Iterate the dictionary items.
    fn items(&self) -> DictionaryItems<'_>;

    /// Number of terms.
    fn len(&self) -> usize {
        self.items().count()
    }

    /// Check if the dictionary holds no term.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory dictionary keeping terms in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryDictionary {
    entries: Vec<(String, Arc<dyn Record>)>,
    positions: AHashMap<String, usize>,
}

impl MemoryDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        MemoryDictionary::default()
    }

    /// Insert a term.
    ///
    /// If the term is present its record is replaced in place (keeping the
    /// term's position) and the previous record is returned.
    pub fn insert<S: Into<String>>(
        &mut self,
        term: S,
        record: Arc<dyn Record>,
    ) -> Option<Arc<dyn Record>> {
        let term = term.into();
        match self.positions.get(&term) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, record)),
            None => {
                self.positions.insert(term.clone(), self.entries.len());
                self.entries.push((term, record));
                None
            }
        }
    }

    /// Insert a term with a concrete record.
    pub fn insert_record<S: Into<String>, R: Record>(&mut self, term: S, record: R) {
        self.insert(term, Arc::new(record));
    }

    /// Builder-style insertion.
    pub fn with_record<S: Into<String>, R: Record>(mut self, term: S, record: R) -> Self {
        self.insert_record(term, record);
        self
    }

    /// Look up the record of a term.
    pub fn get(&self, term: &str) -> Option<&Arc<dyn Record>> {
        self.positions
            .get(term)
            .map(|&position| &self.entries[position].1)
    }

    /// Check whether a term is present.
    pub fn contains(&self, term: &str) -> bool {
        self.positions.contains_key(term)
    }

    /// Iterate the terms in insertion order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(term, _)| term.as_str())
    }
}

impl Dictionary for MemoryDictionary {
    fn items(&self) -> DictionaryItems<'_> {
        Box::new(self.entries.iter().map(|(term, record)| (term.as_str(), record)))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<S: Into<String>> FromIterator<(S, Arc<dyn Record>)> for MemoryDictionary {
    fn from_iter<I: IntoIterator<Item = (S, Arc<dyn Record>)>>(iter: I) -> Self {
        let mut dictionary = MemoryDictionary::new();
        for (term, record) in iter {
            dictionary.insert(term, record);
        }
        dictionary
    }
}

impl Dictionary for Vec<(String, Arc<dyn Record>)> {
    fn items(&self) -> DictionaryItems<'_> {
        Box::new(self.iter().map(|(term, record)| (term.as_str(), record)))
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl Dictionary for BTreeMap<String, Arc<dyn Record>> {
    fn items(&self) -> DictionaryItems<'_> {
        Box::new(self.iter().map(|(term, record)| (term.as_str(), record)))
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
