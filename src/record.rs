//! Record
//!
//! A bag of named fields persisted under one identifier.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ShardError};

/// Field mapping as held by the store
pub type Mapping = Map<String, Value>;

/// A named-field value stored under one key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    data: Mapping,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct from a field mapping
    pub fn from_mapping(data: Mapping) -> Self {
        Self { data }
    }

    /// All fields as a mapping
    pub fn to_mapping(&self) -> &Mapping {
        &self.data
    }

    pub fn into_mapping(self) -> Mapping {
        self.data
    }

    /// Get a field, failing with `FieldNotFound` on a miss
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.data
            .get(name)
            .ok_or_else(|| ShardError::FieldNotFound(name.to_string()))
    }

    /// Get a field deserialized into `T`
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?.clone();
        Ok(serde_json::from_value(value)?)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Remove a field, returning its value if it was present
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.data.remove(name)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over (name, value) pairs
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }
}

impl From<Mapping> for Record {
    fn from(data: Mapping) -> Self {
        Self::from_mapping(data)
    }
}

impl From<Record> for Mapping {
    fn from(record: Record) -> Self {
        record.data
    }
}

/// Panics if the field is missing, like `HashMap` indexing.
/// Use [`Record::get`] for a fallible lookup.
impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.data.get(name) {
            Some(value) => value,
            None => panic!("field {} not found", name),
        }
    }
}
