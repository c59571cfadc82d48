//! Records of training metrics.
//!
//! Optimization steps report what they did as a [`Record`], a map from
//! string keys to [`RecordValue`]s.
//!
//! ```rust
//! use distral_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("loss_critic", 0.25);
//! record.insert("actions", RecordValue::Array1(vec![0.0, 1.0]));
//! assert_eq!(record.get_scalar("loss_critic").unwrap(), 0.25);
//! ```
use crate::error::DistralError;
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically a loss.
    Scalar(f32),

    /// A 1-dimensional array of floating-point values.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// A container of key-value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, values of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f32, DistralError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(DistralError::RecordValueTypeError("Scalar".to_string())),
            None => Err(DistralError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, DistralError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(DistralError::RecordValueTypeError("Array1".to_string())),
            None => Err(DistralError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value.
    pub fn get_string(&self, k: &str) -> Result<String, DistralError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(DistralError::RecordValueTypeError("String".to_string())),
            None => Err(DistralError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record contains no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
