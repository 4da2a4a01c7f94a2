//! Row data contexts.
//!
//! A `DataContext` is the data a widget sees at render time: the current row.
//! It is created once per query root and narrowed, never mutated, when the
//! renderer descends into list elements or sub-query rows. Clones share the
//! underlying value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

use crate::{SpecError, Value};

/// Immutable handle on the current row.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext(Arc<Value>);

impl DataContext {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// A context with no fields.
    pub fn empty() -> Self {
        Self::new(Value::Record(Default::default()))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Whether field lookups are meaningful in this context.
    pub fn is_record(&self) -> bool {
        matches!(*self.0, Value::Record(_))
    }

    /// Look up a field. `None` both for absent fields and non-record rows.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Narrow a list value into one context per element.
    pub fn rows(list: &[Value]) -> Vec<DataContext> {
        list.iter().cloned().map(DataContext::new).collect()
    }

    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        Ok(Self::new(Value::from_json(text)?))
    }
}

impl Default for DataContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for DataContext {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Serialize for DataContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DataContext::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_on_record() {
        let ctx = DataContext::from_json(r#"{"title": "X"}"#).unwrap();
        assert!(ctx.is_record());
        assert_eq!(ctx.get("title"), Some(&Value::from("X")));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_lookup_on_scalar_row() {
        let ctx = DataContext::new(Value::Int(4));
        assert!(!ctx.is_record());
        assert_eq!(ctx.get("anything"), None);
    }

    #[test]
    fn test_rows_narrow_without_touching_parent() {
        let parent = DataContext::from_json(r#"{"tracks": [{"name": "A"}, {"name": "B"}]}"#).unwrap();
        let tracks = parent.get("tracks").and_then(Value::as_list).unwrap();
        let rows = DataContext::rows(tracks);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some(&Value::from("B")));
        assert_eq!(parent.get("name"), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let a = DataContext::from_json(r#"{"k": 1}"#).unwrap();
        let b = a.clone();
        assert!(std::ptr::eq(a.value(), b.value()));
    }
}
