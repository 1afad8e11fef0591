//! Ordered field-name → value rows.
//!
//! [`RawRow`] holds the strings a query returned and [`DecodedRow`] the typed
//! result. Both keep fields in insertion order, and serialize as a map in that
//! same order.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::data::Value;

pub type RawRow = Row<String>;
pub type DecodedRow = Row<Option<Value>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<V> {
    fields: Vec<(String, V)>,
}

impl<V> Default for Row<V> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<V> Row<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: V) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl DecodedRow {
    /// Decoded value of `name`, flattening absent values.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Option::as_ref)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Row<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl<V: Serialize> Serialize for Row<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let row: RawRow = [("Zeta", "1"), ("Alpha", "2"), ("Mid", "3")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(row.get("Alpha").map(String::as_str), Some("2"));
        assert_eq!(row.get("Nope"), None);
    }

    #[test]
    fn serializes_as_ordered_json_object() {
        let mut row = DecodedRow::new();
        row.push("b", Some(Value::Integer(1)));
        row.push("a", None);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"b":1,"a":null}"#);
    }
}
