//! Document change operations handed to the committer.
//!
//! The upstream pipeline delivers an ordered batch of [`Operation`] values
//! per commit call: an add carries the document reference plus its metadata
//! fields, a delete carries only the reference. In newline-delimited JSON
//! form an operation is tagged by an `action` key:
//!
//! ```json
//! {"action":"add","reference":"doc1","metadata":{"title":"Hello","tags":["a","b"]}}
//! {"action":"delete","reference":"doc2"}
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single add-or-delete document change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Operation {
    Add(AddOperation),
    Delete(DeleteOperation),
}

impl Operation {
    /// The document reference the operation was queued under.
    pub fn reference(&self) -> &str {
        match self {
            Operation::Add(op) => &op.reference,
            Operation::Delete(op) => &op.reference,
        }
    }
}

/// Request to add or update a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddOperation {
    pub reference: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Document body. Never emitted on the wire; populated upstream, see
    /// [`crate::batch::map_source_content`].
    #[serde(default)]
    pub content: String,
}

impl AddOperation {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }
}

/// Request to delete a document by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOperation {
    pub reference: String,
}

impl DeleteOperation {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Document metadata: a multimap of field names to string values.
///
/// Entries keep their insertion order, which is also the order fields are
/// emitted in on the wire. A field may hold any number of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, Vec<String>)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the named field, creating the field on first use.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert_all(name, vec![value.into()]);
    }

    /// Appends all values to the named field. The field is created even when
    /// `values` is empty.
    pub fn insert_all(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((name, values)),
        }
    }

    /// All values of the named field.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// First value of the named field.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Removes the named field, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            // Single values read better as scalars in batch files; both
            // forms are accepted back.
            if values.len() == 1 {
                map.serialize_entry(name, &values[0])?;
            } else {
                map.serialize_entry(name, values)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to a string or a list of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
                let mut metadata = Metadata::new();
                while let Some((name, values)) = access.next_entry::<String, OneOrMany>()? {
                    match values {
                        OneOrMany::One(value) => metadata.insert(name, value),
                        OneOrMany::Many(values) => metadata.insert_all(name, values),
                    }
                }
                Ok(metadata)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keeps_insertion_order() {
        let mut metadata = Metadata::new();
        metadata.insert("zulu", "1");
        metadata.insert("alpha", "2");
        metadata.insert("mike", "3");

        let names: Vec<&str> = metadata.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_metadata_multivalued_fields() {
        let mut metadata = Metadata::new();
        metadata.insert("tags", "a");
        metadata.insert("tags", "b");
        metadata.insert("title", "Hello");

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("tags").unwrap(), ["a", "b"]);
        assert_eq!(metadata.first("tags"), Some("a"));
        assert_eq!(metadata.first("title"), Some("Hello"));
        assert_eq!(metadata.first("missing"), None);
    }

    #[test]
    fn test_metadata_remove() {
        let mut metadata = Metadata::new();
        metadata.insert("keep", "x");
        metadata.insert("drop", "y");

        assert_eq!(metadata.remove("drop"), Some(vec!["y".to_string()]));
        assert_eq!(metadata.remove("drop"), None);
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_metadata_deserializes_scalar_and_list_forms() {
        let metadata: Metadata =
            serde_json::from_str(r#"{"title":"Hello","tags":["a","b"],"empty":[]}"#).unwrap();

        assert_eq!(metadata.get("title").unwrap(), ["Hello"]);
        assert_eq!(metadata.get("tags").unwrap(), ["a", "b"]);
        assert!(metadata.get("empty").unwrap().is_empty());
    }

    #[test]
    fn test_metadata_serde_round_trip() {
        let mut metadata = Metadata::new();
        metadata.insert("title", "Hello");
        metadata.insert_all("tags", vec!["a".to_string(), "b".to_string()]);

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"title":"Hello","tags":["a","b"]}"#);

        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_operation_tagged_forms() {
        let add: Operation = serde_json::from_str(
            r#"{"action":"add","reference":"doc1","metadata":{"title":"Hello"}}"#,
        )
        .unwrap();
        match &add {
            Operation::Add(op) => {
                assert_eq!(op.reference, "doc1");
                assert_eq!(op.metadata.first("title"), Some("Hello"));
                assert!(op.content.is_empty());
            }
            other => panic!("expected add, got {:?}", other),
        }

        let delete: Operation =
            serde_json::from_str(r#"{"action":"delete","reference":"doc2"}"#).unwrap();
        assert_eq!(delete, Operation::Delete(DeleteOperation::new("doc2")));
        assert_eq!(delete.reference(), "doc2");
    }
}
