//! Construction descriptors for tags
//!
//! A [`TagOptions`] is the plain `{ name, id?, attribute?, children? }` shape
//! accepted by [`Tag::new`](super::Tag::new) and by every element factory.
//! It can be written by hand, built with the `with_*` helpers, or read from
//! JSON/YAML.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{Tag, TagError};
use crate::render::{Markup, MarkupChild, RenderError};

/// Ordered attribute mapping.
///
/// Keys keep the position of their first insertion; overwriting a key
/// replaces its value in place. Serialized as a map in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Owned `(key, value)` pairs in insertion order.
    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

impl IntoIterator for Attributes {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Attributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut attributes = Attributes::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    attributes.insert(key, value);
                }
                Ok(attributes)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// One entry of a descriptor's `children` list.
#[derive(Debug, Clone)]
pub enum ChildSpec {
    /// Plain text content
    Text(String),
    /// A nested descriptor, built recursively into a child tag
    Options(TagOptions),
    /// An already-built tag, attached as-is
    Tag(Tag),
}

impl From<TagOptions> for ChildSpec {
    fn from(options: TagOptions) -> Self {
        ChildSpec::Options(options)
    }
}

impl From<Tag> for ChildSpec {
    fn from(tag: Tag) -> Self {
        ChildSpec::Tag(tag)
    }
}

impl From<&Tag> for ChildSpec {
    fn from(tag: &Tag) -> Self {
        ChildSpec::Tag(tag.clone())
    }
}

impl From<String> for ChildSpec {
    fn from(text: String) -> Self {
        ChildSpec::Text(text)
    }
}

impl From<&str> for ChildSpec {
    fn from(text: &str) -> Self {
        ChildSpec::Text(text.to_string())
    }
}

impl Serialize for ChildSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ChildSpec::Text(text) => serializer.serialize_str(text),
            ChildSpec::Options(options) => options.serialize(serializer),
            ChildSpec::Tag(tag) => tag.to_options().serialize(serializer),
        }
    }
}

/// Wire shape of a child entry. Scalars other than strings become text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChild {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Options(TagOptions),
}

impl<'de> Deserialize<'de> for ChildSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawChild::deserialize(deserializer)? {
            RawChild::Text(text) => ChildSpec::Text(text),
            RawChild::Bool(value) => ChildSpec::Text(value.to_string()),
            RawChild::Integer(value) => ChildSpec::Text(value.to_string()),
            RawChild::Float(value) => ChildSpec::Text(value.to_string()),
            RawChild::Options(options) => ChildSpec::Options(options),
        })
    }
}

/// Tag construction descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagOptions {
    /// Element name
    pub name: String,
    /// Lookup id (not emitted as an attribute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attributes, emitted in insertion order
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attribute: Attributes,
    /// Child descriptors, tags and text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildSpec>,
}

impl TagOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute.insert(key, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<ChildSpec>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Parse a descriptor from JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bpmn_tag_tree::tree::TagOptions;
    ///
    /// let options = TagOptions::from_json(r#"{"name": "userTask", "attribute": {"id": "t1"}}"#).unwrap();
    /// assert_eq!(options.name, "userTask");
    /// assert_eq!(options.attribute.get("id"), Some("t1"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, TagError> {
        serde_json::from_str(json).map_err(|e| TagError::InvalidConfig(e.to_string()))
    }

    /// Convert an already-parsed JSON value into a descriptor.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TagError> {
        serde_json::from_value(value).map_err(|e| TagError::InvalidConfig(e.to_string()))
    }

    /// Parse a descriptor from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, TagError> {
        serde_yaml::from_str(yaml).map_err(|e| TagError::InvalidConfig(e.to_string()))
    }
}

impl Markup for TagOptions {
    fn tag_name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.attribute.to_vec()
    }

    fn visit_children(
        &self,
        visitor: &mut dyn FnMut(MarkupChild<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        for child in &self.children {
            match child {
                ChildSpec::Text(text) => visitor(MarkupChild::Text(text))?,
                ChildSpec::Options(options) => visitor(MarkupChild::Element(options))?,
                ChildSpec::Tag(tag) => visitor(MarkupChild::Element(tag))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_first_insertion_position() {
        let mut attributes = Attributes::new();
        attributes.insert("id", "a");
        attributes.insert("name", "first");
        assert_eq!(attributes.insert("id", "b"), Some("a".to_string()));

        let pairs: Vec<_> = attributes.iter().collect();
        assert_eq!(pairs, vec![("id", "b"), ("name", "first")]);
    }

    #[test]
    fn test_attributes_deserialize_in_document_order() {
        let attributes: Attributes =
            serde_json::from_str(r#"{"target": "b", "sourceRef": "a", "id": "f1"}"#).unwrap();
        let keys: Vec<_> = attributes.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["target", "sourceRef", "id"]);
    }

    #[test]
    fn test_scalar_children_become_text() {
        let options = TagOptions::from_json(r#"{"name": "a", "children": ["x", 3, true]}"#).unwrap();
        let texts: Vec<_> = options
            .children
            .iter()
            .map(|c| match c {
                ChildSpec::Text(t) => t.clone(),
                other => panic!("unexpected child {:?}", other),
            })
            .collect();
        assert_eq!(texts, vec!["x", "3", "true"]);
    }

    #[test]
    fn test_missing_name_is_invalid_config() {
        let err = TagOptions::from_json(r#"{"id": "x"}"#).unwrap_err();
        assert!(matches!(err, TagError::InvalidConfig(_)));

        let err = TagOptions::from_json(r#"{"name": 42}"#).unwrap_err();
        assert!(matches!(err, TagError::InvalidConfig(_)));
    }

    #[test]
    fn test_yaml_descriptor() {
        let yaml = r#"
name: startEvent
id: s1
attribute:
  id: s1
children:
  - name: errorEventDefinition
"#;
        let options = TagOptions::from_yaml(yaml).unwrap();
        assert_eq!(options.id.as_deref(), Some("s1"));
        assert_eq!(options.children.len(), 1);
    }
}
