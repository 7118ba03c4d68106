//! BPMN element catalog
//!
//! Each [`ElementKind`] fixes a tag name and carries the attributes it is
//! conventionally given. The schema is informational: factories log missing
//! attributes but never reject a tag because of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::ElementArgs;
use crate::tree::{Tag, TagError, TagOptions};

/// Catalog grouping of element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementCategory {
    Event,
    Gateway,
    Task,
    Flow,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 4] = [
        ElementCategory::Event,
        ElementCategory::Gateway,
        ElementCategory::Task,
        ElementCategory::Flow,
    ];
}

impl FromStr for ElementCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" => Ok(ElementCategory::Event),
            "gateway" => Ok(ElementCategory::Gateway),
            "task" => Ok(ElementCategory::Task),
            "flow" => Ok(ElementCategory::Flow),
            _ => Err(format!(
                "Unknown element category: {}. Use 'event', 'gateway', 'task' or 'flow'.",
                s
            )),
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementCategory::Event => write!(f, "event"),
            ElementCategory::Gateway => write!(f, "gateway"),
            ElementCategory::Task => write!(f, "task"),
            ElementCategory::Flow => write!(f, "flow"),
        }
    }
}

/// BPMN element kinds with a named factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    StartEvent,
    EndEvent,
    ErrorEventDefinition,
    ExclusiveGateway,
    ParallelGateway,
    InclusiveGateway,
    UserTask,
    ServiceTask,
    SequenceFlow,
}

/// Every catalogued kind, grouped by category
pub const CATALOG: [ElementKind; 9] = [
    ElementKind::StartEvent,
    ElementKind::EndEvent,
    ElementKind::ErrorEventDefinition,
    ElementKind::ExclusiveGateway,
    ElementKind::ParallelGateway,
    ElementKind::InclusiveGateway,
    ElementKind::UserTask,
    ElementKind::ServiceTask,
    ElementKind::SequenceFlow,
];

/// Serializable description of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub tag_name: String,
    pub category: ElementCategory,
    pub required_attributes: Vec<String>,
    pub optional_attributes: Vec<String>,
}

impl ElementKind {
    pub const fn tag_name(self) -> &'static str {
        match self {
            ElementKind::StartEvent => "startEvent",
            ElementKind::EndEvent => "endEvent",
            ElementKind::ErrorEventDefinition => "errorEventDefinition",
            ElementKind::ExclusiveGateway => "exclusiveGateway",
            ElementKind::ParallelGateway => "parallelGateway",
            ElementKind::InclusiveGateway => "inclusiveGateway",
            ElementKind::UserTask => "userTask",
            ElementKind::ServiceTask => "serviceTask",
            ElementKind::SequenceFlow => "sequenceFlow",
        }
    }

    pub const fn category(self) -> ElementCategory {
        match self {
            ElementKind::StartEvent | ElementKind::EndEvent | ElementKind::ErrorEventDefinition => {
                ElementCategory::Event
            }
            ElementKind::ExclusiveGateway
            | ElementKind::ParallelGateway
            | ElementKind::InclusiveGateway => ElementCategory::Gateway,
            ElementKind::UserTask | ElementKind::ServiceTask => ElementCategory::Task,
            ElementKind::SequenceFlow => ElementCategory::Flow,
        }
    }

    /// Attributes this kind is conventionally given
    pub const fn required_attributes(self) -> &'static [&'static str] {
        match self {
            ElementKind::ErrorEventDefinition => &[],
            ElementKind::ExclusiveGateway => &["id", "default"],
            ElementKind::SequenceFlow => &["id", "sourceRef", "target"],
            _ => &["id"],
        }
    }

    pub const fn optional_attributes(self) -> &'static [&'static str] {
        match self {
            ElementKind::StartEvent | ElementKind::EndEvent | ElementKind::ErrorEventDefinition => {
                &[]
            }
            _ => &["name"],
        }
    }

    /// Kinds belonging to `category`, in catalog order
    pub fn by_category(category: ElementCategory) -> impl Iterator<Item = ElementKind> {
        CATALOG
            .into_iter()
            .filter(move |kind| kind.category() == category)
    }

    /// Conventional attributes absent from `tag`
    pub fn missing_attributes(self, tag: &Tag) -> Vec<&'static str> {
        let attributes = tag.attributes();
        self.required_attributes()
            .iter()
            .copied()
            .filter(|key| !attributes.contains_key(key))
            .collect()
    }

    /// Build a tag of this kind.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bpmn_tag_tree::factory::{ElementArgs, ElementKind};
    ///
    /// let task = ElementKind::UserTask
    ///     .build(ElementArgs::new().with_attribute("id", "approve"))
    ///     .unwrap();
    /// assert_eq!(task.to_string(), r#"<userTask id="approve"/>"#);
    /// ```
    pub fn build(self, args: ElementArgs) -> Result<Tag, TagError> {
        let tag = Tag::new(TagOptions {
            name: self.tag_name().to_string(),
            id: args.id,
            attribute: args.attribute,
            children: args.children,
        })?;

        let missing = self.missing_attributes(&tag);
        if !missing.is_empty() {
            debug!(
                kind = self.tag_name(),
                missing = ?missing,
                "Element built without conventional attributes"
            );
        }

        Ok(tag)
    }

    pub fn describe(self) -> CatalogEntry {
        CatalogEntry {
            tag_name: self.tag_name().to_string(),
            category: self.category(),
            required_attributes: self
                .required_attributes()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            optional_attributes: self
                .optional_attributes()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FromStr for ElementKind {
    type Err = String;

    /// Parse a BPMN tag name (`"startEvent"`, `"sequenceFlow"`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .into_iter()
            .find(|kind| kind.tag_name() == s)
            .ok_or_else(|| format!("Unknown element kind: {}", s))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_round_trips_tag_names() {
        for kind in CATALOG {
            assert_eq!(kind.tag_name().parse::<ElementKind>().unwrap(), kind);
        }
        assert!("task".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_by_category() {
        let gateways: Vec<_> = ElementKind::by_category(ElementCategory::Gateway).collect();
        assert_eq!(
            gateways,
            vec![
                ElementKind::ExclusiveGateway,
                ElementKind::ParallelGateway,
                ElementKind::InclusiveGateway
            ]
        );
    }
}
