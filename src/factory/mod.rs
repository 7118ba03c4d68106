//! Named BPMN element factories
//!
//! Thin constructors over [`Tag::new`] that fix the tag name:
//! - `event`: `startEvent`, `endEvent`, `errorEventDefinition`
//! - `gateway`: `exclusiveGateway`, `parallelGateway`, `inclusiveGateway`
//! - `task`: `userTask`, `serviceTask`
//! - `flow`: `sequenceFlow`

pub mod catalog;

use serde::{Deserialize, Serialize};

use crate::tree::{Attributes, ChildSpec, Tag, TagError};

pub use catalog::{CATALOG, CatalogEntry, ElementCategory, ElementKind};

/// Caller-supplied part of a factory call: everything but the name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attribute: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildSpec>,
}

impl ElementArgs {
    pub fn new() -> Self {
        Self::default()
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

    /// Args whose lookup id and `id` attribute are both `id`
    pub fn identified(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new().with_attribute("id", id.clone()).with_id(id)
    }
}

/// Build a tag from a catalog tag name, e.g. `"userTask"`.
///
/// # Errors
///
/// [`TagError::InvalidConfig`] if `kind` is not in the catalog.
pub fn create(kind: &str, args: ElementArgs) -> Result<Tag, TagError> {
    let kind: ElementKind = kind.parse().map_err(TagError::InvalidConfig)?;
    kind.build(args)
}

pub mod event {
    use super::{ElementArgs, ElementKind};
    use crate::tree::{Tag, TagError};

    pub fn start_event(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::StartEvent.build(args)
    }

    pub fn end_event(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::EndEvent.build(args)
    }

    pub fn error_event_definition(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::ErrorEventDefinition.build(args)
    }
}

pub mod gateway {
    use super::{ElementArgs, ElementKind};
    use crate::tree::{Tag, TagError};

    /// Exclusive gateway; conventionally carries a `default` flow id
    pub fn exclusive_gateway(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::ExclusiveGateway.build(args)
    }

    pub fn parallel_gateway(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::ParallelGateway.build(args)
    }

    pub fn inclusive_gateway(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::InclusiveGateway.build(args)
    }
}

pub mod task {
    use super::{ElementArgs, ElementKind};
    use crate::tree::{Tag, TagError};

    pub fn user_task(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::UserTask.build(args)
    }

    /// Service task (Java delegate)
    pub fn service_task(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::ServiceTask.build(args)
    }
}

pub mod flow {
    use super::{ElementArgs, ElementKind};
    use crate::tree::{Tag, TagError};

    /// Sequence flow; conventionally carries `sourceRef` and `target`
    pub fn sequence_flow(args: ElementArgs) -> Result<Tag, TagError> {
        ElementKind::SequenceFlow.build(args)
    }
}
