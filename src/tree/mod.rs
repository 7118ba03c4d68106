//! Tag tree
//!
//! Mutable in-memory trees of named, attributed elements with text and
//! element children:
//! - Construction from descriptors ([`TagOptions`]), JSON or YAML
//! - Attribute and child mutation
//! - Detaching a node from its parent
//! - Id lookup in document order
//! - Serialization through the [`render`](crate::render) pipeline

pub mod options;
pub mod tag;

use crate::render::RenderError;

/// Error raised by tag construction and mutation
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum TagError {
    /// Malformed construction input (missing or non-string name, bad document)
    #[error("Invalid tag configuration: {0}")]
    InvalidConfig(String),
    /// `remove` called on a tag without a live parent
    #[error("Tag has no parent to be removed from")]
    NoParent,
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub use options::{Attributes, ChildSpec, TagOptions};
pub use tag::{Tag, TagChild};
