//! BPMN tag tree - in-memory markup trees for process definitions
//!
//! Provides:
//! - Tag trees with attribute/child mutation, detaching and id lookup
//! - Two-stage XML rendering (render tree, then `quick-xml` serialization)
//! - Named factories for BPMN events, gateways, tasks and flows
//! - Render configuration (`.bpmn-tag.toml`, feature `config`)
//! - A command-line renderer (feature `cli`)

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "config")]
pub mod config;
pub mod factory;
pub mod render;
pub mod tree;

// Re-export commonly used types
#[cfg(feature = "config")]
pub use config::{ConfigError, TagConfig};
pub use factory::{ElementArgs, ElementCategory, ElementKind};
pub use render::{EmptyElementStyle, Markup, RenderElement, RenderError, RenderOptions};
pub use tree::{Attributes, Tag, TagChild, TagError, TagOptions};

// WASM bindings for rendering
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod wasm {
    use crate::factory::{CATALOG, ElementKind};
    use crate::tree::{Tag, TagError};
    use wasm_bindgen::prelude::*;

    /// Convert TagError to JsValue for JavaScript error handling
    fn tag_error_to_js(err: TagError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// Build a tag tree from a JSON descriptor and serialize it to XML.
    ///
    /// # Arguments
    ///
    /// * `descriptor_json` - `{ name, id?, attribute?, children? }` as JSON
    ///
    /// # Returns
    ///
    /// XML string, or JsValue error
    #[wasm_bindgen]
    pub fn render_tag_json(descriptor_json: &str) -> Result<String, JsValue> {
        let render = || -> Result<String, TagError> {
            let tag = Tag::from_json(descriptor_json)?;
            Ok(tag.to_xml_string()?)
        };
        render().map_err(tag_error_to_js)
    }

    /// List the BPMN element catalog.
    ///
    /// # Returns
    ///
    /// JSON array of catalog entries, or JsValue error
    #[wasm_bindgen]
    pub fn list_element_catalog() -> Result<String, JsValue> {
        let entries: Vec<_> = CATALOG.into_iter().map(ElementKind::describe).collect();
        serde_json::to_string(&entries)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
