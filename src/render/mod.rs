//! XML rendering
//!
//! Rendering is two-stage: a [`Markup`] source is mirrored into a
//! [`RenderElement`] tree, which is then written out with `quick-xml`.
//! Anything that can report a tag name, attributes and children can be
//! rendered; [`Tag`](crate::tree::Tag), [`TagOptions`](crate::tree::TagOptions)
//! and [`RenderElement`] all implement [`Markup`].

pub mod element;

use serde::{Deserialize, Serialize};

pub use element::{RenderElement, RenderNode};

/// Error during rendering
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum RenderError {
    /// An element has no usable tag name
    #[error("Invalid element: {0}")]
    InvalidElement(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// A child reported by a [`Markup`] source
pub enum MarkupChild<'a> {
    Element(&'a dyn Markup),
    Text(&'a str),
}

/// Capability needed to render something as an XML element.
pub trait Markup {
    /// Element name. An empty name cannot be rendered.
    fn tag_name(&self) -> String;

    /// Attributes in output order
    fn attributes(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Feed each child, in order, to `visitor`, stopping at the first error.
    fn visit_children(
        &self,
        _visitor: &mut dyn FnMut(MarkupChild<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        Ok(())
    }
}

/// How elements without children are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyElementStyle {
    /// `<name/>`
    #[default]
    SelfClosing,
    /// `<name></name>`
    Expanded,
}

impl std::str::FromStr for EmptyElementStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self-closing" | "self_closing" | "selfclosing" => Ok(EmptyElementStyle::SelfClosing),
            "expanded" => Ok(EmptyElementStyle::Expanded),
            _ => Err(format!(
                "Unknown empty element style: {}. Use 'self-closing' or 'expanded'.",
                s
            )),
        }
    }
}

impl std::fmt::Display for EmptyElementStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyElementStyle::SelfClosing => write!(f, "self-closing"),
            EmptyElementStyle::Expanded => write!(f, "expanded"),
        }
    }
}

/// Output options for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Form used for elements without children
    #[serde(default)]
    pub empty_elements: EmptyElementStyle,

    /// Prefix the output with `<?xml version="1.0" encoding="UTF-8"?>`
    #[serde(default)]
    pub xml_declaration: bool,
}

/// `true` if `name` is usable as an XML element or attribute name.
///
/// Starts with a letter, `_` or `:`; continues with letters, digits, `_`,
/// `:`, `-`, `.` or U+00B7.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| {
            c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.' | '\u{B7}')
        })
}

/// Mirror a markup source into a render tree.
///
/// The source is walked recursively, one stack frame per level; trees tens
/// of thousands of levels deep need a larger thread stack.
///
/// # Errors
///
/// [`RenderError::InvalidElement`] if the source or any element child has an
/// empty tag name, or if a tag or attribute name is not a valid XML name.
pub fn build<M: Markup + ?Sized>(markup: &M) -> Result<RenderElement, RenderError> {
    let name = markup.tag_name();
    if name.is_empty() {
        return Err(RenderError::InvalidElement(
            "root element has no tag name".to_string(),
        ));
    }
    build_named(name, markup)
}

fn build_named<M: Markup + ?Sized>(name: String, markup: &M) -> Result<RenderElement, RenderError> {
    if !is_valid_name(&name) {
        return Err(RenderError::InvalidElement(format!(
            "invalid tag name {:?}",
            name
        )));
    }

    let mut element = RenderElement::new(name);
    for (key, value) in markup.attributes() {
        if !is_valid_name(&key) {
            return Err(RenderError::InvalidElement(format!(
                "<{}> has invalid attribute name {:?}",
                element.name(),
                key
            )));
        }
        element.push_attribute(key, value);
    }

    markup.visit_children(&mut |child| {
        match child {
            MarkupChild::Element(inner) => {
                let inner_name = inner.tag_name();
                if inner_name.is_empty() {
                    return Err(RenderError::InvalidElement(format!(
                        "child of <{}> has no tag name",
                        element.name()
                    )));
                }
                element.push_node(RenderNode::Element(build_named(inner_name, inner)?));
            }
            MarkupChild::Text(text) => element.push_node(RenderNode::Text(text.to_string())),
        }
        Ok(())
    })?;

    Ok(element)
}

/// Render a markup source to an XML string with default options.
///
/// # Example
///
/// ```rust
/// use bpmn_tag_tree::render::render;
/// use bpmn_tag_tree::tree::TagOptions;
///
/// let options = TagOptions::new("startEvent")
///     .with_attribute("id", "s1")
///     .with_child(TagOptions::new("errorEventDefinition"));
/// let xml = render(&options).unwrap();
/// assert_eq!(xml, r#"<startEvent id="s1"><errorEventDefinition/></startEvent>"#);
/// ```
pub fn render<M: Markup + ?Sized>(markup: &M) -> Result<String, RenderError> {
    render_with(markup, &RenderOptions::default())
}

/// Render a markup source to an XML string.
pub fn render_with<M: Markup + ?Sized>(
    markup: &M,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    build(markup)?.serialize(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Synthetic {
        name: &'static str,
        text: Option<&'static str>,
        children: Vec<Synthetic>,
    }

    impl Markup for Synthetic {
        fn tag_name(&self) -> String {
            self.name.to_string()
        }

        fn visit_children(
            &self,
            visitor: &mut dyn FnMut(MarkupChild<'_>) -> Result<(), RenderError>,
        ) -> Result<(), RenderError> {
            if let Some(text) = self.text {
                visitor(MarkupChild::Text(text))?;
            }
            for child in &self.children {
                visitor(MarkupChild::Element(child))?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_render_synthetic_markup() {
        let tree = Synthetic {
            name: "process",
            text: None,
            children: vec![Synthetic {
                name: "documentation",
                text: Some("a < b"),
                children: Vec::new(),
            }],
        };
        assert_eq!(
            render(&tree).unwrap(),
            "<process><documentation>a &lt; b</documentation></process>"
        );
    }

    #[test]
    fn test_child_without_name_is_invalid_element() {
        let tree = Synthetic {
            name: "process",
            text: None,
            children: vec![Synthetic {
                name: "",
                text: None,
                children: Vec::new(),
            }],
        };
        let err = render(&tree).unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidElement("child of <process> has no tag name".to_string())
        );
    }

    #[test]
    fn test_names_must_be_xml_names() {
        for name in ["startEvent", "bpmn:process", "_x", "data-ref.v2", "ünïcode"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
        for name in ["", "a b", "x>y", "1task", "-x", "a\"b", "a=b"] {
            assert!(!is_valid_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_invalid_names_are_rejected_before_writing() {
        let tree = Synthetic {
            name: "process",
            text: None,
            children: vec![Synthetic {
                name: "user task",
                text: None,
                children: Vec::new(),
            }],
        };
        assert_eq!(
            render(&tree).unwrap_err(),
            RenderError::InvalidElement(r#"invalid tag name "user task""#.to_string())
        );
    }

    #[test]
    fn test_empty_element_style_parse() {
        assert_eq!(
            "expanded".parse::<EmptyElementStyle>().unwrap(),
            EmptyElementStyle::Expanded
        );
        assert_eq!(
            "Self-Closing".parse::<EmptyElementStyle>().unwrap(),
            EmptyElementStyle::SelfClosing
        );
        assert!("compact".parse::<EmptyElementStyle>().is_err());
    }
}
