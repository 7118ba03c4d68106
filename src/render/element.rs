//! Render tree and its XML serialization

use std::fmt;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{EmptyElementStyle, Markup, MarkupChild, RenderError, RenderOptions};
use crate::tree::Attributes;

/// A render tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Element(RenderElement),
    Text(String),
}

/// Output-only mirror of an element, built fresh for each serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderElement {
    name: String,
    attributes: Attributes,
    children: Vec<RenderNode>,
}

impl RenderElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attribute(key, value);
        self
    }

    pub fn with_element(mut self, child: RenderElement) -> Self {
        self.push_node(RenderNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_node(RenderNode::Text(text.into()));
        self
    }

    pub(crate) fn push_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key, value);
    }

    pub(crate) fn push_node(&mut self, node: RenderNode) {
        self.children.push(node);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[RenderNode] {
        &self.children
    }

    /// Serialize this element and its subtree.
    ///
    /// Output is a single line with no added whitespace. Text escapes `&`,
    /// `<` and `>`; attribute values additionally escape both quote kinds.
    /// Names are written as given; [`build`](super::build) is what checks
    /// them. Nesting is written recursively, one stack frame per level.
    pub fn serialize(&self, options: &RenderOptions) -> Result<String, RenderError> {
        let mut writer = Writer::new(Vec::new());

        if options.xml_declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(serialization_error)?;
        }

        self.write_to(&mut writer, options)?;

        String::from_utf8(writer.into_inner()).map_err(serialization_error)
    }

    fn write_to<W: Write>(
        &self,
        writer: &mut Writer<W>,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in self.attributes.iter() {
            start.push_attribute((key, value));
        }

        if self.children.is_empty() && options.empty_elements == EmptyElementStyle::SelfClosing {
            return writer
                .write_event(Event::Empty(start))
                .map_err(serialization_error);
        }

        writer
            .write_event(Event::Start(start))
            .map_err(serialization_error)?;

        for child in &self.children {
            match child {
                RenderNode::Element(element) => element.write_to(writer, options)?,
                RenderNode::Text(text) => writer
                    .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                    .map_err(serialization_error)?,
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(serialization_error)
    }
}

fn serialization_error(err: impl fmt::Display) -> RenderError {
    RenderError::SerializationError(err.to_string())
}

impl fmt::Display for RenderElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = self
            .serialize(&RenderOptions::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

impl Markup for RenderElement {
    fn tag_name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.attributes.to_vec()
    }

    fn visit_children(
        &self,
        visitor: &mut dyn FnMut(MarkupChild<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        for child in &self.children {
            match child {
                RenderNode::Element(element) => visitor(MarkupChild::Element(element))?,
                RenderNode::Text(text) => visitor(MarkupChild::Text(text))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_escaping() {
        let element = RenderElement::new("userTask").with_attribute("name", r#"a&b <"c">"#);
        assert_eq!(
            element.to_string(),
            r#"<userTask name="a&amp;b &lt;&quot;c&quot;&gt;"/>"#
        );
    }

    #[test]
    fn test_text_escaping() {
        let element = RenderElement::new("conditionExpression").with_text("x > 1 && y < 2");
        assert_eq!(
            element.to_string(),
            "<conditionExpression>x &gt; 1 &amp;&amp; y &lt; 2</conditionExpression>"
        );
    }

    #[test]
    fn test_expanded_empty_elements() {
        let element = RenderElement::new("a").with_element(RenderElement::new("b"));
        let options = RenderOptions {
            empty_elements: EmptyElementStyle::Expanded,
            ..Default::default()
        };
        assert_eq!(element.serialize(&options).unwrap(), "<a><b></b></a>");
    }

    #[test]
    fn test_xml_declaration() {
        let options = RenderOptions {
            xml_declaration: true,
            ..Default::default()
        };
        assert_eq!(
            RenderElement::new("definitions").serialize(&options).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?><definitions/>"#
        );
    }

    #[test]
    fn test_mixed_content_order() {
        let element = RenderElement::new("p")
            .with_text("one")
            .with_element(RenderElement::new("br"))
            .with_text("two");
        assert_eq!(element.to_string(), "<p>one<br/>two</p>");
    }
}
