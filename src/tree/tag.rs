//! Tag tree nodes
//!
//! A [`Tag`] is a shared handle to one element. Cloning a handle does not copy
//! the element: both handles name the same node, and identity comparisons
//! (`==`, [`Tag::ptr_eq`]) are pointer comparisons. Children are owned by their
//! parent; the parent link is a weak back-reference used to detach a node.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::options::{Attributes, ChildSpec, TagOptions};
use super::TagError;
use crate::render::{self, Markup, MarkupChild, RenderError, RenderOptions};

struct TagData {
    tag_name: String,
    id: Option<String>,
    attributes: Attributes,
    children: Vec<TagChild>,
    parent: Option<Weak<RefCell<TagData>>>,
}

/// Handle to one element of a tag tree
#[derive(Clone)]
pub struct Tag(Rc<RefCell<TagData>>);

/// A child entry: either an element or a text leaf
#[derive(Debug, Clone)]
pub enum TagChild {
    Element(Tag),
    Text(String),
}

impl TagChild {
    /// The element handle, if this child is an element
    pub fn as_element(&self) -> Option<&Tag> {
        match self {
            TagChild::Element(tag) => Some(tag),
            TagChild::Text(_) => None,
        }
    }

    /// The text content, if this child is a text leaf
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagChild::Text(text) => Some(text),
            TagChild::Element(_) => None,
        }
    }
}

/// Elements compare by identity, text leaves by content.
impl PartialEq for TagChild {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TagChild::Element(a), TagChild::Element(b)) => a.ptr_eq(b),
            (TagChild::Text(a), TagChild::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Tag> for TagChild {
    fn from(tag: Tag) -> Self {
        TagChild::Element(tag)
    }
}

impl From<&Tag> for TagChild {
    fn from(tag: &Tag) -> Self {
        TagChild::Element(tag.clone())
    }
}

impl From<String> for TagChild {
    fn from(text: String) -> Self {
        TagChild::Text(text)
    }
}

impl From<&str> for TagChild {
    fn from(text: &str) -> Self {
        TagChild::Text(text.to_string())
    }
}

impl Tag {
    /// Build a tag from a descriptor.
    ///
    /// Nested descriptors are built recursively, existing tags are attached,
    /// and text entries become text leaves. Every element child gets this tag
    /// as its parent.
    ///
    /// # Errors
    ///
    /// [`TagError::InvalidConfig`] if the descriptor (or any nested one) has
    /// an empty name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bpmn_tag_tree::tree::{Tag, TagOptions};
    ///
    /// let flow = Tag::new(
    ///     TagOptions::new("sequenceFlow")
    ///         .with_id("f1")
    ///         .with_attribute("sourceRef", "a")
    ///         .with_attribute("target", "b"),
    /// )
    /// .unwrap();
    /// assert_eq!(flow.to_string(), r#"<sequenceFlow sourceRef="a" target="b"/>"#);
    /// ```
    pub fn new(options: TagOptions) -> Result<Self, TagError> {
        let TagOptions {
            name,
            id,
            attribute,
            children,
        } = options;

        check_names(&name, &children)?;

        let tag = Self::build(name, id, attribute, children);

        debug!(
            tag_name = %tag.tag_name(),
            children = tag.child_count(),
            "Constructed tag"
        );
        Ok(tag)
    }

    /// Assemble an already-validated descriptor. Existing tags are only
    /// attached here, after every name in the descriptor has been checked,
    /// so a rejected descriptor never moves a tag out of its parent.
    fn build(
        name: String,
        id: Option<String>,
        attributes: Attributes,
        children: Vec<ChildSpec>,
    ) -> Self {
        let tag = Tag(Rc::new(RefCell::new(TagData {
            tag_name: name,
            id,
            attributes,
            children: Vec::with_capacity(children.len()),
            parent: None,
        })));

        for child in children {
            match child {
                ChildSpec::Text(text) => {
                    tag.append_child(text);
                }
                ChildSpec::Options(options) => {
                    let TagOptions {
                        name,
                        id,
                        attribute,
                        children,
                    } = options;
                    tag.append_child(Self::build(name, id, attribute, children));
                }
                ChildSpec::Tag(existing) => {
                    tag.append_child(existing);
                }
            }
        }
        tag
    }

    /// Build a bare element with no id, attributes or children.
    pub fn element(name: impl Into<String>) -> Result<Self, TagError> {
        Self::new(TagOptions::new(name))
    }

    /// Build a tag tree from a JSON descriptor.
    pub fn from_json(json: &str) -> Result<Self, TagError> {
        Self::new(TagOptions::from_json(json)?)
    }

    /// Build a tag tree from a parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TagError> {
        Self::new(TagOptions::from_value(value)?)
    }

    /// Build a tag tree from a YAML descriptor.
    pub fn from_yaml(yaml: &str) -> Result<Self, TagError> {
        Self::new(TagOptions::from_yaml(yaml)?)
    }

    pub fn tag_name(&self) -> String {
        self.0.borrow().tag_name.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.0.borrow().id.clone()
    }

    pub fn set_id(&self, id: impl Into<String>) -> &Self {
        self.0.borrow_mut().id = Some(id.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        self.0.borrow().attributes.get(key).map(str::to_string)
    }

    /// Snapshot of the attribute mapping
    pub fn attributes(&self) -> Attributes {
        self.0.borrow().attributes.clone()
    }

    /// Insert or overwrite an attribute. Values are escaped at render time,
    /// so any string is accepted.
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) -> &Self {
        self.0.borrow_mut().attributes.insert(key, value);
        self
    }

    /// Snapshot of the children, in order
    pub fn children(&self) -> Vec<TagChild> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// The current parent, if it is still alive
    pub fn parent(&self) -> Option<Tag> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Tag)
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Returns `true` if both handles name the same node.
    pub fn ptr_eq(&self, other: &Tag) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The parent, if it is alive and still lists this tag as a child.
    ///
    /// A removed tag keeps its parent pointer; this skips such stale links.
    fn attached_parent(&self) -> Option<Tag> {
        let parent = self.parent()?;
        let listed = parent
            .0
            .borrow()
            .children
            .iter()
            .any(|child| matches!(child, TagChild::Element(tag) if tag.ptr_eq(self)));
        listed.then_some(parent)
    }

    /// `true` if `other` is this tag or one of its current ancestors.
    fn has_ancestor_or_self(&self, other: &Tag) -> bool {
        let mut current = Some(self.clone());
        while let Some(tag) = current {
            if tag.ptr_eq(other) {
                return true;
            }
            current = tag.attached_parent();
        }
        false
    }

    /// Append a child at the end.
    ///
    /// An element that already belongs to a live parent is detached from that
    /// parent first, so a node is never listed by two parents. Appending this
    /// tag or one of its ancestors would create a cycle; that is ignored with
    /// a warning.
    pub fn append_child(&self, child: impl Into<TagChild>) -> &Self {
        let child = child.into();

        if let TagChild::Element(node) = &child {
            if self.has_ancestor_or_self(node) {
                warn!(
                    parent = %self.tag_name(),
                    child = %node.tag_name(),
                    "Refusing to append a tag into its own subtree"
                );
                return self;
            }

            if let Some(previous) = node.parent() {
                previous.remove_child(node);
            }
            node.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        }

        self.0.borrow_mut().children.push(child);
        self
    }

    /// Append a text leaf at the end.
    pub fn append_text(&self, text: impl Into<String>) -> &Self {
        self.append_child(TagChild::Text(text.into()))
    }

    /// Remove the first occurrence of `child`. Elements match by identity,
    /// text by content. Does nothing if `child` is not present.
    ///
    /// The removed node keeps its subtree and its parent pointer.
    pub fn remove_child(&self, child: impl Into<TagChild>) -> &Self {
        let child = child.into();
        let mut data = self.0.borrow_mut();
        if let Some(pos) = data.children.iter().position(|c| *c == child) {
            data.children.remove(pos);
        }
        drop(data);
        self
    }

    /// Detach this tag from its parent.
    ///
    /// The parent pointer is left in place, so calling `remove` again is a
    /// no-op rather than an error.
    ///
    /// # Errors
    ///
    /// [`TagError::NoParent`] if the tag was never attached or its parent has
    /// been dropped.
    pub fn remove(&self) -> Result<(), TagError> {
        let parent = self.parent().ok_or(TagError::NoParent)?;
        parent.remove_child(self);
        Ok(())
    }

    /// Find the first descendant with the given id, in document order.
    ///
    /// The search covers this tag's children and their subtrees; the tag's
    /// own id is never matched.
    pub fn get_element_by_id(&self, id: &str) -> Option<Tag> {
        let data = self.0.borrow();
        Self::get_element_by_id_in(id, &data.children)
    }

    /// Find the first tag with the given id among `children` and their
    /// subtrees (pre-order, siblings left to right).
    pub fn get_element_by_id_in(id: &str, children: &[TagChild]) -> Option<Tag> {
        for child in children {
            let TagChild::Element(node) = child else {
                continue;
            };
            let data = node.0.borrow();
            if data.id.as_deref() == Some(id) {
                return Some(node.clone());
            }
            if let Some(found) = Self::get_element_by_id_in(id, &data.children) {
                return Some(found);
            }
        }
        None
    }

    /// Snapshot this subtree back into a plain descriptor.
    pub fn to_options(&self) -> TagOptions {
        let data = self.0.borrow();
        TagOptions {
            name: data.tag_name.clone(),
            id: data.id.clone(),
            attribute: data.attributes.clone(),
            children: data
                .children
                .iter()
                .map(|child| match child {
                    TagChild::Element(tag) => ChildSpec::Options(tag.to_options()),
                    TagChild::Text(text) => ChildSpec::Text(text.clone()),
                })
                .collect(),
        }
    }

    /// Serialize this subtree to XML with default options.
    pub fn to_xml_string(&self) -> Result<String, RenderError> {
        render::render(self)
    }

    /// Serialize this subtree to XML.
    pub fn to_xml_string_with(&self, options: &RenderOptions) -> Result<String, RenderError> {
        render::render_with(self, options)
    }
}

/// Reject a descriptor tree containing an empty name, before anything is
/// built or attached.
fn check_names(name: &str, children: &[ChildSpec]) -> Result<(), TagError> {
    if name.is_empty() {
        return Err(TagError::InvalidConfig(
            "tag name cannot be empty".to_string(),
        ));
    }
    let mut pending: Vec<&[ChildSpec]> = vec![children];
    while let Some(children) = pending.pop() {
        for child in children {
            if let ChildSpec::Options(options) = child {
                if options.name.is_empty() {
                    return Err(TagError::InvalidConfig(
                        "tag name cannot be empty".to_string(),
                    ));
                }
                pending.push(&options.children);
            }
        }
    }
    Ok(())
}

/// Children are released iteratively so that dropping a very deep tree does
/// not recurse once per level.
impl Drop for TagData {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let TagChild::Element(Tag(node)) = child
                && let Ok(cell) = Rc::try_unwrap(node)
            {
                let mut data = cell.into_inner();
                pending.append(&mut data.children);
            }
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Tag {}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Tag")
            .field("tag_name", &data.tag_name)
            .field("id", &data.id)
            .field("attributes", &data.attributes)
            .field("children", &data.children)
            .finish()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = self.to_xml_string().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

impl Markup for Tag {
    fn tag_name(&self) -> String {
        self.0.borrow().tag_name.clone()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.0.borrow().attributes.to_vec()
    }

    fn visit_children(
        &self,
        visitor: &mut dyn FnMut(MarkupChild<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let data = self.0.borrow();
        for child in &data.children {
            match child {
                TagChild::Element(tag) => visitor(MarkupChild::Element(tag))?,
                TagChild::Text(text) => visitor(MarkupChild::Text(text))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_identity() {
        let a = Tag::element("a").unwrap();
        let b = a.clone();
        b.set_attribute("k", "v");
        assert_eq!(a.attribute("k").as_deref(), Some("v"));
        assert_eq!(a, b);
        assert_ne!(a, Tag::element("a").unwrap());
    }

    #[test]
    fn test_parent_link_is_weak() {
        let child = Tag::element("child").unwrap();
        {
            let parent = Tag::element("parent").unwrap();
            parent.append_child(&child);
            assert!(child.has_parent());
        }
        assert!(!child.has_parent());
        assert!(matches!(child.remove(), Err(TagError::NoParent)));
    }

    #[test]
    fn test_append_self_is_ignored() {
        let root = Tag::element("root").unwrap();
        root.append_child(&root);
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn test_append_ancestor_is_ignored() {
        let root = Tag::element("root").unwrap();
        let mid = Tag::element("mid").unwrap();
        let leaf = Tag::element("leaf").unwrap();
        root.append_child(&mid);
        mid.append_child(&leaf);

        leaf.append_child(&root);
        assert_eq!(leaf.child_count(), 0);
        assert_eq!(root.to_string(), "<root><mid><leaf/></mid></root>");
    }

    #[test]
    fn test_dropping_deep_chain_does_not_overflow() {
        let mut top = Tag::element("level").unwrap();
        for _ in 0..100_000 {
            let parent = Tag::element("level").unwrap();
            parent.append_child(&top);
            top = parent;
        }
        assert_eq!(top.child_count(), 1);
        drop(top);
    }

    #[test]
    fn test_text_children_compare_by_content() {
        let tag = Tag::element("p").unwrap();
        tag.append_text("one").append_text("two").append_text("one");
        tag.remove_child("one");
        let texts: Vec<_> = tag
            .children()
            .iter()
            .filter_map(|c| c.as_text().map(str::to_string))
            .collect();
        assert_eq!(texts, vec!["two", "one"]);
    }
}
