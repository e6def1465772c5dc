//! Arena-backed document tree.
//!
//! Nodes are allocated from a single per-parse `Vec` and addressed by
//! [`NodeId`] rather than by `Rc`/`RefCell`, per the arena-friendly node model
//! design note. Parent/child/sibling links are all plain indices.

use crate::compat_mode::CompatMode;
use crate::tag_name::TagName;
use std::fmt;

fn is_xml_noncharacter(c: char) -> bool {
    let cp = c as u32;
    (0xFDD0..=0xFDEF).contains(&cp) || (cp & 0xFFFE) == 0xFFFE
}

fn xml_coerce_name(name: &str) -> Box<str> {
    name.chars()
        .map(|c| match c {
            '\u{000C}' => ' ',
            c if is_xml_noncharacter(c) => '\u{FFFD}',
            c => c,
        })
        .collect::<String>()
        .into_boxed_str()
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which markup namespace an element belongs to.
///
/// @see https://infra.spec.whatwg.org/#namespaces
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Html => "html",
            Namespace::Svg => "svg",
            Namespace::MathMl => "math",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Attribute {
    pub name: Box<str>,
    pub value: Box<str>,
}

#[derive(Clone, Debug)]
pub struct ElementData {
    pub name: TagName,
    pub namespace: Namespace,
    pub attrs: Vec<Attribute>,
    /// For `<template>` elements: the detached fragment holding the template's
    /// content. Never a regular child in the main tree.
    ///
    /// @see https://html.spec.whatwg.org/#the-template-element
    pub template_content: Option<NodeId>,
    pub self_closing_flag: bool,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.as_ref() == name)
            .map(|a| a.value.as_ref())
    }

    /// Inserts an attribute unless one of the same name already exists.
    ///
    /// > the later instances are ignored, as duplicate attributes are not
    /// > allowed on tags; only the first one is respected.
    ///
    /// @see https://html.spec.whatwg.org/#attribute-name-state
    pub fn set_attribute_if_absent(&mut self, name: Box<str>, value: Box<str>) {
        if !self.attrs.iter().any(|a| a.name == name) {
            self.attrs.push(Attribute { name, value });
        }
    }
}

#[derive(Clone, Debug)]
pub struct DoctypeData {
    pub name: Box<str>,
    pub public_id: Box<str>,
    pub system_id: Box<str>,
    pub compat_mode: CompatMode,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Document,
    DocumentFragment,
    Doctype(DoctypeData),
    Element(ElementData),
    Text(String),
    Comment(Box<str>),
}

#[derive(Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    fn leaf(kind: NodeKind) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            kind,
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}

/// Owning table of all nodes created during a single parse.
///
/// A parent exclusively owns its children; the reverse links (`parent`,
/// `prev_sibling`) exist only for lookup and are never used to free memory —
/// the whole arena is dropped at once, which also means there is no cycle to
/// worry about even though indices can "point" in both directions.
pub struct Dom {
    nodes: Vec<Node>,
    pub document: NodeId,
}

impl Dom {
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::leaf(NodeKind::Document));
        Self {
            nodes,
            document: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::leaf(NodeKind::DocumentFragment))
    }

    pub fn create_element(
        &mut self,
        name: TagName,
        namespace: Namespace,
        attrs: Vec<Attribute>,
        self_closing_flag: bool,
    ) -> NodeId {
        self.push(Node::leaf(NodeKind::Element(ElementData {
            name,
            namespace,
            attrs,
            template_content: None,
            self_closing_flag,
        })))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::leaf(NodeKind::Text(text.to_string())))
    }

    pub fn create_comment(&mut self, text: Box<str>) -> NodeId {
        self.push(Node::leaf(NodeKind::Comment(text)))
    }

    pub fn create_doctype(
        &mut self,
        name: Box<str>,
        public_id: Box<str>,
        system_id: Box<str>,
        compat_mode: CompatMode,
    ) -> NodeId {
        self.push(Node::leaf(NodeKind::Doctype(DoctypeData {
            name,
            public_id,
            system_id,
            compat_mode,
        })))
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous location first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let prev_last = self.node(parent).last_child;
        self.node_mut(child).parent = Some(parent);
        self.node_mut(child).prev_sibling = prev_last;

        if let Some(prev_last) = prev_last {
            self.node_mut(prev_last).next_sibling = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
        }
        self.node_mut(parent).last_child = Some(child);
    }

    /// Inserts `child` as the immediate previous sibling of `before`.
    pub fn insert_before(&mut self, before: NodeId, child: NodeId) {
        self.detach(child);

        let parent = self.node(before).parent;
        let prev = self.node(before).prev_sibling;

        self.node_mut(child).parent = parent;
        self.node_mut(child).prev_sibling = prev;
        self.node_mut(child).next_sibling = Some(before);
        self.node_mut(before).prev_sibling = Some(child);

        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(child),
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).first_child = Some(child);
                }
            }
        }
    }

    pub fn detach(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let n = self.node(node);
            (n.parent, n.prev_sibling, n.next_sibling)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).last_child = prev;
                }
            }
        }

        let n = self.node_mut(node);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Appends `text` as a child of `parent`, coalescing into the existing
    /// last child if it is already a Text node.
    ///
    /// @see https://html.spec.whatwg.org/#insert-a-character
    pub fn insert_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.node(parent).last_child {
            if let NodeKind::Text(existing) = &mut self.node_mut(last).kind {
                existing.push_str(text);
                return;
            }
        }
        let node = self.push(Node::leaf(NodeKind::Text(text.to_string())));
        self.append(parent, node);
    }

    /// XML-coercion post-pass (`Options::xml_coercion`): rewrites every
    /// element and attribute name so the tree could be re-serialized as
    /// well-formed XML. Form feeds become spaces; Unicode noncharacters
    /// become U+FFFD.
    ///
    /// @see https://html.spec.whatwg.org/#coercing-an-html-dom-into-an-infoset
    pub fn coerce_names_to_xml(&mut self) {
        for node in &mut self.nodes {
            if let NodeKind::Element(e) = &mut node.kind {
                e.name = TagName::new(&xml_coerce_name(e.name.as_str()));
                for attr in &mut e.attrs {
                    attr.name = xml_coerce_name(&attr.name);
                }
            }
        }
    }

    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.node(parent).first_child,
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Children<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.node(current).next_sibling;
        Some(current)
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom").field("len", &self.nodes.len()).finish()
    }
}
