//! Owned DOM tree used as the conversion input.
//!
//! Any parser can build this structure; with the `html` feature enabled
//! [`crate::parse_html`] produces it from an HTML fragment string. The tree is
//! created fresh for every conversion and only ever read by the walker.

use indexmap::IndexMap;

/// Kind of a [`Node`]; discriminants follow the DOM `nodeType` numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentFragment = 11,
}

/// A DOM node: element, text, comment or container.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: NodeType,

    /// Lowercase tag name for elements, `#text`, `#comment`, ... otherwise
    pub node_name: String,

    /// Payload of text and comment nodes
    pub node_value: Option<String>,

    /// Attributes in source order, keyed by lowercase name
    pub attributes: IndexMap<String, String>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Node {
    fn new(node_type: NodeType, node_name: &str, node_value: Option<&str>) -> Self {
        Self {
            node_type,
            node_name: node_name.to_string(),
            node_value: node_value.map(str::to_string),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Element with a lowercased tag name
    pub fn element(tag_name: &str) -> Self {
        Self::new(NodeType::Element, &tag_name.to_lowercase(), None)
    }

    /// Element carrying the given attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    pub fn text(content: &str) -> Self {
        Self::new(NodeType::Text, "#text", Some(content))
    }

    pub fn comment(content: &str) -> Self {
        Self::new(NodeType::Comment, "#comment", Some(content))
    }

    /// Empty container, the root produced by [`crate::parse_html`]
    pub fn document_fragment() -> Self {
        Self::new(NodeType::DocumentFragment, "#document-fragment", None)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// True for an element named `tag`, compared case-insensitively
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(tag)
    }

    pub fn tag_name(&self) -> &str {
        &self.node_name
    }

    /// Attribute lookup; names are case-insensitive
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name.to_lowercase().as_str())
            .map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Iterate over the whitespace-separated tokens of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
    }

    /// Concatenated text of every descendant text node, comments excluded
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or("")),
            NodeType::Comment => {}
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Find the first descendant element with the given tag (depth-first)
    pub fn find_descendant(&self, tag: &str) -> Option<&Node> {
        self.element_children().find_map(|child| {
            if child.is_tag(tag) {
                Some(child)
            } else {
                child.find_descendant(tag)
            }
        })
    }
}

/// A borrowed view of a node with a navigation-only link to its parent.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a Node>,
}

impl<'a> NodeRef<'a> {
    /// A root view: no parent
    pub fn new(node: &'a Node) -> Self {
        Self { node, parent: None }
    }

    pub fn with_parent(node: &'a Node, parent: &'a Node) -> Self {
        Self {
            node,
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    /// Tag of the parent, when the parent is an element
    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent
            .filter(|p| p.is_element())
            .map(|p| p.tag_name())
    }

    /// Zero-based position of this node among the parent's element children
    /// that share its tag name.
    pub fn element_index(&self) -> Option<usize> {
        let parent = self.parent?;
        parent
            .element_children()
            .filter(|sibling| sibling.node_name == self.node.node_name)
            .position(|sibling| std::ptr::eq(sibling, self.node))
    }

    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.element_children()
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
