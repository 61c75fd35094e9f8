//! Depth-first traversal producing raw Markdown.

use log::trace;

use crate::node::{Node, NodeRef, NodeType};
use crate::options::ConvertOptions;
use crate::rules::RuleTable;
use crate::{ClipdownError, Result};

/// Walks a node tree and applies the matching rule to every element.
///
/// - text nodes yield their raw text, unescaped,
/// - comments yield nothing,
/// - documents, fragments and elements without a rule yield the
///   concatenated output of their children,
/// - an element with a rule yields `replacement(children_output, node)`.
pub struct Walker<'a> {
    rules: &'a RuleTable,
    options: &'a ConvertOptions,
}

impl<'a> Walker<'a> {
    pub fn new(rules: &'a RuleTable, options: &'a ConvertOptions) -> Self {
        Self { rules, options }
    }

    /// Convert `node` and its subtree.
    pub fn process(&self, node: &Node) -> Result<String> {
        self.process_node(NodeRef::new(node), 0)
    }

    fn process_node(&self, node: NodeRef<'_>, depth: usize) -> Result<String> {
        match node.node.node_type {
            NodeType::Text => Ok(node.node.node_value.clone().unwrap_or_default()),
            NodeType::Comment => Ok(String::new()),
            NodeType::Document | NodeType::DocumentFragment => {
                self.process_children(node.node, depth)
            }
            NodeType::Element => self.process_element(node, depth + 1),
        }
    }

    fn process_element(&self, node: NodeRef<'_>, depth: usize) -> Result<String> {
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(ClipdownError::StructureTooDeep { limit });
            }
        }

        let content = self.process_children(node.node, depth)?;

        match self.rules.find_matching(&node, self.options) {
            Some((name, rule)) => {
                trace!("<{}> -> rule '{}'", node.tag_name(), name);
                rule.replace(&node, &content, self.options)
                    .map_err(|source| ClipdownError::Rule {
                        name: name.to_string(),
                        source,
                    })
            }
            None => Ok(content),
        }
    }

    fn process_children(&self, parent: &Node, depth: usize) -> Result<String> {
        let mut output = String::new();
        for child in parent.children() {
            output.push_str(&self.process_node(NodeRef::with_parent(child, parent), depth)?);
        }
        Ok(output)
    }
}
