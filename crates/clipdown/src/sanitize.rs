//! Pre-processing of the parsed fragment.
//!
//! [`sanitize`] returns a cleaned copy and leaves its input untouched:
//!
//! - `script`, `style` and `noscript` subtrees are removed,
//! - non-breaking spaces in text become regular spaces,
//! - outside `pre`, whitespace runs containing a line break become a single
//!   space, as a browser would render them,
//! - `p` and `div` elements with no child nodes are removed,
//! - whitespace-only text directly inside list and table containers is
//!   dropped.
//!
//! The empty `p`/`div` check looks at the children left after the first
//! rule and does not cascade: `<div><p></p></div>` keeps its `div`.
//!
//! Element nesting is bounded by the same `max_depth` the walker uses, so a
//! hostile tree fails with [`ClipdownError::StructureTooDeep`] before any
//! recursion gets close to the stack limit.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Node, NodeType};
use crate::utilities::{is_removable_when_empty, is_stripped, is_whitespace_insensitive};
use crate::{ClipdownError, Result};

const NBSP: char = '\u{a0}';

static SOURCE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*(?:\r\n?|\n)[ \t\r\n]*")
        .expect("SOURCE_LINE_BREAK: hardcoded regex is valid")
});

/// Where in the tree a node sits
#[derive(Clone, Copy)]
struct Context<'a> {
    parent_tag: Option<&'a str>,
    in_pre: bool,
    /// Element levels above this node
    depth: usize,
    max_depth: Option<usize>,
}

/// Produce a sanitized copy of `root`.
///
/// Fails with [`ClipdownError::StructureTooDeep`] when elements nest more
/// than `max_depth` levels; `None` disables the check.
pub fn sanitize(root: &Node, max_depth: Option<usize>) -> Result<Node> {
    let mut removed = 0;
    let context = Context {
        parent_tag: None,
        in_pre: false,
        depth: 0,
        max_depth,
    };
    let clean =
        sanitize_node(root, context, &mut removed)?.unwrap_or_else(Node::document_fragment);
    if removed > 0 {
        debug!("sanitizer removed {removed} nodes");
    }
    Ok(clean)
}

fn sanitize_node(
    node: &Node,
    context: Context<'_>,
    removed: &mut usize,
) -> Result<Option<Node>> {
    match node.node_type {
        NodeType::Text => {
            let text = node.node_value.as_deref().unwrap_or("");
            if context.parent_tag.is_some_and(is_whitespace_insensitive) && text.trim().is_empty() {
                *removed += 1;
                return Ok(None);
            }
            let text = text.replace(NBSP, " ");
            if context.in_pre {
                Ok(Some(Node::text(&text)))
            } else {
                Ok(Some(Node::text(&SOURCE_LINE_BREAK.replace_all(&text, " "))))
            }
        }
        NodeType::Comment => Ok(Some(node.clone())),
        NodeType::Element => {
            let depth = context.depth + 1;
            if let Some(limit) = context.max_depth {
                if depth > limit {
                    return Err(ClipdownError::StructureTooDeep { limit });
                }
            }

            let tag = node.tag_name();
            if is_stripped(tag) {
                *removed += 1;
                return Ok(None);
            }
            if is_removable_when_empty(tag) && node.children().all(is_stripped_node) {
                *removed += 1;
                return Ok(None);
            }
            let context = Context {
                parent_tag: Some(tag),
                in_pre: context.in_pre || tag == "pre",
                depth,
                ..context
            };
            copy_with_children(node, context, removed).map(Some)
        }
        NodeType::Document | NodeType::DocumentFragment => {
            let context = Context {
                parent_tag: None,
                ..context
            };
            copy_with_children(node, context, removed).map(Some)
        }
    }
}

fn is_stripped_node(node: &Node) -> bool {
    node.is_element() && is_stripped(node.tag_name())
}

fn copy_with_children(node: &Node, context: Context<'_>, removed: &mut usize) -> Result<Node> {
    let mut children = Vec::with_capacity(node.children.len());
    for child in node.children() {
        if let Some(clean) = sanitize_node(child, context, removed)? {
            children.push(clean);
        }
    }

    Ok(Node {
        node_type: node.node_type,
        node_name: node.node_name.clone(),
        node_value: node.node_value.clone(),
        attributes: node.attributes.clone(),
        children,
    })
}
