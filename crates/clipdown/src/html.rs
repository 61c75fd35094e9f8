//! HTML parsing support.
//!
//! Parses an HTML fragment string into the [`Node`] tree consumed by the
//! converter. Malformed markup is recovered the way html5ever recovers it.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;
use crate::{ClipdownError, Result};

/// Parse an HTML fragment into a document fragment node.
///
/// The returned fragment holds the top-level nodes of the selection, so a
/// multi-root slice such as `<p>a</p><p>b</p>` keeps both paragraphs.
/// Elements nested deeper than `max_depth` levels fail with
/// [`ClipdownError::StructureTooDeep`] before the tree is built; `None`
/// disables the check.
///
/// # Example
///
/// ```rust
/// use clipdown::parse_html;
///
/// let fragment = parse_html("<h1>Hello <em>World</em></h1>", Some(512)).unwrap();
/// assert_eq!(fragment.children[0].tag_name(), "h1");
/// ```
pub fn parse_html(html: &str, max_depth: Option<usize>) -> Result<Node> {
    let parsed = Html::parse_fragment(html);
    let mut fragment = Node::document_fragment();
    copy_children(&mut fragment, parsed.root_element(), 0, max_depth)?;
    Ok(fragment)
}

fn element_to_node(
    source: ElementRef<'_>,
    depth: usize,
    max_depth: Option<usize>,
) -> Result<Node> {
    if let Some(limit) = max_depth {
        if depth > limit {
            return Err(ClipdownError::StructureTooDeep { limit });
        }
    }

    let mut element = Node::element(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attr(name, value);
    }
    copy_children(&mut element, source, depth, max_depth)?;
    Ok(element)
}

/// Copy text, comment and element children; doctypes and processing
/// instructions are dropped. `depth` is the element level of `source`.
fn copy_children(
    target: &mut Node,
    source: ElementRef<'_>,
    depth: usize,
    max_depth: Option<usize>,
) -> Result<()> {
    for child in source.children() {
        let copied = match child.value() {
            ScraperNode::Text(text) => Node::text(&text.text),
            ScraperNode::Comment(comment) => Node::comment(&comment.comment),
            ScraperNode::Element(_) => match ElementRef::wrap(child) {
                Some(element) => element_to_node(element, depth + 1, max_depth)?,
                None => continue,
            },
            _ => continue,
        };
        target.add_child(copied);
    }
    Ok(())
}
