//! Built-in rules.
//!
//! Every tag is handled by at most one built-in rule, so priority among the
//! built-ins never decides an outcome; it only matters against rules added
//! later, which always win.

use super::{Filter, Rule};
use crate::node::Node;
use crate::normalize::normalize;
use crate::utilities::{
    clean_attribute, code_fence_for, escape_table_cell, language_from_classes, wrap_trimmed,
    IMAGE_ALT_PLACEHOLDER,
};

/// Create all built-in rules, in registration order
pub fn builtin_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("paragraph", paragraph_rule()),
        ("lineBreak", line_break_rule()),
        ("heading", heading_rule()),
        ("blockquote", blockquote_rule()),
        ("list", list_rule()),
        ("listItem", list_item_rule()),
        ("codeBlock", code_block_rule()),
        ("horizontalRule", horizontal_rule()),
        ("link", link_rule()),
        ("emphasis", emphasis_rule()),
        ("strong", strong_rule()),
        ("strikethrough", strikethrough_rule()),
        ("underline", underline_rule()),
        ("inlineCode", inline_code_rule()),
        ("image", image_rule()),
        ("table", table_rule()),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, options| options.br.clone())
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, _| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        // Headings are single-line in Markdown
        let content = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if content.is_empty() {
            return String::new();
        }

        format!("\n\n{} {}\n\n", "#".repeat(level), content)
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = normalize(content);
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .split('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        let content = content.trim_matches('\n');

        if node.parent_tag() == Some("li") {
            // Nested lists don't get surrounding blank lines
            format!("\n{}\n", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, _| {
        let is_ordered = node.parent_tag() == Some("ol");

        // Numbering always starts at 1; a `start` attribute is ignored
        let (marker, indent) = if is_ordered {
            let number = node.element_index().unwrap_or(0) + 1;
            (format!("{}. ", number), "   ")
        } else {
            ("- ".to_string(), "  ")
        };

        let content = normalize(content);
        let mut item = marker;
        for (i, line) in content.split('\n').enumerate() {
            if i > 0 {
                item.push('\n');
                if !line.is_empty() {
                    item.push_str(indent);
                }
            }
            item.push_str(line);
        }
        item.push('\n');
        item
    })
}

fn code_block_rule() -> Rule {
    Rule::for_tag("pre", |node, _, _| {
        let (code, language) = match node.node.find_descendant("code") {
            Some(code) => (code.text_content(), language_from_classes(code.classes())),
            None => (node.text_content(), ""),
        };

        // Raw text, not the converted children: code is never re-interpreted
        let code = code.trim_end_matches('\n');
        let fence = code_fence_for(code);
        format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
    })
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn link_rule() -> Rule {
    Rule::for_tag("a", |node, content, _| {
        let href = clean_attribute(node.attr("href"));
        if href.is_empty() {
            return content.to_string();
        }

        let title = clean_attribute(node.attr("title"));
        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title.replace('"', "\\\""))
        };

        format!("[{}]({}{})", content.trim(), href, title_part)
    })
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        let delimiter = options.em_delimiter.to_string();
        wrap_trimmed(content, &delimiter, &delimiter)
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        let delimiter = &options.strong_delimiter;
        wrap_trimmed(content, delimiter, delimiter)
    })
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags(&["del", "s", "strike"], |_, content, _| {
        wrap_trimmed(content, "~~", "~~")
    })
}

fn underline_rule() -> Rule {
    // Markdown has no underline; fall back to the inline HTML tag
    Rule::for_tags(&["u", "ins"], |_, content, _| {
        wrap_trimmed(content, "<u>", "</u>")
    })
}

fn inline_code_rule() -> Rule {
    Rule::new(Filter::tag("code"), |node, content, _| {
        // Inside a code block the content belongs to the block
        if node.parent_tag() == Some("pre") {
            return content.to_string();
        }

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        format!("`{}`", trimmed)
    })
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.attr("alt"));
        let alt = if alt.is_empty() {
            IMAGE_ALT_PLACEHOLDER.to_string()
        } else {
            alt
        };

        let src = clean_attribute(node.attr("src"));
        if src.is_empty() {
            return format!("[{}]", alt);
        }

        let title = clean_attribute(node.attr("title"));
        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title.replace('"', "\\\""))
        };

        format!("![{}]({}{})", alt, src, title_part)
    })
}

fn table_rule() -> Rule {
    Rule::for_tag("table", |node, _, _| {
        let rows = table_rows(node.node);

        // An explicit <thead> row, otherwise a first row made of <th> cells
        let header_index = rows.iter().position(|row| row.in_head).or_else(|| {
            rows.first()
                .filter(|row| row.tr.element_children().any(|cell| cell.is_tag("th")))
                .map(|_| 0)
        });

        let mut lines = Vec::with_capacity(rows.len() + 1);
        if let Some(index) = header_index {
            let cells = row_cells(rows[index].tr);
            if !cells.is_empty() {
                lines.push(format_row(&cells));
                lines.push(format_row(&vec!["---".to_string(); cells.len()]));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if Some(i) == header_index {
                continue;
            }
            let cells = row_cells(row.tr);
            if !cells.is_empty() {
                lines.push(format_row(&cells));
            }
        }

        if lines.is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", lines.join("\n"))
    })
}

struct TableRow<'a> {
    tr: &'a Node,
    in_head: bool,
}

/// Rows of a table in document order, including those inside row groups
fn table_rows(table: &Node) -> Vec<TableRow<'_>> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        match child.tag_name() {
            "tr" => rows.push(TableRow {
                tr: child,
                in_head: false,
            }),
            "thead" | "tbody" | "tfoot" => {
                let in_head = child.tag_name() == "thead";
                rows.extend(
                    child
                        .element_children()
                        .filter(|tr| tr.is_tag("tr"))
                        .map(|tr| TableRow { tr, in_head }),
                );
            }
            _ => {}
        }
    }
    rows
}

fn row_cells(tr: &Node) -> Vec<String> {
    tr.element_children()
        .filter(|cell| cell.is_tag("th") || cell.is_tag("td"))
        .map(|cell| escape_table_cell(&cell.text_content()))
        .collect()
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRef;
    use crate::options::ConvertOptions;

    fn apply(rule: &Rule, node: &Node, content: &str) -> String {
        rule.replace(&NodeRef::new(node), content, &ConvertOptions::default())
            .unwrap()
    }

    fn apply_in(rule: &Rule, parent: &Node, index: usize, content: &str) -> String {
        let node = &parent.children[index];
        rule.replace(
            &NodeRef::with_parent(node, parent),
            content,
            &ConvertOptions::default(),
        )
        .unwrap()
    }

    fn element_with_text(tag: &str, text: &str) -> Node {
        let mut node = Node::element(tag);
        node.add_child(Node::text(text));
        node
    }

    #[test]
    fn test_paragraph_frames_content() {
        let p = Node::element("p");
        assert_eq!(apply(&paragraph_rule(), &p, "Hello"), "\n\nHello\n\n");
    }

    #[test]
    fn test_heading_levels() {
        let rule = heading_rule();
        assert_eq!(apply(&rule, &Node::element("h1"), "Title"), "\n\n# Title\n\n");
        assert_eq!(apply(&rule, &Node::element("h4"), " Deep "), "\n\n#### Deep\n\n");
        assert_eq!(apply(&rule, &Node::element("h2"), "Two\nlines"), "\n\n## Two lines\n\n");
        assert_eq!(apply(&rule, &Node::element("h2"), "  "), "");
    }

    #[test]
    fn test_strong_and_emphasis() {
        let strong = strong_rule();
        let em = emphasis_rule();
        assert_eq!(apply(&strong, &Node::element("b"), "bold"), "**bold**");
        assert_eq!(apply(&strong, &Node::element("b"), "   "), "");
        assert_eq!(apply(&em, &Node::element("i"), "it"), "_it_");

        let options = ConvertOptions {
            em_delimiter: '*',
            strong_delimiter: "__".to_string(),
            ..Default::default()
        };
        let node = Node::element("em");
        assert_eq!(
            em.replace(&NodeRef::new(&node), "it", &options).unwrap(),
            "*it*"
        );
        assert_eq!(
            strong.replace(&NodeRef::new(&node), "it", &options).unwrap(),
            "__it__"
        );
    }

    #[test]
    fn test_link() {
        let rule = link_rule();
        let a = Node::element_with_attrs("a", vec![("href", "https://example.com")]);
        assert_eq!(apply(&rule, &a, "Link"), "[Link](https://example.com)");

        let titled = Node::element_with_attrs(
            "a",
            vec![("href", "https://example.com"), ("title", "Say \"hi\"")],
        );
        assert_eq!(
            apply(&rule, &titled, "Link"),
            "[Link](https://example.com \"Say \\\"hi\\\"\")"
        );

        assert_eq!(apply(&rule, &Node::element("a"), "text"), "text");
        let empty_href = Node::element_with_attrs("a", vec![("href", "  ")]);
        assert_eq!(apply(&rule, &empty_href, "text"), "text");
    }

    #[test]
    fn test_image() {
        let rule = image_rule();
        let img = Node::element_with_attrs("img", vec![("src", "a.png"), ("alt", "Alt")]);
        assert_eq!(apply(&rule, &img, ""), "![Alt](a.png)");

        let titled = Node::element_with_attrs(
            "img",
            vec![("src", "a.png"), ("alt", "Alt"), ("title", "T")],
        );
        assert_eq!(apply(&rule, &titled, ""), "![Alt](a.png \"T\")");

        let no_alt = Node::element_with_attrs("img", vec![("src", "a.png")]);
        assert_eq!(apply(&rule, &no_alt, ""), "![image](a.png)");

        let no_src = Node::element_with_attrs("img", vec![("alt", "Alt")]);
        assert_eq!(apply(&rule, &no_src, ""), "[Alt]");
        assert_eq!(apply(&rule, &Node::element("img"), ""), "[image]");
    }

    #[test]
    fn test_strikethrough_and_underline() {
        assert_eq!(apply(&strikethrough_rule(), &Node::element("del"), "gone"), "~~gone~~");
        assert_eq!(apply(&strikethrough_rule(), &Node::element("s"), " "), "");
        assert_eq!(apply(&underline_rule(), &Node::element("u"), "under"), "<u>under</u>");
        assert_eq!(apply(&underline_rule(), &Node::element("u"), "\n"), "");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let rule = blockquote_rule();
        let quote = Node::element("blockquote");
        assert_eq!(
            apply(&rule, &quote, "\n\nfirst\n\n\n\nsecond\n\n"),
            "\n\n> first\n>\n> second\n\n"
        );
        assert_eq!(
            apply(&rule, &quote, "\n\n> inner\n\n"),
            "\n\n> > inner\n\n"
        );
        assert_eq!(apply(&rule, &quote, " \n "), "");
    }

    #[test]
    fn test_list_items_are_numbered_from_one() {
        let mut ol = Node::element_with_attrs("ol", vec![("start", "5")]);
        ol.add_child(Node::element("li"));
        ol.add_child(Node::element("li"));

        let rule = list_item_rule();
        assert_eq!(apply_in(&rule, &ol, 0, "x"), "1. x\n");
        assert_eq!(apply_in(&rule, &ol, 1, "y"), "2. y\n");
    }

    #[test]
    fn test_list_item_continuation_indent() {
        let mut ul = Node::element("ul");
        ul.add_child(Node::element("li"));
        let mut ol = Node::element("ol");
        ol.add_child(Node::element("li"));

        let rule = list_item_rule();
        assert_eq!(apply_in(&rule, &ul, 0, "one\ntwo"), "- one\n  two\n");
        assert_eq!(apply_in(&rule, &ol, 0, "one\n\ntwo"), "1. one\n\n   two\n");
        assert_eq!(
            apply_in(&rule, &ul, 0, "outer\n- inner\n"),
            "- outer\n  - inner\n"
        );
    }

    #[test]
    fn test_list_framing() {
        let rule = list_rule();
        let ul = Node::element("ul");
        assert_eq!(apply(&rule, &ul, "- a\n- b\n"), "\n\n- a\n- b\n\n");

        let mut li = Node::element("li");
        li.add_child(Node::element("ul"));
        assert_eq!(apply_in(&rule, &li, 0, "- a\n"), "\n- a\n");
    }

    #[test]
    fn test_inline_code() {
        let rule = inline_code_rule();
        assert_eq!(apply(&rule, &Node::element("code"), " x + 1 "), "`x + 1`");
        assert_eq!(apply(&rule, &Node::element("code"), "  "), "");

        let mut pre = Node::element("pre");
        pre.add_child(Node::element("code"));
        assert_eq!(apply_in(&rule, &pre, 0, "raw  text"), "raw  text");
    }

    #[test]
    fn test_code_block_uses_raw_text_and_language() {
        let mut code = Node::element_with_attrs("code", vec![("class", "hljs language-js")]);
        code.add_child(Node::text("1 < 2\n"));
        let mut pre = Node::element("pre");
        pre.add_child(code);

        assert_eq!(
            apply(&code_block_rule(), &pre, "ignored"),
            "\n\n```js\n1 < 2\n```\n\n"
        );
    }

    #[test]
    fn test_code_block_without_code_element() {
        let pre = element_with_text("pre", "  indented\n    more");
        assert_eq!(
            apply(&code_block_rule(), &pre, ""),
            "\n\n```\n  indented\n    more\n```\n\n"
        );
    }

    #[test]
    fn test_code_block_containing_fence() {
        let mut code = Node::element("code");
        code.add_child(Node::text("```\ninner\n```"));
        let mut pre = Node::element("pre");
        pre.add_child(code);

        assert_eq!(
            apply(&code_block_rule(), &pre, ""),
            "\n\n````\n```\ninner\n```\n````\n\n"
        );
    }

    fn row(tag: &str, cells: &[&str]) -> Node {
        let mut tr = Node::element("tr");
        for cell in cells {
            tr.add_child(element_with_text(tag, cell));
        }
        tr
    }

    #[test]
    fn test_table_with_header_cells() {
        let mut tbody = Node::element("tbody");
        tbody.add_child(row("th", &["A", "B"]));
        tbody.add_child(row("td", &["1", "2"]));
        let mut table = Node::element("table");
        table.add_child(tbody);

        assert_eq!(
            apply(&table_rule(), &table, ""),
            "\n\n| A | B |\n| --- | --- |\n| 1 | 2 |\n\n"
        );
    }

    #[test]
    fn test_table_with_thead_and_escaping() {
        let mut thead = Node::element("thead");
        thead.add_child(row("td", &["Key", "Value"]));
        let mut tbody = Node::element("tbody");
        tbody.add_child(row("td", &["pipe", "a|b"]));
        tbody.add_child(row("td", &["ragged"]));
        let mut table = Node::element("table");
        table.add_child(thead);
        table.add_child(tbody);

        assert_eq!(
            apply(&table_rule(), &table, ""),
            "\n\n| Key | Value |\n| --- | --- |\n| pipe | a\\|b |\n| ragged |\n\n"
        );
    }

    #[test]
    fn test_table_without_header() {
        let mut table = Node::element("table");
        table.add_child(row("td", &["1", "2"]));
        assert_eq!(apply(&table_rule(), &table, ""), "\n\n| 1 | 2 |\n\n");
        assert_eq!(apply(&table_rule(), &Node::element("table"), "text"), "");
    }

    #[test]
    fn test_break_and_rule_tokens() {
        let options = ConvertOptions {
            br: "  \n".to_string(),
            hr: "***".to_string(),
            ..Default::default()
        };
        let br = Node::element("br");
        let hr = Node::element("hr");
        assert_eq!(
            line_break_rule().replace(&NodeRef::new(&br), "", &options).unwrap(),
            "  \n"
        );
        assert_eq!(
            horizontal_rule().replace(&NodeRef::new(&hr), "", &options).unwrap(),
            "\n\n***\n\n"
        );
        assert_eq!(apply(&horizontal_rule(), &hr, ""), "\n\n---\n\n");
    }
}
