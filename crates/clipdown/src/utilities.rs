//! Utility functions and constants shared by the rules and the sanitizer.

/// Elements removed together with their whole subtree before conversion
pub const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Elements dropped by the sanitizer when they have no child nodes
pub const REMOVABLE_WHEN_EMPTY: &[&str] = &["p", "div"];

/// Containers in which whitespace-only text is formatting, never content
pub const WHITESPACE_INSENSITIVE: &[&str] = &["ul", "ol", "table", "thead", "tbody", "tfoot", "tr"];

/// Alt text used for images that carry none
pub const IMAGE_ALT_PLACEHOLDER: &str = "image";

/// Minimum fence used for code blocks
pub const FENCE: &str = "```";

/// Check if a tag is stripped with its subtree
pub fn is_stripped(tag: &str) -> bool {
    STRIPPED_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is removed when it has no children
pub fn is_removable_when_empty(tag: &str) -> bool {
    REMOVABLE_WHEN_EMPTY.contains(&tag.to_lowercase().as_str())
}

/// Check if whitespace-only text directly inside a tag can be dropped
pub fn is_whitespace_insensitive(tag: &str) -> bool {
    WHITESPACE_INSENSITIVE.contains(&tag.to_lowercase().as_str())
}

/// Clean an attribute value (trim and handle empty)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Wrap the trimmed content in `delimiter`, keeping surrounding whitespace
/// outside the delimiters. Whitespace-only content yields an empty string.
pub fn wrap_trimmed(content: &str, open: &str, close: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!(
        "{}{}{}{}{}",
        flatten_whitespace(leading),
        open,
        trimmed,
        close,
        flatten_whitespace(trailing)
    )
}

fn flatten_whitespace(ws: &str) -> &str {
    if ws.is_empty() {
        ""
    } else {
        " "
    }
}

/// Escape a table cell: newlines become spaces and pipes are escaped
pub fn escape_table_cell(text: &str) -> String {
    text.trim().replace(['\r', '\n'], " ").replace('|', "\\|")
}

/// Language from a `language-xxx` class token, if any
pub fn language_from_classes<'a>(mut classes: impl Iterator<Item = &'a str>) -> &'a str {
    classes
        .find_map(|class| class.strip_prefix("language-"))
        .unwrap_or("")
}

/// A backtick fence long enough to enclose `code`
pub fn code_fence_for(code: &str) -> String {
    let longest_run = code
        .lines()
        .map(|line| line.trim_start().chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);

    if longest_run >= FENCE.len() {
        "`".repeat(longest_run + 1)
    } else {
        FENCE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_sets() {
        assert!(is_stripped("script"));
        assert!(is_stripped("STYLE"));
        assert!(!is_stripped("span"));
        assert!(is_removable_when_empty("DIV"));
        assert!(!is_removable_when_empty("span"));
        assert!(is_whitespace_insensitive("tbody"));
        assert!(!is_whitespace_insensitive("li"));
    }

    #[test]
    fn test_clean_attribute() {
        assert_eq!(clean_attribute(Some("  /a  ")), "/a");
        assert_eq!(clean_attribute(Some("   ")), "");
        assert_eq!(clean_attribute(None), "");
    }

    #[test]
    fn test_wrap_trimmed() {
        assert_eq!(wrap_trimmed("bold", "**", "**"), "**bold**");
        assert_eq!(wrap_trimmed(" bold\n", "**", "**"), " **bold** ");
        assert_eq!(wrap_trimmed("  \n ", "**", "**"), "");
        assert_eq!(wrap_trimmed("x", "<u>", "</u>"), "<u>x</u>");
    }

    #[test]
    fn test_escape_table_cell() {
        assert_eq!(escape_table_cell(" a|b "), "a\\|b");
        assert_eq!(escape_table_cell("one\ntwo"), "one two");
    }

    #[test]
    fn test_language_from_classes() {
        assert_eq!(language_from_classes("hljs language-js".split_whitespace()), "js");
        assert_eq!(language_from_classes("hljs".split_whitespace()), "");
    }

    #[test]
    fn test_code_fence_for() {
        assert_eq!(code_fence_for("let x = 1;"), "```");
        assert_eq!(code_fence_for("```\nnested\n```"), "````");
        assert_eq!(code_fence_for("a `tick` here"), "```");
    }
}
