//! Post-processing of the raw Markdown produced by the walker.
//!
//! Applied once after traversal:
//!
//! 1. runs of three or more newlines collapse to exactly two,
//! 2. horizontal whitespace is stripped from both ends of every line,
//! 3. every fenced code block gets exactly one blank line before and after,
//! 4. blank lines are trimmed from both ends of the document.
//!
//! Fenced code is copied verbatim. Leading whitespace is kept on list lines
//! since it carries the nesting: a line starting with a list marker, a line
//! continuing one without a blank line in between, and a line after a blank
//! line that is indented at least to the text column of an open list item.
//! A fence may be indented as part of a list item; its closing fence matches
//! whatever its indentation. Blank runs are collapsed again after stripping,
//! because whitespace-only lines only become blank in step 2.
//! `normalize(normalize(x)) == normalize(x)` for every input.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_ENDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("LINE_ENDING: hardcoded regex is valid"));

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:[-*+]|[0-9]+[.)])(?:[ \t]|$)")
        .expect("LIST_MARKER: hardcoded regex is valid")
});

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^`{3,}").expect("FENCE_OPEN: hardcoded regex is valid"));

const HORIZONTAL_WHITESPACE: [char; 2] = [' ', '\t'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Text,
    Blank,
    FenceOpen,
    Code,
    FenceClose,
}

/// An open fenced code block
#[derive(Debug, Clone, Copy)]
struct Fence {
    len: usize,
    /// The opening fence kept its indentation, so the closing one does too
    indented: bool,
}

/// Canonicalize Markdown whitespace and blank lines.
pub fn normalize(markdown: &str) -> String {
    let text = LINE_ENDING.replace_all(markdown, "\n");
    let mut out = LineBuffer::default();

    let mut open_fence: Option<Fence> = None;
    // Text columns of the open list items, innermost last
    let mut list_columns: Vec<usize> = Vec::new();

    for raw in text.split('\n') {
        let line = raw.trim_end_matches(HORIZONTAL_WHITESPACE);

        if let Some(fence) = open_fence {
            if is_closing_fence(line, fence.len) {
                open_fence = None;
                let close = if fence.indented {
                    line
                } else {
                    line.trim_start_matches(HORIZONTAL_WHITESPACE)
                };
                out.push(close, LineKind::FenceClose);
            } else {
                out.push(raw, LineKind::Code);
            }
            continue;
        }

        let content = line.trim_start_matches(HORIZONTAL_WHITESPACE);
        if content.is_empty() {
            out.push("", LineKind::Blank);
            continue;
        }

        let fence = FENCE_OPEN.find(content).map(|m| m.len());
        // Fences always get a blank line before them, so they are judged as
        // if one were already there
        let after_break = fence.is_some() || out.at_break();
        let indent = line.len() - content.len();

        let keep_indent = if let Some(marker) = LIST_MARKER.find(line) {
            list_columns.retain(|&column| column <= indent);
            list_columns.push(marker.end());
            true
        } else if after_break {
            list_columns.retain(|&column| column <= indent);
            !list_columns.is_empty()
        } else {
            !list_columns.is_empty()
        };

        let line = if keep_indent { line } else { content };
        match fence {
            Some(len) => {
                open_fence = Some(Fence {
                    len,
                    indented: keep_indent,
                });
                out.push(line, LineKind::FenceOpen);
            }
            None => out.push(line, LineKind::Text),
        }
    }

    out.finish()
}

fn is_closing_fence(line: &str, fence_len: usize) -> bool {
    let line = line.trim_matches(HORIZONTAL_WHITESPACE);
    line.len() >= fence_len && line.bytes().all(|b| b == b'`')
}

/// Output lines with blank-line collapsing and fence spacing applied on push
#[derive(Default)]
struct LineBuffer {
    lines: Vec<String>,
    last: Option<LineKind>,
}

impl LineBuffer {
    /// True when the next pushed line starts a new block: at the start, after
    /// a blank line, or after a closing fence.
    fn at_break(&self) -> bool {
        matches!(
            self.last,
            None | Some(LineKind::Blank) | Some(LineKind::FenceClose)
        )
    }

    fn push(&mut self, line: &str, kind: LineKind) {
        if kind == LineKind::Blank {
            // No leading blanks, never two in a row
            if matches!(self.last, None | Some(LineKind::Blank)) {
                return;
            }
        } else if self.last.is_some()
            && self.last != Some(LineKind::Blank)
            && (kind == LineKind::FenceOpen || self.last == Some(LineKind::FenceClose))
        {
            self.lines.push(String::new());
            self.last = Some(LineKind::Blank);
        }

        self.lines.push(line.to_string());
        self.last = Some(kind);
    }

    fn finish(mut self) -> String {
        if self.last == Some(LineKind::Blank) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\n\nb\n\n\n\n\n\nc"), "a\n\nb\n\nc");
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_whitespace_only_lines_become_blank() {
        assert_eq!(normalize("a\n  \n\t\n \nb"), "a\n\nb");
    }

    #[test]
    fn test_strips_line_whitespace() {
        assert_eq!(normalize("  one  \n\ttwo\t"), "one\ntwo");
    }

    #[test]
    fn test_trims_document() {
        assert_eq!(normalize("\n\n\n  Title\n\n"), "Title");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n \n\t\n"), "");
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_fence_spacing() {
        assert_eq!(
            normalize("before\n```js\nx\n```\nafter"),
            "before\n\n```js\nx\n```\n\nafter"
        );
        assert_eq!(
            normalize("before\n\n\n\n```\nx\n```\n\n\n\nafter"),
            "before\n\n```\nx\n```\n\nafter"
        );
        assert_eq!(normalize("```\na\n```\n```\nb\n```"), "```\na\n```\n\n```\nb\n```");
    }

    #[test]
    fn test_code_is_verbatim() {
        let input = "```py\ndef f():\n    return 1   \n\n\n\n    pass\n```";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn test_longer_fence_needs_longer_close() {
        let input = "````\n```\nstill code   \n````";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        assert_eq!(normalize("text\n```\n  code  "), "text\n\n```\n  code  ");
    }

    #[test]
    fn test_keeps_list_indentation() {
        assert_eq!(
            normalize("- a\n  - b\n    - c\n  continued\n- d"),
            "- a\n  - b\n    - c\n  continued\n- d"
        );
        assert_eq!(normalize("1. a\n   more\n2. b"), "1. a\n   more\n2. b");
    }

    #[test]
    fn test_multi_paragraph_list_item() {
        assert_eq!(normalize("- A\n\n  B\n- C"), "- A\n\n  B\n- C");
        assert_eq!(normalize("1. A\n\n\n   B\n2. C"), "1. A\n\n   B\n2. C");
        assert_eq!(
            normalize("- a\n  - b\n\n    more b\n\n  more a"),
            "- a\n  - b\n\n    more b\n\n  more a"
        );
    }

    #[test]
    fn test_unindented_line_after_blank_ends_list() {
        assert_eq!(normalize("- a\n\nafter\n  text"), "- a\n\nafter\ntext");
        assert_eq!(normalize("1. a\n\n  short indent"), "1. a\n\nshort indent");
        assert_eq!(normalize("  plain\n    text"), "plain\ntext");
    }

    #[test]
    fn test_fence_inside_list_item() {
        let input = "- Intro\n\n  ```\n  def f():\n      return 1\n  ```\n- next\n\n\n\nafter\n\n";
        assert_eq!(
            normalize(input),
            "- Intro\n\n  ```\n  def f():\n      return 1\n  ```\n\n- next\n\nafter"
        );
    }

    #[test]
    fn test_indented_closing_fence_closes_top_level_fence() {
        assert_eq!(
            normalize("```\ncode\n   ```\n\n\n\nafter"),
            "```\ncode\n```\n\nafter"
        );
    }

    #[test]
    fn test_idempotent_examples() {
        let samples = [
            "a\n \n \n \nb",
            "- a\n```\n  x\n```\n  y",
            "   ```\ncode\n",
            "\r\r\n\r\nx\r",
            "> q\n>\n> q2\n\n\n",
            "- a\n\n  ```\n  x\n\n\n  ```\n  y\n\n\n",
            "1. a\n   ```\n   x\n```\n   b",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {sample:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(input in "[a-c1 \t\r\n`*#>.|-]{0,200}") {
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_no_triple_newlines_outside_code(input in "[a-c \t\r\n-]{0,200}") {
            let out = normalize(&input);
            prop_assert!(!out.contains("\n\n\n"));
            prop_assert!(!out.starts_with('\n'));
            prop_assert!(!out.ends_with('\n'));
        }

        #[test]
        fn prop_normalize_is_idempotent_on_list_blocks(
            lines in prop::collection::vec(
                prop::sample::select(vec![
                    "- a", "  - b", "1. c", "  text", "   text", "    deep", "plain", "",
                    "  ", "```", "  ```", "   ````", "\t```", "> q",
                ]),
                0..40,
            )
        ) {
            let input = lines.join("\n");
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
