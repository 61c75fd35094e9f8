//! Conversion options.
//!
//! The style enums keep the usual turndown variants, but only the
//! ATX / fenced / inline-link combination is produced by this converter.
//! [`ConvertOptions::validate`] rejects the others up front.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ClipdownError, Result};

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
    /// Setext-style headings (underlined). Not supported.
    Setext,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeBlockStyle {
    /// Use fenced code blocks (```)
    #[default]
    Fenced,
    /// Indented code blocks (4 spaces). Not supported.
    Indented,
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkStyle {
    /// Use inline links [text](url)
    #[default]
    #[serde(rename = "inlineLink", alias = "inlined")]
    Inlined,
    /// Reference links [text][ref]. Not supported.
    #[serde(rename = "referenced")]
    Referenced,
}

impl FromStr for HeadingStyle {
    type Err = ClipdownError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "atx" => Ok(HeadingStyle::Atx),
            "setext" => Ok(HeadingStyle::Setext),
            other => Err(ClipdownError::Configuration(format!(
                "unknown heading style '{other}'"
            ))),
        }
    }
}

impl FromStr for CodeBlockStyle {
    type Err = ClipdownError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fenced" => Ok(CodeBlockStyle::Fenced),
            "indented" => Ok(CodeBlockStyle::Indented),
            other => Err(ClipdownError::Configuration(format!(
                "unknown code block style '{other}'"
            ))),
        }
    }
}

impl FromStr for LinkStyle {
    type Err = ClipdownError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "inlinelink" | "inlined" | "inline" => Ok(LinkStyle::Inlined),
            "referenced" => Ok(LinkStyle::Referenced),
            other => Err(ClipdownError::Configuration(format!(
                "unknown link style '{other}'"
            ))),
        }
    }
}

impl fmt::Display for HeadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeadingStyle::Atx => "atx",
            HeadingStyle::Setext => "setext",
        })
    }
}

impl fmt::Display for CodeBlockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodeBlockStyle::Fenced => "fenced",
            CodeBlockStyle::Indented => "indented",
        })
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkStyle::Inlined => "inlineLink",
            LinkStyle::Referenced => "referenced",
        })
    }
}

/// Default element nesting limit for the walker
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options for a [`crate::Converter`], fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Heading style (only ATX is supported)
    pub heading_style: HeadingStyle,

    /// Code block style (only fenced is supported)
    pub code_block_style: CodeBlockStyle,

    /// Emphasis delimiter: `_` or `*`
    pub em_delimiter: char,

    /// Strong delimiter: `**` or `__`
    pub strong_delimiter: String,

    /// Link style (only inline links are supported)
    pub link_style: LinkStyle,

    /// Token emitted for `<br>`
    pub br: String,

    /// Token emitted for `<hr>`
    pub hr: String,

    /// Maximum element nesting depth; `None` disables the check
    pub max_depth: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::Inlined,
            br: "\n".to_string(),
            hr: "---".to_string(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ConvertOptions {
    /// Reject option values the converter cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.heading_style != HeadingStyle::Atx {
            return Err(unsupported("headingStyle", &self.heading_style));
        }
        if self.code_block_style != CodeBlockStyle::Fenced {
            return Err(unsupported("codeBlockStyle", &self.code_block_style));
        }
        if self.link_style != LinkStyle::Inlined {
            return Err(unsupported("linkStyle", &self.link_style));
        }
        if !matches!(self.em_delimiter, '_' | '*') {
            return Err(unsupported("emDelimiter", &self.em_delimiter));
        }
        if !matches!(self.strong_delimiter.as_str(), "**" | "__") {
            return Err(unsupported("strongDelimiter", &self.strong_delimiter));
        }
        if self.max_depth == Some(0) {
            return Err(ClipdownError::Configuration(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn unsupported(option: &str, value: &dyn fmt::Display) -> ClipdownError {
    ClipdownError::Configuration(format!("unsupported {option} value '{value}'"))
}
