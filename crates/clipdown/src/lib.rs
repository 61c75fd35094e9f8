//! # clipdown
//!
//! Convert selected HTML fragments to canonical Markdown.
//!
//! A conversion runs three stages over an owned node tree:
//!
//! 1. [`sanitize`] drops scripts, styles and empty containers,
//! 2. [`Walker`] applies the first matching [`Rule`] bottom-up,
//! 3. [`normalize`] canonicalizes blank lines and whitespace.
//!
//! Rules live in a [`RuleTable`] owned by the [`Converter`]. Custom rules
//! are consulted before the built-in ones, the most recently added first.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use clipdown::Converter;
//!
//! let converter = Converter::new();
//! let result = converter.convert("<h1>Hello</h1><p>World</p>").unwrap();
//! assert_eq!(result.markdown(), "# Hello\n\nWorld");
//! ```
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use clipdown::{Converter, Node};
//!
//! let mut em = Node::element("em");
//! em.add_child(Node::text("quiet"));
//!
//! let markdown = Converter::new().convert_node(&em).unwrap();
//! assert_eq!(markdown, "_quiet_");
//! ```
//!
//! ## Custom rules
//!
//! ```rust
//! use clipdown::{Converter, Rule};
//!
//! let mut converter = Converter::new();
//! converter.add_rule("mark", Rule::for_tag("mark", |_, content, _| format!("=={content}==")));
//!
//! let result = converter.convert("<p><mark>hot</mark></p>").unwrap();
//! assert_eq!(result.markdown(), "==hot==");
//! ```

pub mod document;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod normalize;
mod options;
mod result;
mod rules;
mod sanitize;
mod selection;
mod service;
pub mod utilities;
pub mod validate;
mod walker;

pub use document::{render_append_entry, render_document, suggest_filename};
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeRef, NodeType};
pub use normalize::normalize;
pub use options::{CodeBlockStyle, ConvertOptions, HeadingStyle, LinkStyle, DEFAULT_MAX_DEPTH};
pub use result::{ConversionMetadata, ConversionResult};
pub use rules::{builtin_rules, Filter, PredicateFn, ReplacementFn, Rule, RuleError, RuleTable};
pub use sanitize::sanitize;
pub use selection::{SelectedContent, SelectionMetadata};
pub use service::Converter;
pub use validate::{validate_filename, validate_result, ValidationLimits, ValidationWarning};
pub use walker::Walker;

/// Error type for clipdown operations
#[derive(Debug, thiserror::Error)]
pub enum ClipdownError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Structure too deep: more than {limit} nested elements")]
    StructureTooDeep { limit: usize },

    #[error("Rule '{name}' failed: {source}")]
    Rule {
        name: String,
        #[source]
        source: RuleError,
    },
}

pub type Result<T> = std::result::Result<T, ClipdownError>;
