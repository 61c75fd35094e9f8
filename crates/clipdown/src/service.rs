//! Converter - the main entry point for HTML to Markdown conversion.

#[cfg(feature = "html")]
use chrono::Utc;
#[cfg(feature = "html")]
use log::debug;

use crate::node::Node;
use crate::normalize::normalize;
use crate::options::ConvertOptions;
#[cfg(feature = "html")]
use crate::result::ConversionResult;
use crate::rules::{Rule, RuleTable};
use crate::sanitize::sanitize;
#[cfg(feature = "html")]
use crate::selection::SelectedContent;
use crate::walker::Walker;
use crate::Result;
#[cfg(feature = "html")]
use crate::ClipdownError;

/// Converts HTML fragments to Markdown.
///
/// Options are fixed at construction. The rule table may be extended with
/// [`add_rule`](Self::add_rule) before converting; conversions only read it,
/// so a `&Converter` can be shared between threads.
pub struct Converter {
    options: ConvertOptions,
    rules: RuleTable,
}

impl Converter {
    /// Create a converter with default options and the built-in rules
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            rules: RuleTable::new(),
        }
    }

    /// Create a converter with custom options.
    ///
    /// Fails with [`ClipdownError::Configuration`] when an option holds an
    /// unsupported value.
    pub fn with_options(options: ConvertOptions) -> Result<Self> {
        Self::with_rules(options, RuleTable::new())
    }

    /// Create a converter with custom options and a prepared rule table
    pub fn with_rules(options: ConvertOptions, rules: RuleTable) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, rules })
    }

    /// Add a rule ahead of every rule registered so far
    pub fn add_rule(&mut self, name: &str, rule: Rule) -> &mut Self {
        self.rules.add(name, rule);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Convert an already parsed node tree.
    ///
    /// The tree is sanitized into a copy, walked, then normalized. `root`
    /// itself is never modified. Both the sanitizer and the walker enforce
    /// [`ConvertOptions::max_depth`].
    pub fn convert_node(&self, root: &Node) -> Result<String> {
        let clean = sanitize(root, self.options.max_depth)?;
        let raw = Walker::new(&self.rules, &self.options).process(&clean)?;
        Ok(normalize(&raw))
    }

    /// Convert an HTML fragment.
    ///
    /// Empty or whitespace-only input fails with
    /// [`ClipdownError::InvalidInput`] before any parsing happens.
    #[cfg(feature = "html")]
    pub fn convert(&self, html: &str) -> Result<ConversionResult> {
        if html.trim().is_empty() {
            return Err(ClipdownError::InvalidInput(
                "HTML input is empty".to_string(),
            ));
        }

        let root = crate::html::parse_html(html, self.options.max_depth)?;
        let markdown = self.convert_node(&root)?;
        let result = ConversionResult::new(markdown, html, Utc::now());

        debug!(
            "converted {} chars of HTML to {} chars of Markdown",
            result.metadata().original_length(),
            result.metadata().markdown_length()
        );
        Ok(result)
    }

    /// Convert the HTML of a page selection
    #[cfg(feature = "html")]
    pub fn convert_selection(&self, selection: &SelectedContent) -> Result<ConversionResult> {
        debug!("converting selection from {}", selection.metadata.url);
        self.convert(&selection.html)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
