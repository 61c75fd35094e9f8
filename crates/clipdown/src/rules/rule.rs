//! A rule pairs a [`Filter`] with the replacement run on matching elements.

use std::error::Error;

use crate::node::NodeRef;
use crate::options::ConvertOptions;

/// Error raised by a replacement; aborts the conversion
pub type RuleError = Box<dyn Error + Send + Sync>;

/// `(node, children_output, options) -> markdown`
pub type ReplacementFn = Box<
    dyn Fn(&NodeRef, &str, &ConvertOptions) -> std::result::Result<String, RuleError>
        + Send
        + Sync,
>;

/// `(lowercase_tag, node, options) -> matches`
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &ConvertOptions) -> bool + Send + Sync>;

/// Selects the elements a rule handles.
pub enum Filter {
    TagName(String),
    /// Any tag of the set
    TagNames(Vec<String>),
    Predicate(PredicateFn),
}

impl Filter {
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &ConvertOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Tag names compare case-insensitively.
    pub fn matches(&self, node: &NodeRef, options: &ConvertOptions) -> bool {
        let tag = node.tag_name();
        match self {
            Filter::TagName(t) => tag.eq_ignore_ascii_case(t),
            Filter::TagNames(tags) => tags.iter().any(|t| tag.eq_ignore_ascii_case(t)),
            Filter::Predicate(f) => f(&tag.to_lowercase(), node, options),
        }
    }
}

/// Converts the elements its filter selects into Markdown.
pub struct Rule {
    pub filter: Filter,
    pub replacement: ReplacementFn,
}

impl Rule {
    /// A rule whose replacement cannot fail
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(
                move |node: &NodeRef, content: &str, options: &ConvertOptions| {
                    Ok(replacement(node, content, options))
                },
            ),
        }
    }

    /// Create a rule whose replacement can fail.
    ///
    /// A failure aborts the whole conversion; no partial output is returned.
    pub fn fallible<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConvertOptions) -> std::result::Result<String, RuleError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Shorthand for `Rule::new(Filter::tag(tag), ..)`
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    pub fn replace(
        &self,
        node: &NodeRef,
        content: &str,
        options: &ConvertOptions,
    ) -> std::result::Result<String, RuleError> {
        (self.replacement)(node, content, options)
    }
}
