//! Rule system for HTML to Markdown conversion.
//!
//! Rules live in one ordered table. Adding a rule puts it in front of every
//! rule already registered, so rules added after the built-ins override them
//! for the tags they share. For any element at most one rule fires: the first
//! one, in priority order, whose filter matches.

mod builtin;
mod rule;

pub use builtin::builtin_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule, RuleError};

use indexmap::IndexMap;
use log::debug;

use crate::node::NodeRef;
use crate::options::ConvertOptions;

/// Ordered collection of named rules; index 0 has the highest priority.
pub struct RuleTable {
    rules: IndexMap<String, Rule>,
}

impl RuleTable {
    /// Create a table holding the built-in rules
    pub fn new() -> Self {
        let mut table = Self::empty();
        for (name, rule) in builtin_rules() {
            table.add(name, rule);
        }
        table
    }

    /// Create a table with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Register a rule with the highest priority.
    ///
    /// Names are unique: registering an existing name replaces that rule and
    /// moves it to the front.
    pub fn add(&mut self, name: &str, rule: Rule) {
        if self.rules.shift_insert(0, name.to_string(), rule).is_some() {
            debug!("replaced rule '{name}'");
        }
    }

    /// Find the first rule, in priority order, whose filter matches the node
    pub fn find_matching<'a>(
        &'a self,
        node: &NodeRef,
        options: &ConvertOptions,
    ) -> Option<(&'a str, &'a Rule)> {
        if !node.is_element() {
            return None;
        }
        self.rules
            .iter()
            .find(|(_, rule)| rule.filter.matches(node, options))
            .map(|(name, rule)| (name.as_str(), rule))
    }

    /// Rule names in priority order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}
