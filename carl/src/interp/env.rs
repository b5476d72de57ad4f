//! Rule store: named rewrite rules for one interpreter session

use crate::ast::{ExprTree, Span};
use std::collections::HashMap;

/// A named (pattern, replacement) pair
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pattern: ExprTree,
    replacement: ExprTree,
    /// Span of the defining statement
    pub span: Span,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        pattern: ExprTree,
        replacement: ExprTree,
        span: Span,
    ) -> Self {
        Rule {
            name: name.into(),
            pattern,
            replacement,
            span,
        }
    }

    pub fn pattern(&self) -> &ExprTree {
        &self.pattern
    }

    pub fn replacement(&self) -> &ExprTree {
        &self.replacement
    }

    /// Fresh copies of pattern and replacement for one application.
    /// The stored trees are never handed out by value.
    pub fn instantiate(&self) -> (ExprTree, ExprTree) {
        (self.pattern.clone(), self.replacement.clone())
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} = {}", self.name, self.pattern, self.replacement)
    }
}

/// Rules by name
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: HashMap<String, Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a rule, returning the one it replaced
    pub fn define(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.name.clone(), rule)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Rules sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.names().into_iter().filter_map(|name| self.rules.get(name))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
