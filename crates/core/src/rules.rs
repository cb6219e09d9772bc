//! Ordered rule tables.
//!
//! Every decision the pipeline makes from text goes through a list of
//! `(id, regex)` rules evaluated top to bottom. The first rule that matches
//! wins, so the order of a table is part of its behavior.

use regex::Regex;

/// A named pattern in an ordered rule table.
#[derive(Debug)]
pub struct Rule {
    /// Stable identifier, reported in classifications and debug logs.
    pub id: &'static str,
    pub pattern: Regex,
}

impl Rule {
    /// Compile a rule. Patterns are compile-time constants, so a bad one is a
    /// programming error.
    pub fn new(id: &'static str, pattern: &str) -> Self {
        Self {
            id,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Return the first rule in `rules` that matches `text`.
#[must_use]
pub fn first_match<'a>(rules: &'a [Rule], text: &str) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_respects_order() {
        let rules = vec![Rule::new("a", r"\bfoo\b"), Rule::new("b", r"\bfoo\b|\bbar\b")];
        assert_eq!(first_match(&rules, "foo bar").map(|r| r.id), Some("a"));
        assert_eq!(first_match(&rules, "bar").map(|r| r.id), Some("b"));
        assert!(first_match(&rules, "baz").is_none());
    }
}
