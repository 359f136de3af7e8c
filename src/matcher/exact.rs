//! Exact matching against the strictly normalized text.

use super::fields::fields_from_captures;
use crate::compiler::{CompiledRule, CompiledRuleset};
use crate::ir::Field;
use regex::Captures;

/// The winning rule of an exact match together with its captures.
#[derive(Debug)]
pub struct RuleMatch<'r, 't> {
    pub rule: &'r CompiledRule,
    pub captures: Captures<'t>,
}

impl RuleMatch<'_, '_> {
    pub fn fields(&self) -> Vec<Field> {
        fields_from_captures(self.rule, &self.captures)
    }
}

/// Searches every compiled rule and picks the highest-priority hit.
///
/// Search is unanchored: a rule is a candidate when its pattern occurs
/// anywhere in the text. Among candidates the largest `priority` wins and
/// equal priorities resolve to the rule that comes first in the collection.
#[derive(Debug, Clone, Copy)]
pub struct ExactMatcher<'r> {
    ruleset: &'r CompiledRuleset,
}

impl<'r> ExactMatcher<'r> {
    pub fn new(ruleset: &'r CompiledRuleset) -> Self {
        Self { ruleset }
    }

    /// The rule that wins on `text`, without computing captures.
    pub fn best_rule(&self, text: &str) -> Option<&'r CompiledRule> {
        let mut best: Option<&'r CompiledRule> = None;
        for rule in self.ruleset.rules() {
            // Later rules only win with a strictly higher priority.
            if best.is_some_and(|current| rule.priority() <= current.priority()) {
                continue;
            }
            if rule.regex().is_match(text) {
                best = Some(rule);
            }
        }
        best
    }

    /// The winning rule and its captures on `text`.
    pub fn find_best<'t>(&self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        let rule = self.best_rule(text)?;
        let captures = rule.regex().captures(text)?;
        Some(RuleMatch { rule, captures })
    }

    /// Every rule whose pattern occurs in `text`, in collection order.
    pub fn candidates(&self, text: &str) -> Vec<&'r CompiledRule> {
        self.ruleset
            .rules()
            .iter()
            .filter(|rule| rule.regex().is_match(text))
            .collect()
    }
}
