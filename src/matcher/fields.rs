//! Field extraction from regex captures.

use crate::compiler::CompiledRule;
use crate::ir::Field;
use regex::Captures;

/// One field per named group, in declaration order.
///
/// Values are trimmed. A group that did not participate in the match yields an
/// empty value, never a missing entry.
pub fn fields_from_captures(rule: &CompiledRule, captures: &Captures<'_>) -> Vec<Field> {
    rule.field_names()
        .iter()
        .map(|name| {
            let value = captures
                .name(name)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            Field::new(name.as_str(), value)
        })
        .collect()
}

/// Every field name of `rule` with an empty value.
pub fn skeleton_fields(rule: &CompiledRule) -> Vec<Field> {
    rule.field_names()
        .iter()
        .map(|name| Field::empty(name.as_str()))
        .collect()
}
