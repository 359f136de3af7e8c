//! Core data model shared by the compiler, matchers and the engine.
//!
//! [`Rule`] is the raw, user-authored record as it appears in a rule
//! collection. Everything derived from it (compiled regexes, field names) lives
//! in [`crate::compiler::CompiledRule`] so a `Rule` is never mutated after
//! loading.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Position of a rule in the original rule collection.
pub type RuleIndex = usize;

/// A user-supplied extraction rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Regex source with zero or more named capture groups.
    pub pattern: String,
    /// Higher wins when several rules match. Absent or `null` means 0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    /// Example log lines this rule was written for, used by fallback scoring.
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
}

impl Rule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            priority: 0,
            examples: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A field whose capture group did not participate in a match.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

/// How a matched result was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// A rule's pattern was found in the strictly normalized text.
    Exact,
    /// The most similar rule's loosened pattern was found in the aggressively
    /// normalized text.
    Fallback { similarity: f64 },
    /// The most similar rule did not match structurally. Fields are the rule's
    /// field names with empty values.
    LowConfidence { similarity: f64 },
}

impl MatchKind {
    /// Similarity score of the selected rule, `None` for exact matches.
    pub fn similarity(&self) -> Option<f64> {
        match self {
            MatchKind::Exact => None,
            MatchKind::Fallback { similarity } | MatchKind::LowConfidence { similarity } => {
                Some(*similarity)
            }
        }
    }

    pub fn is_low_confidence(&self) -> bool {
        matches!(self, MatchKind::LowConfidence { .. })
    }
}

/// Reason code for an unmatched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoMatchReason {
    /// No rule compiled in the view that was consulted.
    #[serde(rename = "all rules invalid")]
    AllRulesInvalid,
    /// Neither exact nor fallback matching produced a usable rule.
    #[serde(rename = "no rules matched")]
    NoRulesMatched,
}

impl NoMatchReason {
    pub fn code(&self) -> &'static str {
        match self {
            NoMatchReason::AllRulesInvalid => "all rules invalid",
            NoMatchReason::NoRulesMatched => "no rules matched",
        }
    }
}

impl fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of extracting one log line.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Matched {
        rule_index: RuleIndex,
        kind: MatchKind,
        fields: Vec<Field>,
    },
    Unmatched {
        reason: NoMatchReason,
    },
}

impl ExtractionResult {
    pub fn unmatched(reason: NoMatchReason) -> Self {
        ExtractionResult::Unmatched { reason }
    }

    /// Extracted fields; empty for unmatched lines.
    pub fn fields(&self) -> &[Field] {
        match self {
            ExtractionResult::Matched { fields, .. } => fields,
            ExtractionResult::Unmatched { .. } => &[],
        }
    }

    pub fn into_fields(self) -> Vec<Field> {
        match self {
            ExtractionResult::Matched { fields, .. } => fields,
            ExtractionResult::Unmatched { .. } => Vec::new(),
        }
    }

    pub fn no_match_reason(&self) -> Option<NoMatchReason> {
        match self {
            ExtractionResult::Matched { .. } => None,
            ExtractionResult::Unmatched { reason } => Some(*reason),
        }
    }

    pub fn match_kind(&self) -> Option<MatchKind> {
        match self {
            ExtractionResult::Matched { kind, .. } => Some(*kind),
            ExtractionResult::Unmatched { .. } => None,
        }
    }

    pub fn rule_index(&self) -> Option<RuleIndex> {
        match self {
            ExtractionResult::Matched { rule_index, .. } => Some(*rule_index),
            ExtractionResult::Unmatched { .. } => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, ExtractionResult::Matched { .. })
    }

    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields()
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}
