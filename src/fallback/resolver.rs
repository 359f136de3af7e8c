//! Nearest-rule fallback.
//!
//! Runs only after exact matching found nothing. The text is normalized
//! aggressively, every rule in the loosened view is scored against its
//! examples, and the best-scoring rule's loosened pattern is tried on the
//! aggressive text.
//!
//! When the selected rule's pattern does not match, the result is still a
//! match: the rule's field names come back with empty values and the match
//! kind is [`MatchKind::LowConfidence`]. Callers that cannot use an
//! unconfirmed shape should check the kind rather than the fields.

use super::similarity::similarity_to_examples;
use crate::compiler::{CompiledRule, CompiledRuleset};
use crate::ir::{ExtractionResult, MatchKind, NoMatchReason};
use crate::matcher::{fields_from_captures, skeleton_fields};
use crate::normalizer::normalize_aggressive;
use tracing::debug;

/// Similarity of one rule in the loosened view.
#[derive(Debug, Clone, Copy)]
pub struct RuleScore<'r> {
    pub rule: &'r CompiledRule,
    pub similarity: f64,
}

/// Best score by `(similarity, priority)`; ties go to the earliest rule.
pub fn select_best<'r>(scores: &[RuleScore<'r>]) -> Option<RuleScore<'r>> {
    let mut best: Option<RuleScore<'r>> = None;
    for score in scores {
        let better = match best {
            None => true,
            Some(current) => {
                score.similarity > current.similarity
                    || (score.similarity == current.similarity
                        && score.rule.priority() > current.rule.priority())
            }
        };
        if better {
            best = Some(*score);
        }
    }
    best
}

#[derive(Debug, Clone, Copy)]
pub struct FallbackResolver<'r> {
    loosened: &'r CompiledRuleset,
    min_similarity: Option<f64>,
}

impl<'r> FallbackResolver<'r> {
    pub fn new(loosened: &'r CompiledRuleset) -> Self {
        Self {
            loosened,
            min_similarity: None,
        }
    }

    /// Reject best candidates scoring at or below `threshold`.
    pub fn with_min_similarity(mut self, threshold: Option<f64>) -> Self {
        self.min_similarity = threshold;
        self
    }

    /// Score every rule of the loosened view against aggressively normalized text.
    pub fn score_all(&self, aggressive_text: &str) -> Vec<RuleScore<'r>> {
        let text_chars: Vec<char> = aggressive_text.chars().collect();
        self.loosened
            .rules()
            .iter()
            .map(|rule| RuleScore {
                rule,
                similarity: similarity_to_examples(&text_chars, rule.example_chars()),
            })
            .collect()
    }

    /// Resolve a line that had no exact match. `original_text` is the raw line.
    pub fn resolve(&self, original_text: &str) -> ExtractionResult {
        let aggressive = normalize_aggressive(original_text);

        if self.loosened.is_empty() {
            debug!("no rule compiled in the loosened view");
            return ExtractionResult::unmatched(NoMatchReason::AllRulesInvalid);
        }

        let scores = self.score_all(&aggressive);
        let Some(best) = select_best(&scores) else {
            return ExtractionResult::unmatched(NoMatchReason::NoRulesMatched);
        };

        if let Some(threshold) = self.min_similarity {
            if best.similarity <= threshold {
                debug!(
                    text = %aggressive,
                    best_rule = best.rule.index(),
                    similarity = best.similarity,
                    threshold,
                    "best fallback candidate below similarity threshold"
                );
                log_score_table(&scores);
                return ExtractionResult::unmatched(NoMatchReason::NoRulesMatched);
            }
        }

        match best.rule.regex().captures(&aggressive) {
            Some(captures) => ExtractionResult::Matched {
                rule_index: best.rule.index(),
                kind: MatchKind::Fallback {
                    similarity: best.similarity,
                },
                fields: fields_from_captures(best.rule, &captures),
            },
            None => {
                debug!(
                    text = %aggressive,
                    rule = best.rule.index(),
                    pattern = best.rule.pattern(),
                    similarity = best.similarity,
                    "most similar rule did not match, returning field skeleton"
                );
                ExtractionResult::Matched {
                    rule_index: best.rule.index(),
                    kind: MatchKind::LowConfidence {
                        similarity: best.similarity,
                    },
                    fields: skeleton_fields(best.rule),
                }
            }
        }
    }
}

fn log_score_table(scores: &[RuleScore<'_>]) {
    for score in scores {
        debug!(
            rule = score.rule.index(),
            pattern = score.rule.pattern(),
            similarity = score.similarity,
            "fallback similarity"
        );
    }
}
