//! Similarity-based fallback for lines no rule matched exactly.
//!
//! - [`similarity`] - Levenshtein distance and example scoring
//! - [`resolver`] - rule selection and the final loosened match

pub mod resolver;
pub mod similarity;

pub use resolver::{select_best, FallbackResolver, RuleScore};
pub use similarity::{levenshtein_distance, rule_similarity};
