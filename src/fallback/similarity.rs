//! Edit-distance similarity between log text and rule examples.

use crate::compiler::CompiledRule;

/// Levenshtein distance counted in Unicode scalar values.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    levenshtein_chars(&a_chars, &b_chars)
}

fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the classic matrix.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &a_char) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity of `text` to the closest example of `rule`.
///
/// `1 - min_distance / max_len`, where `max_len` is the larger of the text
/// length and the longest example (1 when there are none), never below 1.
/// A rule without examples scores negative infinity.
pub fn rule_similarity(text: &str, rule: &CompiledRule) -> f64 {
    let text_chars: Vec<char> = text.chars().collect();
    similarity_to_examples(&text_chars, rule.example_chars())
}

/// Same as [`rule_similarity`] over text and examples already split into chars.
pub(crate) fn similarity_to_examples(text: &[char], examples: &[Vec<char>]) -> f64 {
    let mut min_distance: Option<usize> = None;
    let mut longest_example = 0usize;

    for example in examples {
        longest_example = longest_example.max(example.len());
        let distance = levenshtein_chars(text, example);
        min_distance = Some(min_distance.map_or(distance, |current| current.min(distance)));
    }

    let Some(min_distance) = min_distance else {
        return f64::NEG_INFINITY;
    };

    let max_len = text.len().max(longest_example).max(1);
    1.0 - min_distance as f64 / max_len as f64
}
