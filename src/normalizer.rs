//! Log text normalization.
//!
//! Two levels are provided:
//! - [`NormalizeLevel::Strict`] trims whitespace and zero-width marks from both
//!   ends. This is what exact matching sees.
//! - [`NormalizeLevel::Aggressive`] additionally drops every character that is
//!   not a word character, whitespace or `:`. Fallback similarity scoring and
//!   the loosened match run against this form.
//!
//! Both levels are idempotent.

use std::borrow::Cow;

/// Normalization strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeLevel {
    #[default]
    Strict,
    Aggressive,
}

impl From<bool> for NormalizeLevel {
    fn from(aggressive: bool) -> Self {
        if aggressive {
            NormalizeLevel::Aggressive
        } else {
            NormalizeLevel::Strict
        }
    }
}

/// Zero-width characters that editors and terminals leave around log lines.
fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{2060}')
}

fn is_edge_noise(c: char) -> bool {
    c.is_whitespace() || is_zero_width(c)
}

/// Word characters, whitespace and colons survive aggressive normalization.
fn is_kept_aggressive(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || c == ':'
}

/// Normalize `text` at the given level.
///
/// # Examples
///
/// ```rust
/// use logfield_engine::normalizer::{normalize, NormalizeLevel};
///
/// assert_eq!(normalize("\u{FEFF}  INFO: ok \n", NormalizeLevel::Strict), "INFO: ok");
/// assert_eq!(normalize("[conn-42] 99%", NormalizeLevel::Aggressive), "conn42 99");
/// ```
pub fn normalize(text: &str, level: NormalizeLevel) -> Cow<'_, str> {
    let trimmed = text.trim_matches(is_edge_noise);
    match level {
        NormalizeLevel::Strict => Cow::Borrowed(trimmed),
        NormalizeLevel::Aggressive => {
            if trimmed.chars().all(is_kept_aggressive) {
                return Cow::Borrowed(trimmed);
            }
            let filtered: String = trimmed.chars().filter(|&c| is_kept_aggressive(c)).collect();
            // Removing punctuation can expose whitespace at the edges ("# x").
            let retrimmed = filtered.trim_matches(is_edge_noise);
            if retrimmed.len() == filtered.len() {
                Cow::Owned(filtered)
            } else {
                Cow::Owned(retrimmed.to_string())
            }
        }
    }
}

/// Shorthand for [`NormalizeLevel::Strict`].
pub fn normalize_strict(text: &str) -> Cow<'_, str> {
    normalize(text, NormalizeLevel::Strict)
}

/// Shorthand for [`NormalizeLevel::Aggressive`].
pub fn normalize_aggressive(text: &str) -> Cow<'_, str> {
    normalize(text, NormalizeLevel::Aggressive)
}
