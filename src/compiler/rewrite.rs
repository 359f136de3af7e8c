//! Pattern source rewrites applied before compilation.

use std::borrow::Cow;

/// Rewrite every escaped hyphen (`\-`) in a pattern source to `_`.
///
/// Aggressive normalization strips hyphens from log text, so a token like
/// `conn-id` reaches the loosened matcher as `connid` while rule authors who
/// escape their hyphens usually meant a separator. Rewriting to `_` lines the
/// pattern up with identifiers that kept their underscores.
///
/// Only real escapes are rewritten. In `\\-` the backslash is itself escaped,
/// so the hyphen there is a bare literal and is left alone.
pub fn rewrite_escaped_hyphens(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains("\\-") {
        return Cow::Borrowed(pattern);
    }

    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('-') => out.push('_'),
            Some(escaped) => {
                out.push('\\');
                out.push(escaped);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
