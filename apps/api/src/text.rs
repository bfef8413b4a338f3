//! Shared keyword primitives used by every analyzer and generator.
//!
//! All matching in Applywise is dictionary-driven: a term "appears" in a text
//! when it occurs on word boundaries of the lowercased text. Terms that start
//! or end with punctuation (`.net`, `c++`, `c#`) skip the boundary check on
//! that side.

use once_cell::sync::Lazy;
use regex::Regex;

/// Word-ish tokens: `node.js`, `ci/cd`, `scikit-learn` stay whole.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+(?:[.\-/+#]\w+)*\b").expect("token regex is valid"));

/// Returns true if `term` occurs in `haystack_lower` on word boundaries.
///
/// Both arguments are expected to be lowercase already.
pub fn contains_term(haystack_lower: &str, term: &str) -> bool {
    count_term(haystack_lower, term) > 0
}

/// Counts non-overlapping boundary matches of `term` in `haystack_lower`.
pub fn count_term(haystack_lower: &str, term: &str) -> usize {
    find_term(haystack_lower, term).count()
}

/// Byte offsets of each boundary match of `term` in `haystack_lower`.
pub fn find_term<'a>(haystack_lower: &'a str, term: &'a str) -> impl Iterator<Item = usize> + 'a {
    let check_start = term.chars().next().is_some_and(|c| c.is_alphanumeric());
    let check_end = term.chars().next_back().is_some_and(|c| c.is_alphanumeric());

    haystack_lower
        .match_indices(term)
        .filter(move |(start, matched)| {
            let end = start + matched.len();
            let before_ok = !check_start
                || haystack_lower[..*start]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = !check_end
                || haystack_lower[end..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric());
            !term.is_empty() && before_ok && after_ok
        })
        .map(|(start, _)| start)
}

/// Splits text into keyword-shaped tokens, preserving the original casing.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Joins items the way a sentence would: "a", "a and b", "a, b, and c".
pub fn join_natural<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Lowercases only the first character, so a phrase can continue a sentence.
pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
