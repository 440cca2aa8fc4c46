//! Pattern parsing and matching for obfuscated-word lookups.
//!
//! A pattern is what the user types: known letters plus `_` for each unknown
//! letter (`dr_w_ng`). Matching is a plain character-by-character comparison,
//! so there is nothing to escape and no input can make it fail.
//!
//! - No wildcard: prefix match (`dr` finds `draw`, `drawn`, ...). With
//!   `exact_length` the candidate must also be exactly as long as the pattern.
//! - At least one wildcard: whole-word match. The pattern's own length fixes
//!   the candidate length, so `exact_length` has no further effect.
//!
//! Lengths are counted in `char`s, not bytes.

use std::cmp::Ordering;

/// Character that stands for exactly one unknown letter.
pub const WILDCARD: char = '_';

/// A parsed, lowercased query pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Empty input. Matches nothing; browsing everything is the caller's job.
    Empty,
    /// Literal prefix.
    Prefix(String),
    /// Fixed-length template; `None` slots are wildcards.
    Template(Vec<Option<char>>),
}

impl Pattern {
    pub fn parse(input: &str) -> Self {
        if input.is_empty() {
            return Self::Empty;
        }

        let lowered = input.to_lowercase();
        if lowered.contains(WILDCARD) {
            Self::Template(
                lowered
                    .chars()
                    .map(|c| if c == WILDCARD { None } else { Some(c) })
                    .collect(),
            )
        } else {
            Self::Prefix(lowered)
        }
    }

    pub fn has_wildcard(&self) -> bool {
        matches!(self, Self::Template(_))
    }

    /// Length of the pattern in characters.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Prefix(prefix) => prefix.chars().count(),
            Self::Template(slots) => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Test a lowercase vocabulary word against the pattern.
    pub fn matches(&self, word: &str, exact_length: bool) -> bool {
        match self {
            Self::Empty => false,
            Self::Prefix(prefix) => {
                word.starts_with(prefix.as_str())
                    && (!exact_length || word.chars().count() == prefix.chars().count())
            }
            Self::Template(slots) => {
                let mut chars = word.chars();
                for slot in slots {
                    match (chars.next(), slot) {
                        (None, _) => return false,
                        (Some(c), Some(expected)) if c != *expected => return false,
                        _ => {}
                    }
                }
                chars.next().is_none()
            }
        }
    }
}

/// Presentation order for results: shorter words first, ties broken lexicographically.
pub fn by_length_then_alpha(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Sort words in place into presentation order.
pub fn sort_words(words: &mut [String]) {
    words.sort_by(|a, b| by_length_then_alpha(a, b));
}

/// Filter an already-ordered word sequence, keeping its order.
pub fn filter_ordered<'a, I>(words: I, pattern: &Pattern, exact_length: bool) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    if pattern.is_empty() {
        return Vec::new();
    }
    words
        .into_iter()
        .filter(|w| pattern.matches(w, exact_length))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        sort_words(&mut v);
        v
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(Pattern::parse(""), Pattern::Empty);
        assert_eq!(Pattern::parse("DR"), Pattern::Prefix("dr".to_string()));
        assert_eq!(
            Pattern::parse("c_T"),
            Pattern::Template(vec![Some('c'), None, Some('t')])
        );
    }

    #[test]
    fn test_prefix_match() {
        let p = Pattern::parse("dr");
        assert!(p.matches("draw", false));
        assert!(p.matches("dr", false));
        assert!(!p.matches("d", false));
        assert!(!p.matches("adraw", false));
    }

    #[test]
    fn test_prefix_exact_length() {
        let p = Pattern::parse("dr");
        assert!(p.matches("dr", true));
        assert!(!p.matches("draw", true));
    }

    #[test]
    fn test_template_is_length_exact_regardless_of_flag() {
        let p = Pattern::parse("c_t");
        for exact in [false, true] {
            assert!(p.matches("cat", exact));
            assert!(p.matches("cot", exact));
            assert!(!p.matches("cart", exact));
            assert!(!p.matches("ct", exact));
        }
    }

    #[test]
    fn test_all_wildcards_match_by_length() {
        let p = Pattern::parse("___");
        assert!(p.matches("abc", false));
        assert!(!p.matches("ab", false));
        assert!(!p.matches("abcd", false));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let words = vocab(&["a.c", "abc", "a*", "(x)", "[y]"]);
        assert_eq!(filter_ordered(&words, &Pattern::parse("a."), false), vec!["a.c"]);
        assert_eq!(filter_ordered(&words, &Pattern::parse("a*"), false), vec!["a*"]);
        assert_eq!(filter_ordered(&words, &Pattern::parse("(_)"), false), vec!["(x)"]);
        assert!(filter_ordered(&words, &Pattern::parse("["), false).len() == 1);
        assert!(filter_ordered(&words, &Pattern::parse("\\"), false).is_empty());
    }

    #[test]
    fn test_multibyte_lengths_count_chars() {
        let p = Pattern::parse("caf_");
        assert!(p.matches("café", false));
        assert!(Pattern::parse("ü").matches("ü", true));
    }

    #[test]
    fn test_ordering() {
        let words = vocab(&["drawn", "dr", "draw", "drab"]);
        assert_eq!(words, vec!["dr", "drab", "draw", "drawn"]);
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let words = vocab(&["a", "b"]);
        assert!(filter_ordered(&words, &Pattern::parse(""), false).is_empty());
    }
}
