//! Fuzzy string similarity used by the relevance search.
//!
//! The score is deliberately simple: exact match, substring containment,
//! then a bag-of-characters overlap ratio. It is order-independent, so
//! anagrams score as high as near-substrings of similar length. That is a
//! documented property of the scorer, not something to correct here; the
//! search threshold and the flat containment score are tuned around it.

/// Flat score for one string containing the other.
pub const CONTAINMENT_SCORE: f64 = 0.8;

/// Similarity between two strings in `[0, 1]`.
///
/// Both inputs are normalized (trimmed, lowercased) first. An input that
/// is empty, or becomes empty after trimming, scores 0 against anything.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SCORE;
    }

    // Bag overlap: every character of `a` (multiset, no dedup) that occurs
    // anywhere in `b`, over the longer of the two lengths.
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let hits = a.chars().filter(|&c| b.contains(c)).count();
    hits as f64 / a_len.max(b_len) as f64
}
