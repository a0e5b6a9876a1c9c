//! String similarity scoring for fuzzy membership.
//!
//! Provides a `SimilarityBackend` trait for pluggable scorers and a built-in
//! `TokenSetScorer` that compares strings by their token sets, so word order
//! and repeated or extra words weigh little against shared vocabulary.

use std::collections::BTreeSet;

/// Best candidate for a query and its similarity score (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch<'a> {
    pub candidate: &'a str,
    pub score: u8,
}

/// Trait for pluggable similarity backends.
///
/// Implementations must be deterministic: equal inputs give equal scores.
pub trait SimilarityBackend: Send + Sync {
    /// Human-readable backend identifier (e.g. "token_set").
    fn backend_id(&self) -> &str;

    /// Return the highest-scoring candidate, or `None` when there are no candidates.
    fn best_match<'a>(&self, query: &str, candidates: &'a [String]) -> Option<BestMatch<'a>>;
}

// ============================================================================
// TokenSetScorer: built-in token-set ratio backend
// ============================================================================

/// Token-set ratio scorer.
///
/// Both strings are lower-cased and stripped of punctuation, split into token
/// sets, and compared as "shared tokens" versus "shared tokens plus the rest".
/// A string whose tokens are a subset of the other's scores 100.
pub struct TokenSetScorer;

impl TokenSetScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokenSetScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityBackend for TokenSetScorer {
    fn backend_id(&self) -> &str {
        "token_set"
    }

    fn best_match<'a>(&self, query: &str, candidates: &'a [String]) -> Option<BestMatch<'a>> {
        let mut best: Option<BestMatch<'a>> = None;
        for candidate in candidates {
            let score = token_set_ratio(query, candidate);
            if best.map_or(true, |b| score > b.score) {
                best = Some(BestMatch {
                    candidate: candidate.as_str(),
                    score,
                });
            }
        }
        best
    }
}

/// Token-set similarity of two strings, 0-100.
///
/// Each pairwise comparison is a Levenshtein similarity normalized by the
/// longer string, so appended words cost more than under an LCS ratio.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = full_process(a);
    let b = full_process(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sorted_sect = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    let combined_ab = format!("{} {}", sorted_sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sorted_sect, diff_ba).trim().to_string();

    [
        ratio(&sorted_sect, &combined_ab),
        ratio(&sorted_sect, &combined_ba),
        ratio(&combined_ab, &combined_ba),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Lower-case, replace everything but letters, digits and `_` with spaces, trim.
fn full_process(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// `1 - levenshtein / max(len)`, scaled to 0-100.
fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(token_set_ratio("european union", "european union"), 100);
    }

    #[test]
    fn test_token_subset_scores_100() {
        assert_eq!(token_set_ratio("microsoft", "microsoft corporation"), 100);
        assert_eq!(token_set_ratio("microsoft corporation", "microsoft"), 100);
    }

    #[test]
    fn test_order_case_and_punctuation_ignored() {
        assert_eq!(token_set_ratio("Union, European", "european union."), 100);
    }

    #[test]
    fn test_pairwise_ratio_is_levenshtein_based() {
        // best pair is "deutsche" against "deutsche bank": 5 edits over 13 chars
        assert_eq!(token_set_ratio("deutsche bank", "deutsche banking group"), 62);
    }

    #[test]
    fn test_disjoint_tokens_score_low() {
        assert!(token_set_ratio("apple", "zebra") < 50);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(token_set_ratio("", "anything"), 0);
        assert_eq!(token_set_ratio("...", "anything"), 0);
    }

    #[test]
    fn test_best_match_picks_highest_score() {
        let candidates = vec!["zebra crossing".to_string(), "new york".to_string()];
        let best = TokenSetScorer::new()
            .best_match("new york city", &candidates)
            .unwrap();
        assert_eq!(best.candidate, "new york");
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_best_match_without_candidates() {
        assert!(TokenSetScorer::new().best_match("query", &[]).is_none());
    }

    #[test]
    fn test_backend_id() {
        assert_eq!(TokenSetScorer::new().backend_id(), "token_set");
    }
}
