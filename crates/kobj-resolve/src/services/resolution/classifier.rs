//! Routing between exact and fuzzy membership tests.

use std::sync::{Arc, LazyLock};

use kobj::models::{Annotation, AnnotationSet, KnowledgeObject};
use regex::Regex;

use super::exact::ExactMatcher;
use super::fuzzy::FuzzyMatcher;
use crate::services::similarity::SimilarityBackend;

/// Labels shorter than this (spaces removed) only match exactly.
const SHORT_LABEL_CHARS: usize = 4;

/// A standalone number such as "3" or "3,000", bounded by spaces.
static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" \d+(?:,\d+)? ").expect("numeric token pattern should compile")
});

/// True if any word's normalized form is a standalone number.
pub fn has_numeric_value(annotation: &Annotation) -> bool {
    annotation
        .words
        .iter()
        .any(|w| NUMERIC_TOKEN.is_match(&format!(" {} ", w.normalized_form)))
}

/// True if the label has fewer than four characters once spaces are removed.
///
/// Annotations without words count as short so they never reach fuzzy scoring.
pub fn is_short_label(annotation: &Annotation) -> bool {
    annotation.words.is_empty()
        || annotation.label.chars().filter(|c| *c != ' ').count() < SHORT_LABEL_CHARS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Exact,
    Fuzzy,
}

/// Decides whether a candidate annotation belongs to a knowledge object.
#[derive(Debug, Clone)]
pub struct MembershipClassifier {
    exact: ExactMatcher,
    fuzzy: FuzzyMatcher,
}

impl MembershipClassifier {
    pub fn new(backend: Arc<dyn SimilarityBackend>, threshold: u8) -> Self {
        Self {
            exact: ExactMatcher::new(),
            fuzzy: FuzzyMatcher::new(backend, threshold),
        }
    }

    pub fn fuzzy(&self) -> &FuzzyMatcher {
        &self.fuzzy
    }

    /// Numbers and short labels are too ambiguous for similarity scoring.
    pub fn strategy_for(&self, candidate: &Annotation) -> MatchStrategy {
        if has_numeric_value(candidate) || is_short_label(candidate) {
            MatchStrategy::Exact
        } else {
            MatchStrategy::Fuzzy
        }
    }

    pub fn is_member(
        &self,
        object: &KnowledgeObject,
        candidate: &Annotation,
        set: &AnnotationSet,
    ) -> bool {
        match self.strategy_for(candidate) {
            MatchStrategy::Exact => self.exact.matches(object, candidate, set),
            MatchStrategy::Fuzzy => self.fuzzy.matches(object, candidate, set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::similarity::BestMatch;
    use kobj::models::{AnnotationId, KnowledgeObjectId, Word};

    /// Claims a perfect score for anything.
    struct AlwaysSimilar;

    impl SimilarityBackend for AlwaysSimilar {
        fn backend_id(&self) -> &str {
            "always"
        }

        fn best_match<'a>(&self, _query: &str, candidates: &'a [String]) -> Option<BestMatch<'a>> {
            candidates.first().map(|c| BestMatch {
                candidate: c.as_str(),
                score: 100,
            })
        }
    }

    fn annotation(id: u64, label: &str, first_index: usize) -> Annotation {
        let words = label
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| Word::new(first_index + i, w, w.to_lowercase()))
            .collect();
        Annotation::new(id, label, words)
    }

    fn classifier() -> MembershipClassifier {
        MembershipClassifier::new(Arc::new(AlwaysSimilar), 85)
    }

    #[test]
    fn test_numeric_detection() {
        assert!(has_numeric_value(&annotation(1, "12", 0)));
        assert!(has_numeric_value(&annotation(1, "revenue 3,000 dollars", 0)));
        assert!(!has_numeric_value(&annotation(1, "3a", 0)));
        assert!(!has_numeric_value(&annotation(1, "Route", 0)));
        assert!(!has_numeric_value(&Annotation::new(1, "", Vec::new())));
    }

    #[test]
    fn test_short_label_ignores_spaces() {
        assert!(is_short_label(&annotation(1, "EU", 0)));
        assert!(is_short_label(&annotation(1, "U S A", 0)));
        assert!(!is_short_label(&annotation(1, "NATO", 0)));
        assert!(is_short_label(&Annotation::new(1, "Nothing", Vec::new())));
    }

    #[test]
    fn test_strategy_routing() {
        let classifier = classifier();
        assert_eq!(classifier.strategy_for(&annotation(1, "12", 0)), MatchStrategy::Exact);
        assert_eq!(classifier.strategy_for(&annotation(1, "EU", 0)), MatchStrategy::Exact);
        assert_eq!(
            classifier.strategy_for(&annotation(1, "Building 42", 0)),
            MatchStrategy::Exact
        );
        assert_eq!(
            classifier.strategy_for(&annotation(1, "Germany", 0)),
            MatchStrategy::Fuzzy
        );
    }

    #[test]
    fn test_short_label_never_matches_on_score_alone() {
        let mut set = AnnotationSet::from_annotations(vec![
            annotation(1, "European Union", 0),
            annotation(2, "EU", 10),
            annotation(3, "12", 20),
            annotation(4, "Europe", 30),
        ])
        .unwrap();
        let object = KnowledgeObject::new(KnowledgeObjectId(1), AnnotationId(1), &mut set).unwrap();
        let classifier = classifier();

        assert!(!classifier.is_member(&object, set.get(AnnotationId(2)).unwrap(), &set));
        assert!(!classifier.is_member(&object, set.get(AnnotationId(3)).unwrap(), &set));
        assert!(classifier.is_member(&object, set.get(AnnotationId(4)).unwrap(), &set));
    }
}
