//! Fuzzy membership by similarity score against the object's normalized labels.

use std::sync::Arc;

use kobj::models::{Annotation, AnnotationSet, KnowledgeObject};

use crate::services::similarity::SimilarityBackend;

/// Decides membership by similarity score, delegating scoring to a backend.
#[derive(Clone)]
pub struct FuzzyMatcher {
    backend: Arc<dyn SimilarityBackend>,
    threshold: u8,
}

impl FuzzyMatcher {
    pub fn new(backend: Arc<dyn SimilarityBackend>, threshold: u8) -> Self {
        Self { backend, threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn backend_id(&self) -> &str {
        self.backend.backend_id()
    }

    /// True if the candidate's normalized label, or any synonym's, scores at
    /// least the threshold against the object's normalized labels.
    pub fn matches(
        &self,
        object: &KnowledgeObject,
        candidate: &Annotation,
        set: &AnnotationSet,
    ) -> bool {
        let labels: Vec<String> = object
            .labels_normalized()
            .iter()
            .map(|l| l.to_lowercase())
            .collect();

        if self.clears_threshold(&candidate.normalized_label(), &labels) {
            return true;
        }

        set.synonyms_of(candidate)
            .any(|synonym| self.clears_threshold(&synonym.normalized_label(), &labels))
    }

    fn clears_threshold(&self, query: &str, labels: &[String]) -> bool {
        match self.backend.best_match(query, labels) {
            Some(best) => {
                tracing::trace!(
                    "{:?} best match {:?} scored {} (threshold {})",
                    query,
                    best.candidate,
                    best.score,
                    self.threshold
                );
                best.score >= self.threshold
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("backend", &self.backend.backend_id())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::similarity::BestMatch;
    use kobj::models::{AnnotationId, KnowledgeObjectId, Word};

    /// Scores every (query, candidate) pair with a fixed table; unknown pairs score 0.
    struct TableScorer(Vec<(&'static str, &'static str, u8)>);

    impl SimilarityBackend for TableScorer {
        fn backend_id(&self) -> &str {
            "table"
        }

        fn best_match<'a>(&self, query: &str, candidates: &'a [String]) -> Option<BestMatch<'a>> {
            candidates
                .iter()
                .map(|c| {
                    let score = self
                        .0
                        .iter()
                        .find(|(q, l, _)| *q == query && *l == c.as_str())
                        .map(|(_, _, s)| *s)
                        .unwrap_or(0);
                    BestMatch {
                        candidate: c.as_str(),
                        score,
                    }
                })
                .max_by_key(|m| m.score)
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

    fn matcher(scores: Vec<(&'static str, &'static str, u8)>, threshold: u8) -> FuzzyMatcher {
        FuzzyMatcher::new(Arc::new(TableScorer(scores)), threshold)
    }

    fn fixture() -> (KnowledgeObject, AnnotationSet) {
        let mut set = AnnotationSet::from_annotations(vec![
            annotation(1, "Siemens", 0),
            annotation(2, "Siemens Group", 10),
            annotation(3, "Siemens AG", 20).with_synonyms([2]),
        ])
        .unwrap();
        let object = KnowledgeObject::new(KnowledgeObjectId(1), AnnotationId(1), &mut set).unwrap();
        (object, set)
    }

    #[test]
    fn test_score_equal_to_threshold_matches() {
        let (object, set) = fixture();
        let fuzzy = matcher(vec![("siemens group", "siemens", 80)], 80);
        assert!(fuzzy.matches(&object, set.get(AnnotationId(2)).unwrap(), &set));
    }

    #[test]
    fn test_score_below_threshold_does_not_match() {
        let (object, set) = fixture();
        let fuzzy = matcher(vec![("siemens group", "siemens", 79)], 80);
        assert!(!fuzzy.matches(&object, set.get(AnnotationId(2)).unwrap(), &set));
    }

    #[test]
    fn test_synonym_can_clear_threshold() {
        let (object, set) = fixture();
        let fuzzy = matcher(
            vec![("siemens ag", "siemens", 50), ("siemens group", "siemens", 90)],
            80,
        );
        assert!(fuzzy.matches(&object, set.get(AnnotationId(3)).unwrap(), &set));
    }

    #[test]
    fn test_labels_are_lower_cased_before_scoring() {
        let mut set = AnnotationSet::from_annotations(vec![
            Annotation::new(1, "ACME", vec![Word::new(0, "ACME", "ACME")]),
            annotation(2, "acme inc", 10),
        ])
        .unwrap();
        let object = KnowledgeObject::new(KnowledgeObjectId(1), AnnotationId(1), &mut set).unwrap();
        let fuzzy = matcher(vec![("acme inc", "acme", 100)], 90);
        assert!(fuzzy.matches(&object, set.get(AnnotationId(2)).unwrap(), &set));
    }

    #[test]
    fn test_debug_shows_backend() {
        let fuzzy = matcher(Vec::new(), 42);
        let rendered = format!("{:?}", fuzzy);
        assert!(rendered.contains("table"));
        assert!(rendered.contains("42"));
        assert_eq!(fuzzy.threshold(), 42);
    }
}
