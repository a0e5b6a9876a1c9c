//! Exact membership by literal equality of normalized or simplified forms.

use kobj::models::{Annotation, AnnotationSet, KnowledgeObject};

/// Decides membership by comparing space-free label forms for equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl ExactMatcher {
    pub fn new() -> Self {
        Self
    }

    /// True if the candidate (or one of its synonyms) spells one of the
    /// object's labels exactly.
    ///
    /// Two comparisons run per candidate: normalized forms concatenated
    /// against the object's normalized labels with spaces removed, and raw
    /// words concatenated and lower-cased against its display labels with
    /// spaces removed and lower-cased. For synonyms the normalized comparison
    /// uses the synonym's words while the simplified comparison keeps using the
    /// candidate's own raw words.
    pub fn matches(
        &self,
        object: &KnowledgeObject,
        candidate: &Annotation,
        set: &AnnotationSet,
    ) -> bool {
        if candidate.words.is_empty() {
            return false;
        }

        let normalized_labels: Vec<String> = object
            .labels_normalized()
            .iter()
            .map(|l| l.replace(' ', ""))
            .collect();
        let simplified_labels: Vec<String> = object
            .labels()
            .iter()
            .map(|l| l.replace(' ', "").to_lowercase())
            .collect();

        let is_simplified = simplified_labels.contains(&candidate.simplified());
        let is_normalized = normalized_labels.contains(&candidate.normalized_concat());
        if is_simplified || is_normalized {
            return true;
        }

        set.synonyms_of(candidate).any(|synonym| {
            // Simplified form of the candidate itself, already known to miss.
            is_simplified || normalized_labels.contains(&synonym.normalized_concat())
        })
    }
}
