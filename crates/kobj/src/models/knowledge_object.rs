//! Knowledge objects: clusters of annotations denoting one entity.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationId, AnnotationSet};
use super::error::ModelError;

/// Identifier of a knowledge object, unique within its `IdSequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeObjectId(pub u64);

impl fmt::Display for KnowledgeObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of knowledge-object ids, starting at 1.
///
/// Shared by every clustering run that holds it; ids are never reused until
/// `reset` is called. Atomic so concurrent runs never hand out the same id.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> KnowledgeObjectId {
        KnowledgeObjectId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to `next_id` will return.
    pub fn peek(&self) -> KnowledgeObjectId {
        KnowledgeObjectId(self.next.load(Ordering::Relaxed))
    }

    pub fn reset(&self) {
        self.next.store(1, Ordering::Relaxed);
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// A cluster of annotations believed to denote the same real-world entity.
///
/// Members are held by id; the annotations themselves live in the document's
/// `AnnotationSet` and point back here through their back-reference.
#[derive(Debug, Clone)]
pub struct KnowledgeObject {
    id: KnowledgeObjectId,
    category: String,
    specific_category: String,
    annotations: Vec<AnnotationId>,
    members: HashSet<AnnotationId>,
    labels: Vec<String>,
    labels_normalized: Vec<String>,
}

impl KnowledgeObject {
    /// Seed a new knowledge object, absorbing the seed and its synonyms.
    pub fn new(
        id: KnowledgeObjectId,
        seed: AnnotationId,
        set: &mut AnnotationSet,
    ) -> Result<Self, ModelError> {
        let seed_annotation = set.get(seed).ok_or(ModelError::UnknownAnnotation(seed))?;
        let synonyms = seed_annotation.synonyms.clone();

        let mut object = Self {
            id,
            category: seed_annotation.category.clone(),
            specific_category: seed_annotation.specific_category.clone(),
            annotations: Vec::new(),
            members: HashSet::new(),
            labels: Vec::new(),
            labels_normalized: Vec::new(),
        };

        object.claim(seed, set);
        for synonym in synonyms {
            object.claim(synonym, set);
        }
        object.refresh_labels(set);

        Ok(object)
    }

    /// Absorb an annotation and its synonyms.
    ///
    /// Idempotent: members already present are skipped, but their missing
    /// synonyms are still absorbed. Returns whether anything new joined.
    pub fn add_annotation(&mut self, id: AnnotationId, set: &mut AnnotationSet) -> bool {
        let synonyms = match set.get(id) {
            Some(annotation) => annotation.synonyms.clone(),
            None => {
                tracing::warn!("knowledge object {}: unknown annotation {}", self.id, id);
                return false;
            }
        };

        let mut added = self.claim(id, set);
        for synonym in synonyms {
            added |= self.claim(synonym, set);
        }
        if added {
            self.refresh_labels(set);
        }
        added
    }

    /// Take ownership of a single annotation. Withheld annotations and those
    /// already owned by another knowledge object stay where they are.
    fn claim(&mut self, id: AnnotationId, set: &mut AnnotationSet) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        if set.is_withheld(id) {
            tracing::debug!(
                "annotation {} is withheld from clustering, not adding it to knowledge object {}",
                id,
                self.id
            );
            return false;
        }
        let Some(annotation) = set.get_mut(id) else {
            tracing::warn!("knowledge object {}: unknown annotation {}", self.id, id);
            return false;
        };
        if let Some(owner) = annotation.knowledge_object() {
            if owner != self.id {
                tracing::debug!(
                    "annotation {} already belongs to knowledge object {}, not moving it to {}",
                    id,
                    owner,
                    self.id
                );
                return false;
            }
        }

        annotation.set_knowledge_object(self.id);
        self.members.insert(id);
        self.annotations.push(id);
        true
    }

    /// Append labels of members and their synonyms that are not present yet.
    fn refresh_labels(&mut self, set: &AnnotationSet) {
        for id in &self.annotations {
            let Some(annotation) = set.get(*id) else {
                continue;
            };
            push_distinct(&mut self.labels, &annotation.label);
            push_distinct(&mut self.labels_normalized, &annotation.normalized_label());
            for synonym in set.synonyms_of(annotation) {
                push_distinct(&mut self.labels, &synonym.label);
                push_distinct(&mut self.labels_normalized, &synonym.normalized_label());
            }
        }
    }

    pub fn id(&self) -> KnowledgeObjectId {
        self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn specific_category(&self) -> &str {
        &self.specific_category
    }

    /// Member ids in insertion order.
    pub fn annotation_ids(&self) -> &[AnnotationId] {
        &self.annotations
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Distinct display labels in first-seen order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distinct space-joined normalized labels in first-seen order.
    pub fn labels_normalized(&self) -> &[String] {
        &self.labels_normalized
    }

    pub fn to_record(&self) -> KnowledgeObjectRecord {
        KnowledgeObjectRecord {
            id: self.id.0,
            labels: self.labels.clone(),
            category: self.specific_category.clone(),
            annotation_ids: self.annotations.iter().map(|a| a.0).collect(),
        }
    }

    pub fn summary(&self) -> KnowledgeObjectSummary {
        KnowledgeObjectSummary {
            id: self.id.0,
            category: self.specific_category.clone(),
            labels: self.labels.clone(),
        }
    }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// Serialized form of a knowledge object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeObjectRecord {
    pub id: u64,
    pub labels: Vec<String>,
    /// The specific category of the seed annotation.
    pub category: String,
    pub annotation_ids: Vec<u64>,
}

/// Compact form without member ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeObjectSummary {
    pub id: u64,
    pub category: String,
    pub labels: Vec<String>,
}
