//! Word and annotation models.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ModelError;
use super::knowledge_object::KnowledgeObjectId;

/// A token of the document text.
///
/// `index` is the token position in the document and is what makes two words
/// "the same word": overlapping annotations share token indices, while two
/// separate mentions of "Paris" do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    /// Token position in the document.
    pub index: usize,
    /// Surface form as it appears in the text.
    pub word: String,
    /// Canonical form produced by the upstream normalizer.
    pub normalized_form: String,
}

impl Word {
    pub fn new(index: usize, word: impl Into<String>, normalized_form: impl Into<String>) -> Self {
        Self {
            index,
            word: word.into(),
            normalized_form: normalized_form.into(),
        }
    }
}

/// Stable identifier of an annotation within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recognized mention: a labelled span of words with a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Display string.
    pub label: String,
    pub words: Vec<Word>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub specific_category: String,
    /// Annotations pre-linked as alternate surface forms of the same concept.
    #[serde(default)]
    pub synonyms: Vec<AnnotationId>,
    /// Owning knowledge object, set once the annotation is absorbed into a cluster.
    #[serde(skip)]
    knowledge_object: Option<KnowledgeObjectId>,
}

impl Annotation {
    /// Create an annotation with empty categories and no synonyms.
    pub fn new(id: u64, label: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            id: AnnotationId(id),
            label: label.into(),
            words,
            category: String::new(),
            specific_category: String::new(),
            synonyms: Vec::new(),
            knowledge_object: None,
        }
    }

    pub fn with_category(
        mut self,
        category: impl Into<String>,
        specific_category: impl Into<String>,
    ) -> Self {
        self.category = category.into();
        self.specific_category = specific_category.into();
        self
    }

    pub fn with_synonyms(mut self, synonyms: impl IntoIterator<Item = u64>) -> Self {
        self.synonyms = synonyms.into_iter().map(AnnotationId).collect();
        self
    }

    /// The knowledge object this annotation was absorbed into, if any.
    pub fn knowledge_object(&self) -> Option<KnowledgeObjectId> {
        self.knowledge_object
    }

    pub(crate) fn set_knowledge_object(&mut self, id: KnowledgeObjectId) {
        self.knowledge_object = Some(id);
    }

    /// Normalized forms joined by a single space.
    pub fn normalized_label(&self) -> String {
        self.words
            .iter()
            .map(|w| w.normalized_form.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalized forms concatenated without a separator.
    pub fn normalized_concat(&self) -> String {
        self.words.iter().map(|w| w.normalized_form.as_str()).collect()
    }

    /// Raw surface forms concatenated and lower-cased.
    pub fn simplified(&self) -> String {
        self.words.iter().map(|w| w.word.to_lowercase()).collect()
    }
}

/// Insertion-ordered arena of a document's annotations, addressable by id.
///
/// Synonym links are stored as ids and resolved through the set, so the
/// symmetric synonym relation never forms an ownership cycle. Withheld
/// annotations stay readable but no knowledge object may claim them.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
    positions: HashMap<AnnotationId, usize>,
    withheld: HashSet<AnnotationId>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting duplicate ids.
    pub fn from_annotations(
        annotations: impl IntoIterator<Item = Annotation>,
    ) -> Result<Self, ModelError> {
        let mut set = Self::new();
        for annotation in annotations {
            set.insert(annotation)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, annotation: Annotation) -> Result<(), ModelError> {
        if self.positions.contains_key(&annotation.id) {
            return Err(ModelError::DuplicateAnnotation(annotation.id));
        }
        self.positions.insert(annotation.id, self.annotations.len());
        self.annotations.push(annotation);
        Ok(())
    }

    /// Link two annotations as synonyms of each other.
    pub fn link_synonyms(&mut self, a: AnnotationId, b: AnnotationId) -> Result<(), ModelError> {
        if !self.contains(b) {
            return Err(ModelError::UnknownAnnotation(b));
        }
        let first = self.get_mut(a).ok_or(ModelError::UnknownAnnotation(a))?;
        if !first.synonyms.contains(&b) {
            first.synonyms.push(b);
        }
        if let Some(second) = self.get_mut(b) {
            if !second.synonyms.contains(&a) {
                second.synonyms.push(a);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.positions.get(&id).map(|&pos| &self.annotations[pos])
    }

    pub(crate) fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        match self.positions.get(&id) {
            Some(&pos) => Some(&mut self.annotations[pos]),
            None => None,
        }
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Drop every back-reference and withholding so the set can be clustered again.
    pub fn clear_knowledge_objects(&mut self) {
        for annotation in &mut self.annotations {
            annotation.knowledge_object = None;
        }
        self.withheld.clear();
    }

    /// Withhold every annotation not listed in `eligible` from clustering.
    pub fn withhold_except(&mut self, eligible: &[AnnotationId]) {
        let eligible: HashSet<AnnotationId> = eligible.iter().copied().collect();
        self.withheld = self
            .positions
            .keys()
            .filter(|id| !eligible.contains(id))
            .copied()
            .collect();
    }

    pub fn is_withheld(&self, id: AnnotationId) -> bool {
        self.withheld.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Resolve an annotation's synonym links, skipping ids not in the set.
    pub fn synonyms_of<'a>(
        &'a self,
        annotation: &'a Annotation,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        annotation.synonyms.iter().filter_map(move |&id| {
            let synonym = self.get(id);
            if synonym.is_none() {
                tracing::warn!(
                    "annotation {} links unknown synonym {}, ignoring",
                    annotation.id,
                    id
                );
            }
            synonym
        })
    }
}
