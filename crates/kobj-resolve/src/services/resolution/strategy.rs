//! Document transformation lifecycle and the knowledge-object strategy.

use std::sync::Arc;

use kobj::config::ResolutionConfig;
use kobj::models::{DocumentAnalysis, IdSequence};

use super::builder::ClusterBuilder;
use super::classifier::MembershipClassifier;
use super::dedup::deduplicate;
use super::table::TableAnnotator;
use super::types::{ResolutionError, ResolutionOutcome};
use crate::services::similarity::{SimilarityBackend, TokenSetScorer};

/// A stage that transforms a document analysis in place.
///
/// `transform` runs the three hooks in order; only `process_data` is required.
pub trait TransformationStrategy {
    fn name(&self) -> &str;

    fn preprocess_data(&self, _data: &mut DocumentAnalysis) -> Result<(), ResolutionError> {
        Ok(())
    }

    fn process_data(&self, data: &mut DocumentAnalysis) -> Result<(), ResolutionError>;

    fn postprocess_data(&self, _data: &mut DocumentAnalysis) -> Result<(), ResolutionError> {
        Ok(())
    }

    fn transform(&self, data: &mut DocumentAnalysis) -> Result<(), ResolutionError> {
        self.preprocess_data(data)?;
        self.process_data(data)?;
        self.postprocess_data(data)
    }
}

/// Resolves a document's annotations into knowledge objects.
pub struct KnowledgeObjectStrategy {
    builder: ClusterBuilder,
    tables: TableAnnotator,
    ids: Arc<IdSequence>,
}

impl KnowledgeObjectStrategy {
    /// Strategy using the built-in token-set scorer.
    pub fn new(config: &ResolutionConfig) -> Self {
        Self::with_backend(config, Arc::new(TokenSetScorer::new()))
    }

    pub fn with_backend(config: &ResolutionConfig, backend: Arc<dyn SimilarityBackend>) -> Self {
        let classifier = MembershipClassifier::new(backend, config.fuzzy_threshold);
        Self {
            builder: ClusterBuilder::new(classifier),
            tables: TableAnnotator::new(),
            ids: Arc::new(IdSequence::new()),
        }
    }

    /// Share an id sequence with other runs so ids never collide between them.
    pub fn with_ids(mut self, ids: Arc<IdSequence>) -> Self {
        self.ids = ids;
        self
    }

    pub fn ids(&self) -> &Arc<IdSequence> {
        &self.ids
    }

    /// Cluster the document text, attach the result, and annotate its tables.
    ///
    /// Text objects replace `data.knowledge_objects`. Table objects are
    /// returned in the outcome and left off the document.
    pub fn resolve(&self, data: &mut DocumentAnalysis) -> Result<ResolutionOutcome, ResolutionError> {
        data.annotations.clear_knowledge_objects();

        let queue = deduplicate(data.annotations.iter());
        let kept = queue.len();
        let dropped = data.annotations.len() - kept;
        if dropped > 0 {
            tracing::debug!("{} overlapping annotations dropped", dropped);
        }

        let objects = self.builder.build(queue, &mut data.annotations, &self.ids)?;
        let text_objects = objects.len();
        data.knowledge_objects = objects;

        let table_objects = self.tables.annotate(&data.tables, &self.ids);
        if !table_objects.is_empty() {
            tracing::info!(
                "{} tables produced {} knowledge objects",
                data.tables.len(),
                table_objects.len()
            );
        }

        Ok(ResolutionOutcome {
            kept,
            dropped,
            text_objects,
            table_objects,
        })
    }
}

impl TransformationStrategy for KnowledgeObjectStrategy {
    fn name(&self) -> &str {
        "knowledge_objects"
    }

    fn process_data(&self, data: &mut DocumentAnalysis) -> Result<(), ResolutionError> {
        self.resolve(data).map(|_| ())
    }
}

impl std::fmt::Debug for KnowledgeObjectStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeObjectStrategy")
            .field("builder", &self.builder)
            .field("next_id", &self.ids.peek())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kobj::models::{Annotation, AnnotationId, AnnotationSet, KnowledgeObjectId, Word};

    fn annotation(id: u64, label: &str, first_index: usize) -> Annotation {
        let words = label
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| Word::new(first_index + i, w, w.to_lowercase()))
            .collect();
        Annotation::new(id, label, words)
    }

    fn document() -> DocumentAnalysis {
        DocumentAnalysis::new(
            AnnotationSet::from_annotations(vec![
                annotation(1, "Deutsche Bank", 0),
                annotation(2, "Bank", 1),
                annotation(3, "Deutsche Bank AG", 7),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_resolve_attaches_text_objects() {
        let strategy = KnowledgeObjectStrategy::new(&ResolutionConfig::with_threshold(85));
        let mut data = document();
        let outcome = strategy.resolve(&mut data).unwrap();

        assert_eq!(outcome.kept, 2);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.text_objects, 1);
        assert!(outcome.table_objects.is_empty());
        assert_eq!(
            data.knowledge_objects[0].annotation_ids(),
            &[AnnotationId(1), AnnotationId(3)]
        );
    }

    #[test]
    fn test_rerun_reclusters_from_scratch() {
        let strategy = KnowledgeObjectStrategy::new(&ResolutionConfig::with_threshold(85));
        let mut data = document();
        strategy.transform(&mut data).unwrap();
        strategy.transform(&mut data).unwrap();

        assert_eq!(data.knowledge_objects.len(), 1);
        assert_eq!(data.knowledge_objects[0].len(), 2);
        // ids keep counting across runs
        assert_eq!(data.knowledge_objects[0].id(), KnowledgeObjectId(2));
    }

    #[test]
    fn test_shared_sequence() {
        let ids = Arc::new(IdSequence::new());
        let first = KnowledgeObjectStrategy::new(&ResolutionConfig::with_threshold(85))
            .with_ids(Arc::clone(&ids));
        let second = KnowledgeObjectStrategy::new(&ResolutionConfig::with_threshold(85))
            .with_ids(Arc::clone(&ids));

        let mut a = document();
        let mut b = document();
        first.resolve(&mut a).unwrap();
        second.resolve(&mut b).unwrap();

        assert_eq!(a.knowledge_objects[0].id(), KnowledgeObjectId(1));
        assert_eq!(b.knowledge_objects[0].id(), KnowledgeObjectId(2));
        assert_eq!(first.name(), "knowledge_objects");
    }
}
