//! Incremental clustering of a document's annotations.

use std::collections::VecDeque;

use kobj::models::{AnnotationId, AnnotationSet, IdSequence, KnowledgeObject, ModelError};

use super::classifier::MembershipClassifier;
use super::types::ResolutionError;

/// Grows knowledge objects one seed at a time over a work queue.
///
/// Each seed's object keeps rescanning the remaining queue until a full pass
/// absorbs nothing, since every absorbed annotation brings labels that later
/// candidates can match against.
#[derive(Debug, Clone)]
pub struct ClusterBuilder {
    classifier: MembershipClassifier,
}

impl ClusterBuilder {
    pub fn new(classifier: MembershipClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &MembershipClassifier {
        &self.classifier
    }

    /// Cluster `queue` (already de-overlapped, in document order).
    ///
    /// Objects are returned in seed order. Annotations that some object has
    /// already claimed, for instance as a synonym, are never seeded again.
    /// Annotations outside the queue are withheld, so synonym links cannot
    /// pull them into a cluster.
    pub fn build(
        &self,
        queue: Vec<AnnotationId>,
        set: &mut AnnotationSet,
        ids: &IdSequence,
    ) -> Result<Vec<KnowledgeObject>, ResolutionError> {
        set.withhold_except(&queue);
        let mut queue: VecDeque<AnnotationId> = queue.into();
        let mut objects = Vec::new();

        while let Some(seed) = queue.pop_front() {
            if is_claimed(seed, set) {
                continue;
            }
            if !set.contains(seed) {
                return Err(ModelError::UnknownAnnotation(seed).into());
            }

            let mut object = KnowledgeObject::new(ids.next_id(), seed, set)?;
            tracing::debug!(
                "knowledge object {} seeded from annotation {}",
                object.id(),
                seed
            );

            let mut passes = 0usize;
            loop {
                passes += 1;
                let absorbed = self.scan(&mut object, &mut queue, set);
                if absorbed == 0 {
                    break;
                }
            }

            tracing::debug!(
                "knowledge object {} closed with {} annotations after {} passes",
                object.id(),
                object.len(),
                passes
            );
            objects.push(object);
        }

        tracing::info!(
            "Resolved {} annotations into {} knowledge objects",
            set.iter().filter(|a| a.knowledge_object().is_some()).count(),
            objects.len()
        );
        Ok(objects)
    }

    /// One pass over the queue; returns how many candidates joined `object`.
    fn scan(
        &self,
        object: &mut KnowledgeObject,
        queue: &mut VecDeque<AnnotationId>,
        set: &mut AnnotationSet,
    ) -> usize {
        let mut absorbed = 0;
        let mut remaining = VecDeque::with_capacity(queue.len());

        for candidate_id in queue.drain(..) {
            if is_claimed(candidate_id, set) {
                continue;
            }
            let Some(candidate) = set.get(candidate_id) else {
                tracing::warn!("queued annotation {} is not in the document", candidate_id);
                continue;
            };

            if self.classifier.is_member(object, candidate, set) {
                tracing::debug!(
                    "knowledge object {} absorbs annotation {} ({:?})",
                    object.id(),
                    candidate_id,
                    candidate.label
                );
                object.add_annotation(candidate_id, set);
                absorbed += 1;
            } else {
                remaining.push_back(candidate_id);
            }
        }

        *queue = remaining;
        absorbed
    }
}

fn is_claimed(id: AnnotationId, set: &AnnotationSet) -> bool {
    set.get(id)
        .is_some_and(|annotation| annotation.knowledge_object().is_some())
}
