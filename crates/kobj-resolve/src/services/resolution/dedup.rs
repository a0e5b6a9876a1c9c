//! Overlap filter applied before clustering.

use std::collections::HashSet;

use kobj::models::{Annotation, AnnotationId};

/// Keep annotations that share no word with an earlier kept annotation.
///
/// First encountered wins; an overlapping annotation is dropped whole.
pub fn deduplicate<'a>(annotations: impl IntoIterator<Item = &'a Annotation>) -> Vec<AnnotationId> {
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut kept = Vec::new();

    for annotation in annotations {
        if annotation.words.iter().any(|w| claimed.contains(&w.index)) {
            tracing::debug!(
                "dropping annotation {} ({:?}): overlaps an earlier annotation",
                annotation.id,
                annotation.label
            );
            continue;
        }
        claimed.extend(annotation.words.iter().map(|w| w.index));
        kept.push(annotation.id);
    }

    kept
}
