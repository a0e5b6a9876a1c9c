//! Types shared across resolution stages.

use kobj::models::{KnowledgeObject, ModelError};
use thiserror::Error;

/// Result of resolving one document.
#[derive(Debug)]
pub struct ResolutionOutcome {
    /// Annotations left after overlap filtering.
    pub kept: usize,
    /// Annotations dropped for sharing words with an earlier one.
    pub dropped: usize,
    /// Knowledge objects attached to the document from its text.
    pub text_objects: usize,
    /// Knowledge objects returned by the document's tables (not attached).
    pub table_objects: Vec<KnowledgeObject>,
}

/// Errors from the resolution stage.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}
