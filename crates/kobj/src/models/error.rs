//! Model error types.

use thiserror::Error;

use super::AnnotationId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown annotation: {0}")]
    UnknownAnnotation(AnnotationId),
    #[error("Duplicate annotation id: {0}")]
    DuplicateAnnotation(AnnotationId),
}
