//! Domain models: words, annotations, knowledge objects, documents.

mod annotation;
mod document;
mod error;
mod knowledge_object;

pub use annotation::{Annotation, AnnotationId, AnnotationSet, Word};
pub use document::{DocumentAnalysis, DocumentInput, Table};
pub use error::ModelError;
pub use knowledge_object::{
    IdSequence, KnowledgeObject, KnowledgeObjectId, KnowledgeObjectRecord, KnowledgeObjectSummary,
};
