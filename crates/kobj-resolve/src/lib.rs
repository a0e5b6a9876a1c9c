//! kobj-resolve - knowledge-object clustering for annotated documents.
//!
//! Groups a document's annotations into knowledge objects using exact and
//! fuzzy membership tests over the labels each cluster accumulates.

pub mod services;
