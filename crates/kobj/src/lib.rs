//! kobj - knowledge-object resolution for annotated documents.
//!
//! Core library exposing the annotation and knowledge-object models plus
//! configuration for the workspace crates.

pub mod config;
pub mod models;
