//! Table adapter: each table clusters its own cells.

use kobj::models::{IdSequence, KnowledgeObject, Table};

/// Collects the knowledge objects every table produces for itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAnnotator;

impl TableAnnotator {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate the objects of all tables, in table order.
    pub fn annotate(&self, tables: &[Box<dyn Table>], ids: &IdSequence) -> Vec<KnowledgeObject> {
        let mut objects = Vec::new();
        for (index, table) in tables.iter().enumerate() {
            let found = table.annotate_cells(ids);
            tracing::debug!(
                "{} #{} produced {} knowledge objects",
                table.name(),
                index,
                found.len()
            );
            objects.extend(found);
        }
        objects
    }
}
