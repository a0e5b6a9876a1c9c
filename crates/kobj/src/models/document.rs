//! Document analysis container and the table capability.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::annotation::{Annotation, AnnotationSet};
use super::error::ModelError;
use super::knowledge_object::{IdSequence, KnowledgeObject};

/// A table recognized in the document.
///
/// Tables cluster their own cells; the result is consumed as-is. Ids must be
/// drawn from the provided sequence so they never collide with text objects.
pub trait Table {
    /// Human-readable identifier for log output.
    fn name(&self) -> &str {
        "table"
    }

    /// Annotate the table's cells and return its knowledge objects.
    fn annotate_cells(&self, ids: &IdSequence) -> Vec<KnowledgeObject>;
}

/// Everything the resolution stage knows about one document.
#[derive(Default)]
pub struct DocumentAnalysis {
    pub annotations: AnnotationSet,
    pub tables: Vec<Box<dyn Table>>,
    /// Knowledge objects resolved from the document text.
    pub knowledge_objects: Vec<KnowledgeObject>,
}

impl DocumentAnalysis {
    pub fn new(annotations: AnnotationSet) -> Self {
        Self {
            annotations,
            tables: Vec::new(),
            knowledge_objects: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Table + 'static) -> Self {
        self.tables.push(Box::new(table));
        self
    }
}

impl fmt::Debug for DocumentAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentAnalysis")
            .field("annotations", &self.annotations.len())
            .field("tables", &self.tables.len())
            .field("knowledge_objects", &self.knowledge_objects.len())
            .finish()
    }
}

/// On-disk JSON form of a document's annotations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl DocumentInput {
    pub fn into_analysis(self) -> Result<DocumentAnalysis, ModelError> {
        let annotations = AnnotationSet::from_annotations(self.annotations)?;
        Ok(DocumentAnalysis::new(annotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationId, KnowledgeObjectId};

    #[test]
    fn test_input_into_analysis() {
        let input: DocumentInput = serde_json::from_str(
            r#"{
                "id": "doc-1",
                "annotations": [
                    {"id": 1, "label": "EU", "words": [{"index": 0, "word": "EU", "normalized_form": "eu"}], "synonyms": [2]},
                    {"id": 2, "label": "European Union", "words": [
                        {"index": 4, "word": "European", "normalized_form": "european"},
                        {"index": 5, "word": "Union", "normalized_form": "union"}
                    ], "specific_category": "organization", "synonyms": [1]}
                ]
            }"#,
        )
        .unwrap();

        let analysis = input.into_analysis().unwrap();
        assert_eq!(analysis.annotations.len(), 2);
        assert!(analysis.tables.is_empty());
        let union = analysis.annotations.get(AnnotationId(2)).unwrap();
        assert_eq!(union.specific_category, "organization");
        assert_eq!(union.synonyms, vec![AnnotationId(1)]);
    }

    #[test]
    fn test_input_with_duplicate_ids_fails() {
        let input = DocumentInput {
            id: None,
            annotations: vec![
                Annotation::new(1, "a", Vec::new()),
                Annotation::new(1, "b", Vec::new()),
            ],
        };
        let err = input.into_analysis().unwrap_err();
        assert_eq!(err, ModelError::DuplicateAnnotation(AnnotationId(1)));
    }

    struct FixedTable;

    impl Table for FixedTable {
        fn annotate_cells(&self, ids: &IdSequence) -> Vec<KnowledgeObject> {
            let mut cells =
                AnnotationSet::from_annotations(vec![Annotation::new(100, "cell", Vec::new())])
                    .unwrap();
            vec![KnowledgeObject::new(ids.next_id(), AnnotationId(100), &mut cells).unwrap()]
        }
    }

    #[test]
    fn test_table_draws_from_shared_sequence() {
        let analysis = DocumentAnalysis::default().with_table(FixedTable);
        let ids = IdSequence::new();
        ids.next_id();

        let objects = analysis.tables[0].annotate_cells(&ids);
        assert_eq!(objects[0].id(), KnowledgeObjectId(2));
        assert_eq!(analysis.tables[0].name(), "table");
    }
}
