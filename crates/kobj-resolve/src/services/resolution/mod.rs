//! Knowledge-object resolution: clusters a document's annotations.
//!
//! Annotations are first de-overlapped, then consumed as a work queue by the
//! `ClusterBuilder`, which grows one knowledge object at a time until no
//! remaining annotation matches it. The `MembershipClassifier` decides per
//! candidate whether exact or fuzzy comparison applies.

mod builder;
mod classifier;
mod dedup;
mod exact;
mod fuzzy;
mod strategy;
mod table;
mod types;

pub use builder::ClusterBuilder;
pub use classifier::{has_numeric_value, is_short_label, MatchStrategy, MembershipClassifier};
pub use dedup::deduplicate;
pub use exact::ExactMatcher;
pub use fuzzy::FuzzyMatcher;
pub use strategy::{KnowledgeObjectStrategy, TransformationStrategy};
pub use table::TableAnnotator;
pub use types::{ResolutionError, ResolutionOutcome};
