pub mod resolution;
pub mod similarity;

pub use resolution::{
    deduplicate, has_numeric_value, is_short_label, ClusterBuilder, ExactMatcher, FuzzyMatcher,
    KnowledgeObjectStrategy, MatchStrategy, MembershipClassifier, ResolutionError,
    ResolutionOutcome, TableAnnotator, TransformationStrategy,
};
pub use similarity::{token_set_ratio, BestMatch, SimilarityBackend, TokenSetScorer};
