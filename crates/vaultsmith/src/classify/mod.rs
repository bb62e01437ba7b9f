//! Column classification.
//!
//! Each column is reduced to a deterministic sample, then run through
//! ordered rule sets:
//!
//! - semantic type (identifier, date, numeric, boolean, text; first match wins)
//! - business-key detection, independent of the semantic type
//! - foreign-key discovery via [`RelationshipResolver`]
//! - PII severity, most severe first
//!
//! Classification never fails on cell content. The only error from
//! [`ColumnClassifier::analyze`] is an unknown column name.

mod classifier;
mod patterns;
mod pii;
mod relationships;
mod sample;

pub use classifier::{BatchProfiles, ClassifierConfig, ColumnClassifier, SkippedColumn};
pub use pii::{classify_pii, detect_pii};
pub use relationships::{
    RelationshipCandidate, RelationshipHeuristic, RelationshipResolver, TableIndex,
};
pub use sample::ColumnSample;
