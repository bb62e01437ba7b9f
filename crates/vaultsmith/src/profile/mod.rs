//! Column profile types produced by the classifier.

mod column;
mod types;

pub use column::{suggested_name, ColumnProfile, ColumnStatistics, PROFILE_SAMPLE_LIMIT};
pub use types::{PiiLevel, SemanticType};
