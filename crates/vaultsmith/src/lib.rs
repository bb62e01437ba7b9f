//! Vaultsmith: column profiling and Data Vault schema inference for tabular data.
//!
//! Vaultsmith reads one or more tables, classifies every column (semantic
//! type, key flags, foreign-key references, PII sensitivity) and derives a
//! Data Vault 2.0 model of Hubs, Links and Satellites from the profiles.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same table, seed and sample size always give the same profiles
//! - **Best-effort**: a column that cannot be classified is skipped, not fatal
//! - **Advisory is optional**: an external model may refine a classification, never break a run
//!
//! # Example
//!
//! ```no_run
//! use vaultsmith::Vaultsmith;
//!
//! let vaultsmith = Vaultsmith::new();
//! let result = vaultsmith.analyze("orders.csv").unwrap();
//!
//! println!("Hubs: {}", result.model.hubs().len());
//! println!("Links: {}", result.model.links().len());
//! ```

pub mod advisory;
pub mod classify;
pub mod error;
pub mod input;
pub mod profile;
pub mod vault;

mod pipeline;

pub use crate::pipeline::{
    AnalysisSummary, ClassifiedColumn, PipelineResult, Vaultsmith, VaultsmithConfig,
    DEFAULT_MODEL_NAME,
};
pub use advisory::{
    AdvisoryConfig, AdvisoryInsight, AdvisoryProvider, AnthropicProvider, MockProvider,
    OllamaProvider, OpenAIProvider,
};
pub use classify::{ClassifierConfig, ColumnClassifier};
pub use error::{Result, VaultError};
pub use input::{DataTable, Dataset, Parser, ParserConfig, SourceMetadata};
pub use profile::{ColumnProfile, ColumnStatistics, PiiLevel, SemanticType};
pub use vault::{
    BuilderConfig, Hub, Link, Satellite, SatelliteRouting, SatelliteType, SchemaBuilder,
    SchemaModel,
};
