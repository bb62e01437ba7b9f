//! Data Vault 2.0 schema model and builder.
//!
//! The builder consumes classified column profiles and produces a
//! [`SchemaModel`] of Hubs (entities), Links (relationships) and
//! Satellites (descriptive attributes) with deterministic naming.

mod builder;
mod model;

pub use builder::{satellite_type, BuilderConfig, SatelliteRouting, SchemaBuilder};
pub use model::{Hub, Link, Satellite, SatelliteType, SchemaModel, TableKind, TableRef};
