//! Three-pass construction of a [`SchemaModel`] from column profiles.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::{Hub, Link, Satellite, SatelliteType, SchemaModel};
use crate::profile::{suggested_name, ColumnProfile, PiiLevel, SemanticType};

/// Where descriptive columns are attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatelliteRouting {
    /// Every descriptive column lands on the first Hub created.
    #[default]
    FirstHub,
    /// Prefer the first Hub seeded from the column's own source table.
    SourceTable,
}

/// Schema builder configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub satellite_routing: SatelliteRouting,
}

/// Builds Hubs, Links and Satellites from an ordered profile sequence.
///
/// Each pass walks the profiles in input order and the first profile to
/// claim a name wins; later claims are no-ops. Building never fails.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    config: BuilderConfig,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, profiles: &[ColumnProfile], model_name: &str) -> SchemaModel {
        let mut model = SchemaModel::new(model_name);
        model.total_columns_analyzed = profiles.len();

        let hub_origins = self.discover_hubs(profiles, &mut model);
        self.discover_links(profiles, &mut model);
        self.assign_satellites(profiles, &hub_origins, &mut model);

        info!(
            model = %model.model_name,
            hubs = model.hubs().len(),
            links = model.links().len(),
            satellites = model.satellites().len(),
            "built vault model"
        );
        model
    }

    /// Pass 1. Returns the source table of each Hub, in Hub order.
    fn discover_hubs(
        &self,
        profiles: &[ColumnProfile],
        model: &mut SchemaModel,
    ) -> Vec<(String, Option<String>)> {
        let mut origins = Vec::new();

        for profile in profiles.iter().filter(|p| p.is_hub_candidate()) {
            let hub_name = profile.name.to_uppercase();
            if model.hub(&hub_name).is_some() {
                // Later keys for an existing Hub are not accumulated
                continue;
            }
            if model.add_hub(Hub::new(hub_name.clone(), profile.name.clone())) {
                debug!(hub = %hub_name, column = %profile.name, "created hub");
                origins.push((hub_name, profile.source_table.clone()));
            }
        }

        origins
    }

    /// Pass 2.
    fn discover_links(&self, profiles: &[ColumnProfile], model: &mut SchemaModel) {
        for profile in profiles.iter().filter(|p| p.has_references()) {
            let hubs: Vec<String> = std::iter::once(profile.name.to_uppercase())
                .chain(
                    profile
                        .references
                        .iter()
                        .map(|r| suggested_name(r).to_uppercase()),
                )
                .filter(|name| model.hub(name).is_some())
                .collect();

            let Some(link) = Link::from_hubs(hubs) else {
                continue;
            };
            if model.link(&link.name).is_some() {
                continue;
            }

            let name = link.name.clone();
            if model.add_link(link) {
                debug!(link = %name, column = %profile.name, "created link");
            }
        }
    }

    /// Pass 3.
    fn assign_satellites(
        &self,
        profiles: &[ColumnProfile],
        hub_origins: &[(String, Option<String>)],
        model: &mut SchemaModel,
    ) {
        let Some((first_hub, _)) = hub_origins.first() else {
            return;
        };

        for profile in profiles.iter().filter(|p| p.is_descriptive()) {
            if profile.name.is_empty() {
                continue;
            }

            let parent = match self.config.satellite_routing {
                SatelliteRouting::FirstHub => first_hub,
                SatelliteRouting::SourceTable => hub_origins
                    .iter()
                    .find(|(_, table)| {
                        table.is_some() && table.as_deref() == profile.source_table.as_deref()
                    })
                    .map(|(hub, _)| hub)
                    .unwrap_or(first_hub),
            };

            let satellite =
                Satellite::new(parent.clone(), profile.name.clone(), satellite_type(profile));
            let name = satellite.name.clone();
            let kind = satellite.satellite_type;
            if model.add_satellite(satellite) {
                debug!(satellite = %name, parent = %parent, kind = %kind, "created satellite");
            }
        }
    }
}

/// Classify a descriptive column's payload.
pub fn satellite_type(profile: &ColumnProfile) -> SatelliteType {
    if profile.pii_level >= PiiLevel::Low {
        SatelliteType::Pii
    } else if is_technical_name(&profile.name) {
        SatelliteType::Technical
    } else if profile.semantic_type == SemanticType::Boolean {
        SatelliteType::Reference
    } else {
        SatelliteType::Business
    }
}

/// Load and audit metadata columns.
fn is_technical_name(name: &str) -> bool {
    let name = name.to_lowercase();
    matches!(
        name.as_str(),
        "load_date" | "record_source" | "created_at" | "updated_at"
    ) || name.ends_with("_ts")
        || name.starts_with("etl_")
        || name.starts_with("batch_")
}
