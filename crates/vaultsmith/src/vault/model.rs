//! Data Vault model: Hubs, Links and Satellites.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload classification of a Satellite, used for compliance handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SatelliteType {
    Pii,
    Business,
    Technical,
    Reference,
}

impl SatelliteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SatelliteType::Pii => "PII",
            SatelliteType::Business => "BUSINESS",
            SatelliteType::Technical => "TECHNICAL",
            SatelliteType::Reference => "REFERENCE",
        }
    }
}

impl fmt::Display for SatelliteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique natural keys of one business entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub name: String,
    /// Column names that seeded this Hub.
    pub business_keys: Vec<String>,
    /// Surrogate key column, `{name}_HK`.
    pub hash_key: String,
}

impl Hub {
    pub fn new(name: impl Into<String>, business_key: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            hash_key: format!("{}_HK", name),
            business_keys: vec![business_key.into()],
            name,
        }
    }
}

/// Relationship between two or more Hubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Sorted Hub names joined by `_`.
    pub name: String,
    /// Sorted, deduplicated Hub names; always at least two.
    pub hub_references: Vec<String>,
    /// Surrogate key column, `{name}_LK`.
    pub hash_key: String,
}

impl Link {
    /// Build a Link over a set of Hub names.
    ///
    /// Names are sorted and deduplicated so discovery order never changes
    /// the result. Returns `None` when fewer than two distinct names remain.
    pub fn from_hubs<I, S>(hubs: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut hub_references: Vec<String> = hubs.into_iter().map(Into::into).collect();
        hub_references.sort();
        hub_references.dedup();

        if hub_references.len() < 2 {
            return None;
        }

        let name = hub_references.join("_");
        Some(Self {
            hash_key: format!("{}_LK", name),
            hub_references,
            name,
        })
    }
}

/// Descriptive attributes attached to a Hub or Link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Satellite {
    /// `{parent_table}_{COLUMN}_SAT`.
    pub name: String,
    pub parent_table: String,
    pub columns: Vec<String>,
    pub satellite_type: SatelliteType,
    /// Hash key of the parent, `{parent_table}_HK`.
    pub hash_key: String,
}

impl Satellite {
    pub fn new(
        parent_table: impl Into<String>,
        column: impl Into<String>,
        satellite_type: SatelliteType,
    ) -> Self {
        let parent_table = parent_table.into();
        let column = column.into();
        Self {
            name: format!("{}_{}_SAT", parent_table, column.to_uppercase()),
            hash_key: format!("{}_HK", parent_table),
            parent_table,
            columns: vec![column],
            satellite_type,
        }
    }
}

/// Kind of a table in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableKind {
    Hub,
    Link,
    Satellite,
}

/// Borrowed view of any table in the model.
#[derive(Debug, Clone, Copy)]
pub enum TableRef<'a> {
    Hub(&'a Hub),
    Link(&'a Link),
    Satellite(&'a Satellite),
}

impl<'a> TableRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            TableRef::Hub(h) => &h.name,
            TableRef::Link(l) => &l.name,
            TableRef::Satellite(s) => &s.name,
        }
    }

    pub fn kind(&self) -> TableKind {
        match self {
            TableRef::Hub(_) => TableKind::Hub,
            TableRef::Link(_) => TableKind::Link,
            TableRef::Satellite(_) => TableKind::Satellite,
        }
    }
}

/// The inferred Data Vault model.
///
/// Tables can only be added through the guarded `add_*` methods, which
/// keep names unique across all three kinds (case-insensitive) and refuse
/// Links or Satellites whose targets are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaModel {
    pub model_name: String,
    pub created_at: DateTime<Utc>,
    pub total_columns_analyzed: usize,
    hubs: Vec<Hub>,
    links: Vec<Link>,
    satellites: Vec<Satellite>,
}

impl SchemaModel {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            created_at: Utc::now(),
            total_columns_analyzed: 0,
            hubs: Vec::new(),
            links: Vec::new(),
            satellites: Vec::new(),
        }
    }

    /// Hubs in creation order.
    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn hub(&self, name: &str) -> Option<&Hub> {
        self.hubs.iter().find(|h| h.name == name)
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.name == name)
    }

    pub fn satellite(&self, name: &str) -> Option<&Satellite> {
        self.satellites.iter().find(|s| s.name == name)
    }

    /// Every table: Hubs, then Links, then Satellites.
    pub fn tables(&self) -> impl Iterator<Item = TableRef<'_>> {
        self.hubs
            .iter()
            .map(TableRef::Hub)
            .chain(self.links.iter().map(TableRef::Link))
            .chain(self.satellites.iter().map(TableRef::Satellite))
    }

    pub fn table_count(&self) -> usize {
        self.hubs.len() + self.links.len() + self.satellites.len()
    }

    pub fn pii_satellite_count(&self) -> usize {
        self.satellites
            .iter()
            .filter(|s| s.satellite_type == SatelliteType::Pii)
            .count()
    }

    /// Whether any table already uses `name`, ignoring case.
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables().any(|t| t.name().eq_ignore_ascii_case(name))
    }

    fn is_hub(&self, name: &str) -> bool {
        self.hub(name).is_some()
    }

    fn is_parent(&self, name: &str) -> bool {
        self.is_hub(name) || self.link(name).is_some()
    }

    /// Add a Hub. Returns false if the name is taken.
    pub fn add_hub(&mut self, hub: Hub) -> bool {
        if hub.name.is_empty() || self.contains_table(&hub.name) {
            return false;
        }
        self.hubs.push(hub);
        true
    }

    /// Add a Link. Returns false if the name is taken or a referenced Hub
    /// is missing.
    pub fn add_link(&mut self, link: Link) -> bool {
        if link.hub_references.len() < 2
            || !link.hub_references.iter().all(|h| self.is_hub(h))
            || self.contains_table(&link.name)
        {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Add a Satellite. Returns false if the name is taken or the parent
    /// is missing.
    pub fn add_satellite(&mut self, satellite: Satellite) -> bool {
        if !self.is_parent(&satellite.parent_table) || self.contains_table(&satellite.name) {
            return false;
        }
        self.satellites.push(satellite);
        true
    }

    /// List every structural problem with the model; empty when sound.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut seen = HashSet::new();
        for table in self.tables() {
            if !seen.insert(table.name().to_uppercase()) {
                problems.push(format!("duplicate table name '{}'", table.name()));
            }
        }

        for link in &self.links {
            if link.hub_references.len() < 2 {
                problems.push(format!("link '{}' references fewer than two hubs", link.name));
            }
            for hub in &link.hub_references {
                if !self.is_hub(hub) {
                    problems.push(format!("link '{}' references missing hub '{}'", link.name, hub));
                }
            }
        }

        for sat in &self.satellites {
            if !self.is_parent(&sat.parent_table) {
                problems.push(format!(
                    "satellite '{}' has missing parent '{}'",
                    sat.name, sat.parent_table
                ));
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_hash_key() {
        let hub = Hub::new("CUSTOMER_ID", "customer_id");
        assert_eq!(hub.hash_key, "CUSTOMER_ID_HK");
        assert_eq!(hub.business_keys, vec!["customer_id"]);
    }

    #[test]
    fn test_link_name_is_order_independent() {
        let a = Link::from_hubs(["ORDER_ID", "CUSTOMER_ID"]).unwrap();
        let b = Link::from_hubs(["CUSTOMER_ID", "ORDER_ID", "CUSTOMER_ID"]).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.name, "CUSTOMER_ID_ORDER_ID");
        assert_eq!(a.hash_key, "CUSTOMER_ID_ORDER_ID_LK");
    }

    #[test]
    fn test_link_needs_two_hubs() {
        assert!(Link::from_hubs(["A", "A"]).is_none());
        assert!(Link::from_hubs(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_satellite_naming() {
        let sat = Satellite::new("CUSTOMER_ID", "email", SatelliteType::Pii);
        assert_eq!(sat.name, "CUSTOMER_ID_EMAIL_SAT");
        assert_eq!(sat.hash_key, "CUSTOMER_ID_HK");
        assert_eq!(sat.columns, vec!["email"]);
    }

    #[test]
    fn test_guarded_adds() {
        let mut model = SchemaModel::new("Test");

        assert!(model.add_hub(Hub::new("A", "a")));
        assert!(!model.add_hub(Hub::new("a", "a")));

        // B is not a hub yet
        assert!(!model.add_link(Link::from_hubs(["A", "B"]).unwrap()));
        assert!(model.add_hub(Hub::new("B", "b")));
        assert!(model.add_link(Link::from_hubs(["B", "A"]).unwrap()));

        assert!(!model.add_satellite(Satellite::new("MISSING", "x", SatelliteType::Business)));
        assert!(model.add_satellite(Satellite::new("A_B", "x", SatelliteType::Business)));
        assert!(!model.add_satellite(Satellite::new("A_B", "X", SatelliteType::Reference)));

        assert_eq!(model.table_count(), 4);
        assert!(model.validate().is_empty());
    }

    #[test]
    fn test_tables_iteration_order() {
        let mut model = SchemaModel::new("Test");
        model.add_hub(Hub::new("A", "a"));
        model.add_hub(Hub::new("B", "b"));
        model.add_link(Link::from_hubs(["A", "B"]).unwrap());
        model.add_satellite(Satellite::new("A", "email", SatelliteType::Pii));

        let kinds: Vec<TableKind> = model.tables().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![TableKind::Hub, TableKind::Hub, TableKind::Link, TableKind::Satellite]
        );
        assert_eq!(model.pii_satellite_count(), 1);
    }

    #[test]
    fn test_validate_reports_tampering() {
        let mut model = SchemaModel::new("Test");
        model.add_hub(Hub::new("A", "a"));
        model.satellites.push(Satellite::new("GHOST", "x", SatelliteType::Business));
        model.hubs.push(Hub::new("a", "a"));

        let problems = model.validate();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_satellite_type_serializes_upper() {
        let json = serde_json::to_string(&SatelliteType::Pii).unwrap();
        assert_eq!(json, "\"PII\"");
    }
}
