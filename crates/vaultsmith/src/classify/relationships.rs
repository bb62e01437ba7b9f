//! Foreign-key discovery between columns.
//!
//! Three heuristics run against every other column of the same table:
//! - **name suffix**: the other column's name ends this column's name
//!   (`order_customer_id` → `customer_id`)
//! - **value overlap**: more than 70% of this column's distinct sampled
//!   values appear in the other column
//! - **cardinality**: this column is at least 80% as distinct as the other
//!   and functionally determines it on the sampled rows
//!
//! For multi-table datasets, value overlap is also tested against the
//! candidate-key columns of the other tables.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::sample::ColumnSample;
use crate::input::DataTable;

/// Which heuristic produced a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipHeuristic {
    NameSuffix,
    ValueOverlap,
    Cardinality,
    CrossTableOverlap,
}

/// A discovered foreign-key candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    /// Header of the referenced column.
    pub column: String,
    /// Table of the referenced column, when it lives in another table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub heuristic: RelationshipHeuristic,
    /// Overlap or cardinality ratio behind the match (1.0 for name matches).
    pub score: f64,
}

/// Pre-computed distinct value sets for every column of a table.
///
/// Building this once per table keeps batch classification linear in
/// the number of column pairs rather than re-scanning each column.
#[derive(Debug)]
pub struct TableIndex<'a> {
    table: &'a DataTable,
    distinct: Vec<HashSet<&'a str>>,
    non_null: Vec<usize>,
}

impl<'a> TableIndex<'a> {
    pub fn build(table: &'a DataTable) -> Self {
        let mut distinct = Vec::with_capacity(table.column_count());
        let mut non_null = Vec::with_capacity(table.column_count());

        for col in 0..table.column_count() {
            let mut set = HashSet::new();
            let mut count = 0;
            for (_, value) in table.non_null_values(col) {
                set.insert(value);
                count += 1;
            }
            distinct.push(set);
            non_null.push(count);
        }

        Self {
            table,
            distinct,
            non_null,
        }
    }

    pub fn table(&self) -> &'a DataTable {
        self.table
    }

    /// Distinct non-missing values of a column.
    pub fn distinct(&self, col: usize) -> &HashSet<&'a str> {
        &self.distinct[col]
    }

    /// Non-empty column whose non-missing values are all distinct.
    pub fn is_candidate_key(&self, col: usize) -> bool {
        self.non_null[col] > 0 && self.distinct[col].len() == self.non_null[col]
    }
}

/// Heuristic foreign-key resolver.
#[derive(Debug, Clone)]
pub struct RelationshipResolver {
    /// Share of distinct sampled values that must appear in the other column.
    overlap_threshold: f64,
    /// Minimum distinct-count ratio for the cardinality test.
    cardinality_ratio: f64,
}

impl RelationshipResolver {
    pub fn new() -> Self {
        Self {
            overlap_threshold: 0.7,
            cardinality_ratio: 0.8,
        }
    }

    /// Find columns of the same table that `col` may reference.
    pub fn resolve(
        &self,
        index: &TableIndex<'_>,
        col: usize,
        sample: &ColumnSample<'_>,
    ) -> Vec<RelationshipCandidate> {
        let table = index.table();
        let name = table.headers[col].to_lowercase();
        let sample_set: HashSet<&str> = sample.values().collect();
        let mut found = Vec::new();

        for (other, other_header) in table.headers.iter().enumerate() {
            if other == col || other_header.is_empty() {
                continue;
            }

            if name.ends_with(&other_header.to_lowercase()) {
                found.push(candidate(other_header, None, RelationshipHeuristic::NameSuffix, 1.0));
                continue;
            }

            let other_set = index.distinct(other);
            if other_set.is_empty() || sample_set.is_empty() {
                continue;
            }

            let overlap = overlap_ratio(&sample_set, other_set);
            if overlap > self.overlap_threshold {
                found.push(candidate(
                    other_header,
                    None,
                    RelationshipHeuristic::ValueOverlap,
                    overlap,
                ));
                continue;
            }

            let ratio = sample_set.len() as f64 / other_set.len() as f64;
            if ratio >= self.cardinality_ratio && determines(table, sample, other, sample_set.len())
            {
                found.push(candidate(
                    other_header,
                    None,
                    RelationshipHeuristic::Cardinality,
                    ratio,
                ));
            }
        }

        found
    }

    /// Find candidate-key columns of other tables that `sample` overlaps.
    ///
    /// Columns already named in `existing` are not reported twice.
    pub fn resolve_across(
        &self,
        sample: &ColumnSample<'_>,
        foreign: &[(&str, &TableIndex<'_>)],
        existing: &[RelationshipCandidate],
    ) -> Vec<RelationshipCandidate> {
        let sample_set: HashSet<&str> = sample.values().collect();
        if sample_set.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<RelationshipCandidate> = Vec::new();
        for (table_name, index) in foreign {
            for (other, other_header) in index.table().headers.iter().enumerate() {
                if !index.is_candidate_key(other) {
                    continue;
                }
                let already = existing
                    .iter()
                    .chain(found.iter())
                    .any(|c| c.column == *other_header);
                if already {
                    continue;
                }

                let overlap = overlap_ratio(&sample_set, index.distinct(other));
                if overlap > self.overlap_threshold {
                    found.push(candidate(
                        other_header,
                        Some(*table_name),
                        RelationshipHeuristic::CrossTableOverlap,
                        overlap,
                    ));
                }
            }
        }

        found
    }
}

impl Default for RelationshipResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate(
    column: &str,
    table: Option<&str>,
    heuristic: RelationshipHeuristic,
    score: f64,
) -> RelationshipCandidate {
    RelationshipCandidate {
        column: column.to_string(),
        table: table.map(str::to_string),
        heuristic,
        score,
    }
}

/// |sample ∩ other| / |sample|.
fn overlap_ratio(sample_set: &HashSet<&str>, other_set: &HashSet<&str>) -> f64 {
    let shared = sample_set.iter().filter(|v| other_set.contains(*v)).count();
    shared as f64 / sample_set.len() as f64
}

/// True when the sampled rows never pair one value of this column with
/// two different values of `other` (a many-to-one mapping).
fn determines(
    table: &DataTable,
    sample: &ColumnSample<'_>,
    other: usize,
    distinct_count: usize,
) -> bool {
    let pairs: HashSet<(&str, Option<&str>)> = sample
        .entries()
        .iter()
        .map(|&(row, value)| {
            let other_value = table
                .get(row, other)
                .filter(|v| !DataTable::is_null_value(v));
            (value, other_value)
        })
        .collect();
    pairs.len() == distinct_count
}
