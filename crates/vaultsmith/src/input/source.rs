//! In-memory tables and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Metadata about a loaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }

    /// File name without its extension, used as the default table name.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone())
    }
}

/// Rectangular table of string cells.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Build a table from column-major data.
    ///
    /// Shorter columns are padded with empty (missing) cells.
    pub fn from_columns<H, V>(columns: Vec<(H, Vec<V>)>) -> Self
    where
        H: Into<String>,
        V: Into<String>,
    {
        let mut headers = Vec::with_capacity(columns.len());
        let mut data: Vec<Vec<String>> = Vec::with_capacity(columns.len());
        for (header, values) in columns {
            headers.push(header.into());
            data.push(values.into_iter().map(Into::into).collect());
        }

        let row_count = data.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..row_count)
            .map(|r| {
                data.iter()
                    .map(|col| col.get(r).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self::new(headers, rows, b',')
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column, failing with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| VaultError::ColumnNotFound {
            column: name.to_string(),
        })
    }

    /// All values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Non-missing values for a column, paired with their row index.
    pub fn non_null_values(&self, index: usize) -> impl Iterator<Item = (usize, &str)> {
        self.column_values(index)
            .enumerate()
            .filter(|(_, v)| !Self::is_null_value(v))
    }

    /// A specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Whether a cell represents a missing value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
    }

    /// Fail with `EmptyInput` when the table has no rows or no columns.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.headers.is_empty() {
            return Err(VaultError::EmptyInput("table has no columns".to_string()));
        }
        if self.rows.is_empty() {
            return Err(VaultError::EmptyInput("table has no rows".to_string()));
        }
        Ok(())
    }
}

/// A table together with the name it is known by in a dataset.
#[derive(Debug, Clone)]
pub struct NamedTable {
    pub name: String,
    pub table: DataTable,
}

/// Ordered collection of tables analyzed together.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tables: Vec<NamedTable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table. Order is preserved and drives profile order.
    pub fn with_table(mut self, name: impl Into<String>, table: DataTable) -> Self {
        self.push(name, table);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, table: DataTable) {
        self.tables.push(NamedTable {
            name: name.into(),
            table,
        });
    }

    pub fn tables(&self) -> &[NamedTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.table.column_count()).sum()
    }
}
