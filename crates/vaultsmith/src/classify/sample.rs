//! Deterministic, bounded sampling of a column's non-missing values.

use crate::input::DataTable;

/// Sampled rows of one column.
///
/// Holds row indices rather than values so cross-column checks can look
/// at the same rows in other columns.
#[derive(Debug, Clone)]
pub struct ColumnSample<'a> {
    /// Sampled (row index, value) pairs in draw order.
    entries: Vec<(usize, &'a str)>,
    /// Number of missing values in the full column.
    null_count: usize,
}

impl<'a> ColumnSample<'a> {
    /// Draw at most `sample_size` non-missing values from a column.
    ///
    /// When every non-missing value fits, rows are kept in table order.
    /// Otherwise a partial Fisher-Yates shuffle seeded with `seed` picks
    /// the rows, so the same table, seed and size always yield the same
    /// sample.
    pub fn draw(table: &'a DataTable, col_index: usize, sample_size: usize, seed: u64) -> Self {
        let mut entries: Vec<(usize, &'a str)> = table.non_null_values(col_index).collect();
        let null_count = table.row_count() - entries.len();

        if entries.len() > sample_size {
            let mut rng = fastrand::Rng::with_seed(seed);
            for i in 0..sample_size {
                let j = rng.usize(i..entries.len());
                entries.swap(i, j);
            }
            entries.truncate(sample_size);
        }

        Self {
            entries,
            null_count,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Sampled values in draw order.
    pub fn values(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// Sampled (row, value) pairs in draw order.
    pub fn entries(&self) -> &[(usize, &'a str)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_table(rows: usize) -> DataTable {
        DataTable::from_columns(vec![(
            "n",
            (0..rows).map(|i| i.to_string()).collect::<Vec<_>>(),
        )])
    }

    #[test]
    fn test_small_column_kept_in_order() {
        let table = DataTable::from_columns(vec![("v", vec!["a", "", "b", "NA", "c"])]);
        let sample = ColumnSample::draw(&table, 0, 1000, 0);

        assert_eq!(sample.values().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(sample.null_count(), 2);
    }

    #[test]
    fn test_large_column_is_capped_and_deterministic() {
        let table = numbered_table(5000);
        let first = ColumnSample::draw(&table, 0, 100, 42);
        let second = ColumnSample::draw(&table, 0, 100, 42);

        assert_eq!(first.len(), 100);
        assert_eq!(first.entries(), second.entries());
    }

    #[test]
    fn test_sample_rows_are_distinct() {
        let table = numbered_table(300);
        let sample = ColumnSample::draw(&table, 0, 50, 7);
        let mut rows: Vec<usize> = sample.entries().iter().map(|(r, _)| *r).collect();
        rows.sort_unstable();
        rows.dedup();
        assert_eq!(rows.len(), 50);
    }
}
