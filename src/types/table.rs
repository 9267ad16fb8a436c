//! Response Table
//!
//! Immutable header-plus-records table loaded from a CSV export.
//! Row 0 is the header; every record has the header's width.
//!
//! Partitioning by a grouping column lives here as well, because both the
//! section splitter and the document fan-out share the same
//! distinct → sort → filter algorithm.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::error::{ReportError, Result, ValidationError, ValidationErrorKind};

/// A response table: one header row followed by data records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, rejecting records whose width differs from the header
    pub fn new(header: Vec<String>, records: Vec<Vec<String>>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            if record.len() != header.len() {
                return Err(ValidationError::new(
                    ValidationErrorKind::RowWidth,
                    "record width does not match the header",
                )
                .with_field(format!("row {}", index + 1))
                .with_comparison(header.len().to_string(), record.len().to_string())
                .into());
            }
        }
        Ok(Self { header, records })
    }

    /// Build a table from raw rows where the first row is the header
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingHeader,
                "table has no header row",
            )
            .into());
        }
        let header = rows.remove(0);
        Self::new(header, rows)
    }

    /// Load a comma-delimited file; the first record is the header
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| ReportError::input(path, format!("cannot open input: {}", e)))?;
        let table = Self::from_csv_reader(file)?;
        debug!(
            "Loaded {} records x {} columns from {}",
            table.len(),
            table.width(),
            path.display()
        );
        Ok(table)
    }

    /// Load CSV data from any reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Self::from_rows(rows)
    }

    /// Same header, different records
    pub fn with_records(&self, records: Vec<Vec<String>>) -> Self {
        Self {
            header: self.header.clone(),
            records,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data records (header excluded)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header label of a column
    pub fn column_name(&self, column: usize) -> &str {
        self.header.get(column).map(String::as_str).unwrap_or("")
    }

    /// Cells of a column across all data records, untrimmed
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.records
            .iter()
            .map(move |record| record.get(column).map(String::as_str).unwrap_or(""))
    }

    /// First data record's cell in a column
    pub fn first_value(&self, column: usize) -> Option<&str> {
        self.records
            .first()
            .and_then(|record| record.get(column))
            .map(String::as_str)
    }

    /// Check a column index against the header width
    pub fn check_column(&self, column: usize, field: &str) -> Result<()> {
        if column >= self.width() {
            return Err(ValidationError::new(
                ValidationErrorKind::ColumnRange,
                "column index is outside the table",
            )
            .with_field(field)
            .with_comparison(format!("< {}", self.width()), column.to_string())
            .into());
        }
        Ok(())
    }

    // =========================================================================
    // Partitioning
    // =========================================================================

    /// Distinct grouping keys of a column, ascending
    ///
    /// Keys are trimmed and non-empty. A multi-select cell
    /// (`"happy, sad"`) contributes each of its comma-separated answers.
    pub fn categories(&self, column: usize) -> Vec<String> {
        let keys: BTreeSet<&str> = self.column(column).flat_map(grouping_keys).collect();
        keys.into_iter().map(str::to_string).collect()
    }

    /// Records whose grouping cell holds `category`
    pub fn filter_category(&self, column: usize, category: &str) -> Table {
        let records = self
            .records
            .iter()
            .filter(|record| {
                record
                    .get(column)
                    .is_some_and(|cell| grouping_keys(cell).any(|key| key == category))
            })
            .cloned()
            .collect();
        self.with_records(records)
    }

    /// Split into one sub-table per category, in category order
    pub fn partition(&self, column: usize) -> Vec<(String, Table)> {
        self.categories(column)
            .into_iter()
            .map(|category| {
                let part = self.filter_category(column, &category);
                (category, part)
            })
            .filter(|(_, part)| !part.is_empty())
            .collect()
    }
}

/// Trimmed, non-empty answers held by a grouping cell
fn grouping_keys(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|key| !key.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
