//! CSV Data Loader Module
//! Reads the wide GDP table (one row per country, one column per year) using Polars.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing identifier column '{0}'")]
    MissingColumn(String),
    #[error("Row {row} has no country identifier")]
    MissingCountry { row: usize },
    #[error("No data rows")]
    EmptyInput,
}

/// One country's row as read from the file, before any value cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub country: String,
    /// One cell per year header, `None` where the file had no value.
    pub cells: Vec<Option<String>>,
}

/// The file contents in wide form: an identifier column plus one column per year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideTable {
    pub id_column: String,
    pub year_headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl WideTable {
    /// Number of columns including the identifier column.
    pub fn width(&self) -> usize {
        self.year_headers.len() + 1
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of (country, year) cells.
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.year_headers.len()
    }
}

/// Handles CSV file loading with Polars.
///
/// Every column is read as text so "k"-suffixed and plain values reach the
/// value parser unchanged.
pub struct DataLoader {
    id_column: String,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new("country")
    }
}

impl DataLoader {
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
        }
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Load a CSV file into a wide table.
    pub fn load_csv(&self, file_path: &Path) -> Result<WideTable, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        // Schema inference length 0 keeps every column as a string
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        tracing::info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded CSV"
        );

        self.to_wide_table(&df)
    }

    /// Parse CSV text already held in memory.
    pub fn parse_str(&self, text: &str) -> Result<WideTable, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        self.to_wide_table(&df)
    }

    /// Split a string-typed DataFrame into the identifier column and year columns.
    pub fn to_wide_table(&self, df: &DataFrame) -> Result<WideTable, LoaderError> {
        let id_index = df
            .get_column_names()
            .iter()
            .position(|name| name.as_str().trim() == self.id_column)
            .ok_or_else(|| LoaderError::MissingColumn(self.id_column.clone()))?;

        if df.height() == 0 {
            return Err(LoaderError::EmptyInput);
        }

        let names: Vec<&str> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.as_str())
            .collect();
        let mut id_values: Vec<Option<String>> = Vec::new();
        let mut year_headers: Vec<String> = Vec::new();
        let mut year_values: Vec<Vec<Option<String>>> = Vec::new();

        for (idx, column) in df.get_columns().iter().enumerate() {
            let series = column.as_materialized_series().cast(&DataType::String)?;
            let values: Vec<Option<String>> = series
                .str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect();

            if idx == id_index {
                id_values = values;
            } else {
                let header = source_header(column.name().as_str(), &names);
                year_headers.push(header.trim().to_string());
                year_values.push(values);
            }
        }

        let mut rows = Vec::with_capacity(df.height());
        for (row, id) in id_values.into_iter().enumerate() {
            let country = id
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(LoaderError::MissingCountry { row: row + 1 })?;

            let cells = year_values.iter().map(|col| col[row].clone()).collect();
            rows.push(RawRecord { country, cells });
        }

        tracing::debug!(
            countries = rows.len(),
            years = year_headers.len(),
            "Built wide table"
        );

        Ok(WideTable {
            id_column: self.id_column.clone(),
            year_headers,
            rows,
        })
    }
}

/// Polars renames a repeated header to `<name>_duplicated_<n>`. Undo that
/// when `<name>` is itself a column, so the reshape sees the header twice.
fn source_header<'a>(name: &'a str, names: &[&str]) -> &'a str {
    match name.rsplit_once("_duplicated_") {
        Some((base, n))
            if !n.is_empty()
                && n.bytes().all(|b| b.is_ascii_digit())
                && names.contains(&base) =>
        {
            base
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wide_table() {
        let csv = "country,1800,1801\nUSA,2k,2.1k\nFrance,1500,1600\n";
        let table = DataLoader::default().parse_str(csv).unwrap();

        assert_eq!(table.id_column, "country");
        assert_eq!(table.year_headers, vec!["1800", "1801"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.width(), 3);
        assert_eq!(table.cell_count(), 4);
        assert_eq!(table.rows[0].country, "USA");
        assert_eq!(
            table.rows[0].cells,
            vec![Some("2k".to_string()), Some("2.1k".to_string())]
        );
    }

    #[test]
    fn test_numeric_looking_columns_stay_text() {
        let csv = "country,1950\nUSA,30000\n";
        let table = DataLoader::default().parse_str(csv).unwrap();
        assert_eq!(table.rows[0].cells, vec![Some("30000".to_string())]);
    }

    #[test]
    fn test_identifier_column_not_first() {
        let csv = "1990,name,1991\n10,Chad,11\n";
        let table = DataLoader::new("name").parse_str(csv).unwrap();

        assert_eq!(table.year_headers, vec!["1990", "1991"]);
        assert_eq!(table.rows[0].country, "Chad");
        assert_eq!(
            table.rows[0].cells,
            vec![Some("10".to_string()), Some("11".to_string())]
        );
    }

    #[test]
    fn test_missing_identifier_column() {
        let csv = "nation,1800\nUSA,1\n";
        let err = DataLoader::default().parse_str(csv).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(c) if c == "country"));
    }

    #[test]
    fn test_repeated_header_kept() {
        let csv = "country,1950,1950\nUSA,1,2\n";
        let table = DataLoader::default().parse_str(csv).unwrap();
        assert_eq!(table.year_headers, vec!["1950", "1950"]);
    }

    #[test]
    fn test_source_header() {
        let names = ["country", "1950", "1950_duplicated_0"];
        assert_eq!(source_header("1950_duplicated_0", &names), "1950");
        assert_eq!(source_header("1960_duplicated_0", &names), "1960_duplicated_0");
        assert_eq!(source_header("1950_duplicated_x", &names), "1950_duplicated_x");
        assert_eq!(source_header("1950", &names), "1950");
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let err = DataLoader::default().parse_str("country,1950\n").unwrap_err();
        assert!(matches!(err, LoaderError::EmptyInput));
    }

    #[test]
    fn test_blank_identifier_rejected() {
        let err = DataLoader::default()
            .parse_str("country,1950\nUSA,4\n,5\n")
            .unwrap_err();
        assert!(matches!(err, LoaderError::MissingCountry { row: 2 }));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::default()
            .load_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }
}
