//! Data Processor Module
//! Reshapes the wide table to long format (melt) and cleans cell values.

use super::loader::WideTable;
use super::record::{Dataset, NormalizedRecord};
use super::value::{normalize_value, ValueError};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Column header '{header}' is not a year")]
    MalformedHeader { header: String },
    #[error("Malformed value {value:?} for {country} in {year}: {source}")]
    MalformedValue {
        country: String,
        year: i32,
        value: String,
        #[source]
        source: ValueError,
    },
    #[error("Country '{0}' appears more than once")]
    DuplicateCountry(String),
    #[error("Year {0} appears more than once")]
    DuplicateYear(i32),
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse a year column header.
    pub fn parse_year(header: &str) -> Result<i32, ProcessorError> {
        header
            .trim()
            .parse::<i32>()
            .map_err(|_| ProcessorError::MalformedHeader {
                header: header.to_string(),
            })
    }

    /// Transform the wide table to long format, one record per (country, year) cell.
    ///
    /// Any malformed header or value rejects the whole table.
    pub fn reshape(table: &WideTable) -> Result<Dataset, ProcessorError> {
        let mut years: Vec<i32> = Vec::with_capacity(table.year_headers.len());
        let mut seen_years = HashSet::new();
        for header in &table.year_headers {
            let year = Self::parse_year(header)?;
            if !seen_years.insert(year) {
                return Err(ProcessorError::DuplicateYear(year));
            }
            years.push(year);
        }

        let mut countries: Vec<String> = Vec::with_capacity(table.rows.len());
        let mut seen_countries = HashSet::new();
        let mut records: Vec<NormalizedRecord> = Vec::with_capacity(table.cell_count());

        for row in &table.rows {
            if !seen_countries.insert(row.country.as_str()) {
                return Err(ProcessorError::DuplicateCountry(row.country.clone()));
            }
            countries.push(row.country.clone());

            for (&year, cell) in years.iter().zip(&row.cells) {
                let raw = cell.as_deref().unwrap_or("");
                let value =
                    normalize_value(raw).map_err(|source| ProcessorError::MalformedValue {
                        country: row.country.clone(),
                        year,
                        value: raw.to_string(),
                        source,
                    })?;
                records.push(NormalizedRecord::new(row.country.as_str(), year, value));
            }
        }

        tracing::info!(
            countries = countries.len(),
            years = years.len(),
            records = records.len(),
            "Reshaped to long format"
        );

        Ok(Dataset::new(records, countries, years))
    }
}
