//! Normalized records and the immutable dataset built from them.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One (country, year, value) observation in long format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub country: String,
    pub year: i32,
    pub value: u64,
}

impl NormalizedRecord {
    pub fn new(country: impl Into<String>, year: i32, value: u64) -> Self {
        Self {
            country: country.into(),
            year,
            value,
        }
    }
}

/// All normalized records, derived once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<NormalizedRecord>,
    countries: Vec<String>,
    years: Vec<i32>,
}

impl Dataset {
    /// `countries` keeps source row order, `years` is sorted ascending.
    pub(crate) fn new(
        records: Vec<NormalizedRecord>,
        countries: Vec<String>,
        mut years: Vec<i32>,
    ) -> Self {
        years.sort_unstable();
        years.dedup();
        Self {
            records,
            countries,
            years,
        }
    }

    /// Build a dataset from long-format records, deriving countries in first-seen order.
    pub fn from_records(records: Vec<NormalizedRecord>) -> Self {
        let countries: Vec<String> = {
            let mut seen = HashSet::new();
            records
                .iter()
                .filter(|r| seen.insert(r.country.as_str()))
                .map(|r| r.country.clone())
                .collect()
        };
        let years = records.iter().map(|r| r.year).collect();
        Self::new(records, countries, years)
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Earliest and latest year present.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    pub fn contains_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build a long-format DataFrame with columns [country, year, value].
pub fn records_to_dataframe(records: &[NormalizedRecord]) -> PolarsResult<DataFrame> {
    let countries: Vec<&str> = records.iter().map(|r| r.country.as_str()).collect();
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let values: Vec<u64> = records.iter().map(|r| r.value).collect();

    DataFrame::new(vec![
        Column::new("country".into(), countries),
        Column::new("year".into(), years),
        Column::new("value".into(), values),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds_sorted() {
        let ds = Dataset::new(
            vec![
                NormalizedRecord::new("A", 1990, 1),
                NormalizedRecord::new("A", 1980, 2),
            ],
            vec!["A".to_string()],
            vec![1990, 1980],
        );
        assert_eq!(ds.years(), &[1980, 1990]);
        assert_eq!(ds.year_bounds(), Some((1980, 1990)));
        assert!(ds.contains_country("A"));
        assert!(!ds.contains_country("B"));
    }

    #[test]
    fn test_from_records_first_seen_countries() {
        let ds = Dataset::from_records(vec![
            NormalizedRecord::new("USA", 1951, 2),
            NormalizedRecord::new("Chad", 1950, 3),
            NormalizedRecord::new("USA", 1950, 1),
            NormalizedRecord::new("Chad", 1951, 4),
        ]);
        assert_eq!(ds.countries(), &["USA", "Chad"]);
        assert_eq!(ds.years(), &[1950, 1951]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn test_empty_dataset_bounds() {
        assert_eq!(Dataset::default().year_bounds(), None);
    }

    #[test]
    fn test_records_to_dataframe() {
        let df = records_to_dataframe(&[
            NormalizedRecord::new("USA", 1950, 30000),
            NormalizedRecord::new("France", 1950, 21000),
        ])
        .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.get_column_names().len(), 3);
        let years = df.column("year").unwrap().as_materialized_series();
        assert_eq!(years.i32().unwrap().get(1), Some(1950));
    }
}
