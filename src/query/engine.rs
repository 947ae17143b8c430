//! Filter queries over the normalized dataset.

use super::selection::{CountrySelection, YearRange};
use crate::data::{Dataset, NormalizedRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Answers country/year filter queries. Holds the dataset read-only.
pub struct QueryEngine {
    dataset: Dataset,
}

impl QueryEngine {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Records whose country is selected and whose year lies in `range`.
    ///
    /// Unknown countries contribute nothing; an empty selection or an
    /// inverted range gives an empty result.
    pub fn filter(&self, countries: &CountrySelection, range: YearRange) -> QueryResult {
        let records: Vec<NormalizedRecord> = if countries.is_empty() || range.is_empty() {
            Vec::new()
        } else {
            self.dataset
                .records()
                .iter()
                .filter(|r| countries.contains(&r.country) && range.contains(r.year))
                .cloned()
                .collect()
        };

        tracing::debug!(
            countries = countries.len(),
            range = %range,
            matched = records.len(),
            "Filter query"
        );

        QueryResult { range, records }
    }

    /// Selection covering every country in the dataset.
    pub fn all_countries(&self) -> CountrySelection {
        self.dataset.countries().iter().cloned().collect()
    }

    /// Selected names that do not exist in the dataset.
    pub fn unknown_countries<'a>(&self, countries: &'a CountrySelection) -> Vec<&'a str> {
        countries
            .iter()
            .filter(|c| !self.dataset.contains_country(c))
            .collect()
    }
}

/// Output of a filter query, in dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub range: YearRange,
    pub records: Vec<NormalizedRecord>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records ordered by country, then year.
    pub fn sorted_for_display(&self) -> Vec<&NormalizedRecord> {
        let mut sorted: Vec<&NormalizedRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
        sorted
    }

    /// (year, value) points per country, each series sorted by year.
    pub fn series_by_country(&self) -> BTreeMap<&str, Vec<(i32, u64)>> {
        let mut series: BTreeMap<&str, Vec<(i32, u64)>> = BTreeMap::new();
        for record in &self.records {
            series
                .entry(record.country.as_str())
                .or_default()
                .push((record.year, record.value));
        }
        for points in series.values_mut() {
            points.sort_by_key(|&(year, _)| year);
        }
        series
    }

    /// Smallest and largest year actually present.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    pub fn max_value(&self) -> Option<u64> {
        self.records.iter().map(|r| r.value).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QueryEngine {
        QueryEngine::new(Dataset::from_records(vec![
            NormalizedRecord::new("USA", 1949, 29000),
            NormalizedRecord::new("USA", 1950, 30000),
            NormalizedRecord::new("USA", 1951, 31000),
            NormalizedRecord::new("Chad", 1950, 900),
            NormalizedRecord::new("Chad", 1951, 950),
        ]))
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let result = engine().filter(&CountrySelection::empty(), YearRange::new(1800, 2100));
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_year_single_country() {
        let result = engine().filter(&"USA".into(), YearRange::new(1950, 1950));
        assert_eq!(result.records, vec![NormalizedRecord::new("USA", 1950, 30000)]);
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let e = engine();
        let all = e.all_countries();
        assert!(e.filter(&all, YearRange::new(1951, 1950)).is_empty());
    }

    #[test]
    fn test_range_is_inclusive() {
        let result = engine().filter(&"USA".into(), YearRange::new(1949, 1951));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_unknown_country_is_silent() {
        let e = engine();
        let sel: CountrySelection = ["Chad", "Atlantis"].into_iter().collect();
        let result = e.filter(&sel, YearRange::new(1800, 2100));

        assert_eq!(result.len(), 2);
        assert!(result.records.iter().all(|r| r.country == "Chad"));
        assert_eq!(e.unknown_countries(&sel), vec!["Atlantis"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let e = engine();
        let sel: CountrySelection = ["USA", "Chad"].into_iter().collect();
        let range = YearRange::new(1950, 1951);
        assert_eq!(e.filter(&sel, range), e.filter(&sel, range));
    }

    #[test]
    fn test_single_value_matches_one_element_list() {
        let e = engine();
        let range = YearRange::new(1800, 2100);
        assert_eq!(
            e.filter(&CountrySelection::from("Chad"), range),
            e.filter(&CountrySelection::from(vec!["Chad".to_string()]), range)
        );
    }

    #[test]
    fn test_display_order_and_series() {
        let e = engine();
        let result = e.filter(&e.all_countries(), YearRange::new(1950, 1951));

        let order: Vec<(&str, i32)> = result
            .sorted_for_display()
            .iter()
            .map(|r| (r.country.as_str(), r.year))
            .collect();
        assert_eq!(
            order,
            vec![("Chad", 1950), ("Chad", 1951), ("USA", 1950), ("USA", 1951)]
        );

        let series = result.series_by_country();
        assert_eq!(series["USA"], vec![(1950, 30000), (1951, 31000)]);
        assert_eq!(result.year_span(), Some((1950, 1951)));
        assert_eq!(result.max_value(), Some(31000));
    }
}
