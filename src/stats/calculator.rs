//! Statistics Calculator Module
//! Per-country descriptive statistics and growth over a query result.

use crate::query::QueryResult;
use rayon::prelude::*;
use serde::Serialize;

/// Summary of one country's series within the queried range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub country: String,
    pub count: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub first_value: u64,
    pub last_value: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    /// last / first; absent when the series starts at zero.
    pub growth: Option<f64>,
    /// Compound annual growth rate between the first and last year.
    pub cagr: Option<f64>,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the summary of one series. `points` must be sorted by year.
    pub fn summarize_series(country: &str, points: &[(i32, u64)]) -> Option<SeriesSummary> {
        let &(first_year, first_value) = points.first()?;
        let &(last_year, last_value) = points.last()?;

        let values: Vec<f64> = points.iter().map(|&(_, v)| v as f64).collect();
        let n = values.len();

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        let growth = (first_value > 0).then(|| last_value as f64 / first_value as f64);
        let span = last_year - first_year;
        let cagr = growth
            .filter(|_| span > 0)
            .map(|g| g.powf(1.0 / span as f64) - 1.0);

        Some(SeriesSummary {
            country: country.to_string(),
            count: n,
            first_year,
            last_year,
            first_value,
            last_value,
            min: points.iter().map(|&(_, v)| v).min()?,
            max: points.iter().map(|&(_, v)| v).max()?,
            mean,
            median,
            std: variance.sqrt(),
            growth,
            cagr,
        })
    }

    /// Summaries for every country in the result, ordered by country name.
    pub fn summarize(result: &QueryResult) -> Vec<SeriesSummary> {
        let series: Vec<(&str, Vec<(i32, u64)>)> =
            result.series_by_country().into_iter().collect();

        // Use rayon for parallel computation
        series
            .par_iter()
            .filter_map(|(country, points)| Self::summarize_series(country, points))
            .collect()
    }
}
