//! Text output for query results, summaries and listings.

use crate::data::records_to_dataframe;
use crate::query::QueryResult;
use crate::stats::SeriesSummary;
use clap::ValueEnum;
use polars::prelude::*;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] PolarsError),
    #[error("Output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Format the records of a query result, ordered by country then year.
pub fn format_records(result: &QueryResult, format: OutputFormat) -> Result<String, ReportError> {
    let sorted = result.sorted_for_display();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&sorted)?),
        OutputFormat::Csv => {
            let owned: Vec<_> = sorted.into_iter().cloned().collect();
            let mut df = records_to_dataframe(&owned)?;
            frame_to_csv(&mut df)
        }
        OutputFormat::Table => {
            let width = sorted
                .iter()
                .map(|r| r.country.chars().count())
                .max()
                .unwrap_or(0)
                .max("country".len());

            let mut out = String::new();
            writeln!(out, "{:<width$}  {:>6}  {:>12}", "country", "year", "value")?;
            for r in &sorted {
                writeln!(out, "{:<width$}  {:>6}  {:>12}", r.country, r.year, r.value)?;
            }
            writeln!(out, "({} rows, years {})", sorted.len(), result.range)?;
            Ok(out)
        }
    }
}

/// Format per-country summaries.
pub fn format_summaries(
    summaries: &[SeriesSummary],
    format: OutputFormat,
) -> Result<String, ReportError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
        OutputFormat::Csv => {
            let mut df = DataFrame::new(vec![
                Column::new(
                    "country".into(),
                    summaries.iter().map(|s| s.country.as_str()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "count".into(),
                    summaries.iter().map(|s| s.count as u64).collect::<Vec<_>>(),
                ),
                Column::new(
                    "first_year".into(),
                    summaries.iter().map(|s| s.first_year).collect::<Vec<_>>(),
                ),
                Column::new(
                    "last_year".into(),
                    summaries.iter().map(|s| s.last_year).collect::<Vec<_>>(),
                ),
                Column::new("min".into(), summaries.iter().map(|s| s.min).collect::<Vec<_>>()),
                Column::new("max".into(), summaries.iter().map(|s| s.max).collect::<Vec<_>>()),
                Column::new("mean".into(), summaries.iter().map(|s| s.mean).collect::<Vec<_>>()),
                Column::new(
                    "median".into(),
                    summaries.iter().map(|s| s.median).collect::<Vec<_>>(),
                ),
                Column::new("std".into(), summaries.iter().map(|s| s.std).collect::<Vec<_>>()),
                Column::new(
                    "growth".into(),
                    summaries.iter().map(|s| s.growth).collect::<Vec<_>>(),
                ),
                Column::new("cagr".into(), summaries.iter().map(|s| s.cagr).collect::<Vec<_>>()),
            ])?;
            frame_to_csv(&mut df)
        }
        OutputFormat::Table => {
            let width = summaries
                .iter()
                .map(|s| s.country.chars().count())
                .max()
                .unwrap_or(0)
                .max("country".len());

            let mut out = String::new();
            writeln!(
                out,
                "{:<width$}  {:>5}  {:>9}  {:>10}  {:>10}  {:>12}  {:>12}  {:>8}",
                "country", "n", "years", "min", "max", "mean", "median", "cagr"
            )?;
            for s in summaries {
                let cagr = s
                    .cagr
                    .map(|c| format!("{:.2}%", c * 100.0))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{:<width$}  {:>5}  {:>9}  {:>10}  {:>10}  {:>12.1}  {:>12.1}  {:>8}",
                    s.country,
                    s.count,
                    format!("{}-{}", s.first_year, s.last_year),
                    s.min,
                    s.max,
                    s.mean,
                    s.median,
                    cagr
                )?;
            }
            Ok(out)
        }
    }
}

/// Format a plain list (countries, years) one item per line, or as JSON/CSV.
pub fn format_list<T: ToString + serde::Serialize>(
    header: &str,
    items: &[T],
    format: OutputFormat,
) -> Result<String, ReportError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => {
            let values: Vec<String> = items.iter().map(ToString::to_string).collect();
            let mut df = DataFrame::new(vec![Column::new(header.into(), values)])?;
            frame_to_csv(&mut df)
        }
        OutputFormat::Table => {
            let mut out = String::new();
            for item in items {
                writeln!(out, "{}", item.to_string())?;
            }
            Ok(out)
        }
    }
}

fn frame_to_csv(df: &mut DataFrame) -> Result<String, ReportError> {
    let mut buf: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buf).include_header(true).finish(df)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NormalizedRecord;
    use crate::query::YearRange;

    fn sample() -> QueryResult {
        QueryResult {
            range: YearRange::new(1950, 1951),
            records: vec![
                NormalizedRecord::new("USA", 1951, 31000),
                NormalizedRecord::new("Chad", 1950, 900),
                NormalizedRecord::new("USA", 1950, 30000),
            ],
        }
    }

    #[test]
    fn test_json_records_sorted() {
        let json = format_records(&sample(), OutputFormat::Json).unwrap();
        let parsed: Vec<NormalizedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            vec![
                NormalizedRecord::new("Chad", 1950, 900),
                NormalizedRecord::new("USA", 1950, 30000),
                NormalizedRecord::new("USA", 1951, 31000),
            ]
        );
    }

    #[test]
    fn test_csv_records() {
        let csv = format_records(&sample(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "country,year,value");
        assert_eq!(lines[1], "Chad,1950,900");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_table_records() {
        let table = format_records(&sample(), OutputFormat::Table).unwrap();
        assert!(table.starts_with("country"));
        assert!(table.contains("(3 rows, years 1950..1951)"));
    }

    #[test]
    fn test_list_formats() {
        let items = vec!["Chad".to_string(), "USA".to_string()];
        assert_eq!(
            format_list("country", &items, OutputFormat::Table).unwrap(),
            "Chad\nUSA\n"
        );
        let csv = format_list("country", &items, OutputFormat::Csv).unwrap();
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec!["country", "Chad", "USA"]);
    }

    #[test]
    fn test_summary_table() {
        let summaries = crate::stats::StatsCalculator::summarize(&sample());
        let table = format_summaries(&summaries, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Chad"));
        assert!(lines[2].contains("1950-1951"));
    }

    #[test]
    fn test_fmt_error_converts() {
        let err: ReportError = std::fmt::Error.into();
        assert!(matches!(err, ReportError::Fmt(_)));
    }
}
