//! gdpview - GDP per capita normalizer, query engine and chart renderer
//!
//! Loads a wide CSV (one row per country, one column per year), reshapes it to
//! (country, year, value) records with "k" shorthand resolved, and answers
//! country/year filter queries whose results can be summarized or drawn as a
//! line chart.

pub mod charts;
pub mod config;
pub mod data;
pub mod query;
pub mod report;
pub mod stats;

pub use data::{load_dataset, parse_dataset, Dataset, NormalizedRecord};
pub use query::{CountrySelection, QueryEngine, QueryResult, YearRange};
