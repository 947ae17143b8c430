//! Stats module - per-country series summaries

mod calculator;

pub use calculator::{SeriesSummary, StatsCalculator};
