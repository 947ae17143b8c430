//! Query module - country/year filtering

mod engine;
mod selection;

pub use engine::{QueryEngine, QueryResult};
pub use selection::{CountrySelection, QueryError, YearRange};
