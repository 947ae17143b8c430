//! Data module - CSV loading, value cleanup and reshaping

mod loader;
mod processor;
mod record;
mod value;

pub use loader::{DataLoader, LoaderError, RawRecord, WideTable};
pub use processor::{DataProcessor, ProcessorError};
pub use record::{records_to_dataframe, Dataset, NormalizedRecord};
pub use value::{normalize_value, CellValue, Number, ValueError};

use std::path::Path;
use thiserror::Error;

/// Anything that can stop the startup load.
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Reshape(#[from] ProcessorError),
}

/// Load a wide CSV file and reshape it in one step. No partial dataset is returned.
pub fn load_dataset(path: &Path, id_column: &str) -> Result<Dataset, DataError> {
    let table = DataLoader::new(id_column).load_csv(path)?;
    Ok(DataProcessor::reshape(&table)?)
}

/// Same as [`load_dataset`] for CSV text held in memory.
pub fn parse_dataset(text: &str, id_column: &str) -> Result<Dataset, DataError> {
    let table = DataLoader::new(id_column).parse_str(text)?;
    Ok(DataProcessor::reshape(&table)?)
}
