//! CSV loading

use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::{Result, TabError};

/// Load a CSV file with a header row into a DataFrame
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| TabError::Data(format!("cannot open {}: {e}", path.display())))?;

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file);

    reader
        .finish()
        .map_err(|e| TabError::Data(format!("cannot parse {}: {e}", path.display())))
}
