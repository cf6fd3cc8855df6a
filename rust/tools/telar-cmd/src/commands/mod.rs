//! Command implementations for telar-cmd

use anyhow::{Context, Result};
use telar_dataset::read::DatasetReader;

pub mod datamodels;
pub mod dump;
pub mod inspect;

/// Opens a chained reader over the given dataset files.
pub fn open_reader(files: &[String]) -> Result<DatasetReader> {
    DatasetReader::open_files(files).with_context(|| format!("Failed to open {files:?}"))
}
