//! Datamodel definition registry: definition texts keyed by datamodel name,
//! decoded once from the metadata tree.

use ahash::AHashMap;
use telar_common::{Result, error::Error};

use crate::defs::DatamodelDefinitions;

/// Holds the datamodel definition texts available from a dataset.
#[derive(Debug, Default)]
pub struct DatamodelRegistry {
    names: Vec<String>,
    definitions: AHashMap<String, String>,
}

impl DatamodelRegistry {
    /// Builds the registry from the decoded on-disk record.
    ///
    /// # Errors
    ///
    /// Returns an error if the name and definition lists differ in length.
    pub fn from_record(record: DatamodelDefinitions) -> Result<DatamodelRegistry> {
        if record.names.len() != record.definitions.len() {
            return Err(Error::invalid_format("datamodel definitions"));
        }
        let definitions = record
            .names
            .iter()
            .cloned()
            .zip(record.definitions)
            .collect();
        Ok(DatamodelRegistry {
            names: record.names,
            definitions,
        })
    }

    /// Returns the definition text for the given datamodel name.
    pub fn definition(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    /// Names of all available datamodels, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
