//! Datamodels command implementation

use anyhow::{Context, Result};

use crate::commands::open_reader;

pub fn run(name: Option<String>, files: Vec<String>) -> Result<()> {
    let reader = open_reader(&files)?;

    match name {
        Some(name) => {
            let definition = reader
                .datamodel_definition(&name)
                .with_context(|| format!("No datamodel named '{name}'"))?;
            println!("{definition}");
        }
        None => {
            for name in reader.available_datamodels() {
                println!("{name}");
            }
        }
    }
    Ok(())
}
