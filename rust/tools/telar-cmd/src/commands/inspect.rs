//! Inspect command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use telar_format::{
    defs,
    metadata::CategoryMetadata,
    record,
};
use telar_store::{BranchColumn, FileSegment, SegmentSource, TreeSegment};

use crate::commands::open_reader;

#[derive(Serialize)]
struct InspectSummary {
    file_version: String,
    segment_count: usize,
    categories: Vec<CategoryInfo>,
    datamodels: Vec<String>,
}

#[derive(Serialize)]
struct CategoryInfo {
    name: String,
    entry_count: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    collections: Vec<CollectionInfo>,
}

#[derive(Serialize)]
struct CollectionInfo {
    name: String,
    id: u32,
    subset: bool,
    schema_version: u32,
    reference_branches: u32,
    member_branches: u32,
}

pub fn run(verbose: u8, files: Vec<String>) -> Result<()> {
    let mut reader = open_reader(&files)?;

    let mut categories = Vec::new();
    for name in reader.available_categories().to_vec() {
        let collections = if verbose > 0 {
            collection_declarations(&files[0], &name)?
        } else {
            Vec::new()
        };
        categories.push(CategoryInfo {
            entry_count: reader.entry_count(&name),
            name,
            collections,
        });
    }

    let summary = InspectSummary {
        file_version: reader.file_version().to_string(),
        segment_count: files.len(),
        categories,
        datamodels: reader.available_datamodels().to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Decodes the collection declarations of one category straight from the
/// metadata tree of the first file.
fn collection_declarations(file: &str, category: &str) -> Result<Vec<CollectionInfo>> {
    let segment = FileSegment::open(file)?;
    let metadata = segment
        .open_tree(defs::METADATA_TREE_NAME)
        .with_context(|| format!("No metadata tree in '{file}'"))?;
    let branch = defs::collection_info_branch(category);
    let column = metadata
        .open_branch(&branch)
        .with_context(|| format!("No collection metadata for '{category}'"))?;
    let info = record::decode_payload(&branch, &column.read_cell(0)?)?;
    let decoded = CategoryMetadata::from_record(category, info)?;

    Ok(decoded
        .collections
        .into_iter()
        .map(|meta| CollectionInfo {
            name: meta.name,
            id: meta.id,
            subset: meta.is_subset,
            schema_version: meta.schema_version,
            reference_branches: meta.reference_count,
            member_branches: meta.member_count,
        })
        .collect())
}
