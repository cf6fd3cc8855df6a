//! Synthetic dataset generation.
//!
//! Cell contents are a deterministic function of (collection, branch kind,
//! global entry ordinal), so tests can assert exact buffer bytes and verify
//! idempotence across re-reads and segment boundaries.

use telar_format::{
    defs::{self, CategoryInfoRecord, DatamodelDefinitions, VersionRecord},
    record,
    version::Version,
};
use telar_frame::EntryParameters;
use telar_store::{MemorySegment, MemorySegmentBuilder, TreeBuilder};

/// The "events" category: a full collection with a vector member, a full
/// collection with a reference, and a subset view.
pub fn events_info_record() -> CategoryInfoRecord {
    CategoryInfoRecord {
        ids: vec![1, 2, 3],
        names: vec![
            "hits".to_string(),
            "tracks".to_string(),
            "selected_hits".to_string(),
        ],
        subset_flags: vec![false, false, true],
        schema_versions: vec![2, 1, 1],
        reference_counts: vec![0, 1, 1],
        member_counts: vec![1, 0, 0],
    }
}

/// The "runs" category: a single plain collection.
pub fn runs_info_record() -> CategoryInfoRecord {
    CategoryInfoRecord {
        ids: vec![1],
        names: vec!["summaries".to_string()],
        subset_flags: vec![false],
        schema_versions: vec![1],
        reference_counts: vec![0],
        member_counts: vec![0],
    }
}

pub fn payload_cell(collection: &str, entry: u64) -> Vec<u8> {
    format!("{collection}/payload/{entry}").into_bytes()
}

pub fn reference_cell(collection: &str, index: u32, entry: u64) -> Vec<u8> {
    format!("{collection}/ref{index}/{entry}").into_bytes()
}

pub fn member_cell(collection: &str, index: u32, entry: u64) -> Vec<u8> {
    format!("{collection}/member{index}/{entry}").into_bytes()
}

pub fn entry_parameters(category: &str, entry: u64) -> EntryParameters {
    let mut parameters = EntryParameters::new();
    parameters
        .ints
        .insert("global_entry".to_string(), vec![entry as i32]);
    parameters
        .strings
        .insert("category".to_string(), vec![category.to_string()]);
    parameters
}

pub const TEST_DATAMODEL: &str = "test_model";

pub fn test_datamodels() -> DatamodelDefinitions {
    DatamodelDefinitions {
        names: vec![TEST_DATAMODEL.to_string()],
        definitions: vec!["{\"types\":[\"Hit\",\"Track\"]}".to_string()],
    }
}

/// Builds the reserved metadata tree for the given category declarations.
pub fn metadata_tree(infos: &[(&str, &CategoryInfoRecord)]) -> TreeBuilder {
    let mut tree = TreeBuilder::new(defs::METADATA_TREE_NAME)
        .branch(
            defs::BUILD_VERSION_BRANCH,
            vec![encode(&VersionRecord::from(Version::CURRENT))],
        )
        .branch(defs::DATAMODELS_BRANCH, vec![encode(&test_datamodels())]);
    for (category, info) in infos {
        tree = tree.branch(defs::collection_info_branch(category), vec![encode(info)]);
    }
    tree
}

/// Builds a category data tree holding entries `first_entry..first_entry +
/// entry_count` of the logical space.
pub fn category_tree(
    category: &str,
    info: &CategoryInfoRecord,
    first_entry: u64,
    entry_count: u64,
) -> TreeBuilder {
    let entries = || (0..entry_count).map(|i| first_entry + i);
    let mut tree = TreeBuilder::new(category);
    for (pos, collection) in info.names.iter().enumerate() {
        let is_subset = info.subset_flags.get(pos).copied().unwrap_or(false);
        if !is_subset {
            tree = tree.branch(
                defs::payload_branch(collection),
                entries().map(|e| payload_cell(collection, e)).collect(),
            );
        }
        for index in 0..info.reference_counts.get(pos).copied().unwrap_or(0) {
            tree = tree.branch(
                defs::reference_branch(collection, index),
                entries()
                    .map(|e| reference_cell(collection, index, e))
                    .collect(),
            );
        }
        if !is_subset {
            for index in 0..info.member_counts.get(pos).copied().unwrap_or(0) {
                tree = tree.branch(
                    defs::member_branch(collection, index),
                    entries()
                        .map(|e| member_cell(collection, index, e))
                        .collect(),
                );
            }
        }
    }
    tree.branch(
        defs::PARAMETERS_BRANCH,
        entries()
            .map(|e| encode(&entry_parameters(category, e)))
            .collect(),
    )
}

/// One category's contribution to a segment.
pub struct CategoryData<'a> {
    pub name: &'a str,
    pub info: CategoryInfoRecord,
    pub first_entry: u64,
    pub entry_count: u64,
}

/// Builds a complete in-memory segment: the metadata tree plus one data tree
/// per category.
pub fn build_segment(categories: &[CategoryData<'_>]) -> MemorySegment {
    let infos: Vec<(&str, &CategoryInfoRecord)> = categories
        .iter()
        .map(|category| (category.name, &category.info))
        .collect();
    let mut builder = MemorySegmentBuilder::new();
    builder.add_tree(metadata_tree(&infos)).unwrap();
    for category in categories {
        builder
            .add_tree(category_tree(
                category.name,
                &category.info,
                category.first_entry,
                category.entry_count,
            ))
            .unwrap();
    }
    builder.finish().unwrap()
}

fn encode<T: serde::Serialize>(value: &T) -> Vec<u8> {
    record::encode_payload("test cell", value).unwrap()
}
