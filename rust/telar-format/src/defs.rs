//! On-disk definitions: format constants, reserved tree and branch names,
//! and the serializable records stored in segment files.

use serde::{Deserialize, Serialize};

pub const TELAR_MAGIC: [u8; 4] = [0x74, 0x65, 0x6c, 0x72];
pub const TELAR_VERSION_MAJOR: u8 = 0;
pub const TELAR_VERSION_MINOR: u16 = 1;
pub const TELAR_VERSION_PATCH: u8 = 3;
pub const TELAR_HEADER: [u8; 8] = [
    0x74,
    0x65,
    0x6c,
    0x72,
    TELAR_VERSION_PATCH,
    (TELAR_VERSION_MINOR & 0xff) as u8,
    (TELAR_VERSION_MINOR >> 8) as u8,
    TELAR_VERSION_MAJOR,
];
pub const TELAR_FOOTER: [u8; 8] = TELAR_HEADER;

/// File format header size.
pub const TELAR_HEADER_SIZE: usize = TELAR_HEADER.len();

/// File format footer size.
pub const TELAR_FOOTER_SIZE: usize = TELAR_FOOTER.len();

/// Size of the serialized record length prefix.
pub const RECORD_LEN_SIZE: usize = 4;

/// Size of the record checksum suffix.
pub const CHECKSUM_SIZE: usize = 4;

/// Minimum possible size of a segment file:
/// * header:`u64`
/// * manifest_len:`u32`
/// * ... // manifest
/// * manifest_checksum:`u32`
/// * footer:`u64`
pub const SEGMENT_FILE_MIN_SIZE: usize =
    TELAR_HEADER_SIZE + TELAR_FOOTER_SIZE + RECORD_LEN_SIZE + CHECKSUM_SIZE;

/// Name of the reserved metadata tree present in every segment file.
pub const METADATA_TREE_NAME: &str = "telar_metadata";

/// Branch of the metadata tree holding the build [`VersionRecord`].
pub const BUILD_VERSION_BRANCH: &str = "build_version";

/// Branch of the metadata tree holding the [`DatamodelDefinitions`] record.
pub const DATAMODELS_BRANCH: &str = "datamodel_definitions";

/// Branch of a category data tree holding one entry-parameters cell per entry.
pub const PARAMETERS_BRANCH: &str = "frame_parameters";

const COLLECTION_INFO_SUFFIX: &str = "__collection_info";

/// Name of the metadata branch describing the collections of `category`.
pub fn collection_info_branch(category: &str) -> String {
    format!("{category}{COLLECTION_INFO_SUFFIX}")
}

/// Extracts the category name back out of a collection-info branch name.
pub fn category_of_collection_info_branch(branch: &str) -> Option<&str> {
    branch.strip_suffix(COLLECTION_INFO_SUFFIX)
}

/// Name of the payload branch of a full collection.
pub fn payload_branch(collection: &str) -> String {
    collection.to_string()
}

/// Name of the `index`-th reference (relation) branch of a collection.
pub fn reference_branch(collection: &str, index: u32) -> String {
    format!("{collection}#{index}")
}

/// Name of the `index`-th vector-member branch of a collection.
pub fn member_branch(collection: &str, index: u32) -> String {
    format!("{collection}_{index}")
}

/// The build version stored in the metadata tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Collection declarations of one category, stored as parallel arrays.
///
/// The arrays must all have the same length; each position describes one
/// collection. Consistency is validated during decoding, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfoRecord {
    pub ids: Vec<u32>,
    pub names: Vec<String>,
    pub subset_flags: Vec<bool>,
    pub schema_versions: Vec<u32>,
    pub reference_counts: Vec<u32>,
    pub member_counts: Vec<u32>,
}

/// Datamodel definition texts, stored as parallel arrays of names and
/// definition payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatamodelDefinitions {
    pub names: Vec<String>,
    pub definitions: Vec<String>,
}

/// Top-level content of a segment file: every tree with its branches and
/// per-entry cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentManifest {
    pub trees: Vec<TreeManifest>,
}

/// One named tree inside a segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeManifest {
    pub name: String,
    pub entry_count: u64,
    pub branches: Vec<BranchManifest>,
}

/// One branch (column) of a tree: `cells[i]` is the raw value for local
/// entry `i`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchManifest {
    pub name: String,
    pub cells: Vec<Vec<u8>>,
}
