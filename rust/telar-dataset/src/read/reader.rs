//! The public dataset reader.

use std::{path::Path, sync::Arc};

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use telar_common::{Result, error::Error};
use telar_format::{
    datamodel::DatamodelRegistry,
    defs::{self, CategoryInfoRecord, DatamodelDefinitions, VersionRecord},
    metadata::CategoryMetadata,
    record,
    version::Version,
};
use telar_frame::FrameData;
use telar_store::{BranchColumn, SegmentChain, SegmentSource, TreeSegment};

use super::category::{CategoryDecode, CategoryState};

/// Reads categorized frame data from one or more dataset files.
///
/// Several physical files are treated as one virtual concatenation: every
/// category spans the chained files with a single logical entry space. Each
/// category advances independently; [`read_next`](DatasetReader::read_next)
/// serves and advances its cursor, [`read_at`](DatasetReader::read_at)
/// serves an explicit entry and repositions the cursor behind it.
///
/// Absence is not an error: reading an unknown category, or past the last
/// entry, yields `Ok(None)`.
///
/// All files are assumed to have the same structure, i.e. the same
/// categories with the same collections, as produced by a batched writer.
/// The reader is single-threaded by contract; reads take `&mut self` and
/// callers needing concurrency must shard by category externally.
pub struct DatasetReader {
    chain: SegmentChain,
    categories: AHashMap<String, CategoryState>,
    decoded: AHashMap<String, CategoryDecode>,
    available: Vec<String>,
    file_version: Version,
    datamodels: DatamodelRegistry,
}

impl DatasetReader {
    /// Opens a single dataset file.
    pub fn open(path: impl AsRef<Path>) -> Result<DatasetReader> {
        DatasetReader::open_files(&[path])
    }

    /// Opens multiple dataset files and treats them as one dataset, in the
    /// given order. Opening additional files after construction is not
    /// supported.
    pub fn open_files<P: AsRef<Path>>(paths: &[P]) -> Result<DatasetReader> {
        DatasetReader::from_chain(SegmentChain::open_files(paths)?)
    }

    /// Opens an already-constructed segment source, e.g. an in-memory
    /// segment produced by an in-process pipeline.
    pub fn open_source(source: Arc<dyn SegmentSource>) -> Result<DatasetReader> {
        DatasetReader::open_sources(vec![source])
    }

    /// Opens and chains several already-constructed segment sources.
    pub fn open_sources(sources: Vec<Arc<dyn SegmentSource>>) -> Result<DatasetReader> {
        DatasetReader::from_chain(SegmentChain::new(sources)?)
    }

    fn from_chain(chain: SegmentChain) -> Result<DatasetReader> {
        // All dataset-wide metadata comes from the first file: the build
        // version, the datamodel definitions and the per-category collection
        // declarations. Later files contribute entries only.
        let metadata = chain
            .first()
            .open_tree(defs::METADATA_TREE_NAME)
            .ok_or_else(|| Error::invalid_format(defs::METADATA_TREE_NAME))?;

        let file_version = read_metadata_cell::<VersionRecord>(&metadata, defs::BUILD_VERSION_BRANCH)?
            .map(Version::from)
            .ok_or_else(|| Error::invalid_format(defs::BUILD_VERSION_BRANCH))?;

        let datamodels =
            match read_metadata_cell::<DatamodelDefinitions>(&metadata, defs::DATAMODELS_BRANCH)? {
                Some(definitions) => DatamodelRegistry::from_record(definitions)?,
                None => Default::default(),
            };

        let mut available = Vec::new();
        let mut decoded = AHashMap::new();
        for branch in metadata.branch_names() {
            let Some(category) = defs::category_of_collection_info_branch(&branch) else {
                continue;
            };
            let outcome = read_metadata_cell::<CategoryInfoRecord>(&metadata, &branch)
                .and_then(|cell| cell.ok_or_else(|| Error::invalid_format(branch.as_str())))
                .and_then(|info| CategoryMetadata::from_record(category, info));
            match outcome {
                Ok(meta) => {
                    available.push(category.to_string());
                    decoded.insert(category.to_string(), CategoryDecode::Ready(meta));
                }
                Err(e) => {
                    // A corrupt category disables itself only; the rest of
                    // the dataset stays readable.
                    log::warn!("failed to decode metadata of category '{category}': {e}");
                    decoded.insert(category.to_string(), CategoryDecode::Failed(e.to_string()));
                }
            }
        }
        log::debug!(
            "opened dataset: {} segment(s), {} categories, file version {file_version}",
            chain.segment_count(),
            available.len()
        );

        Ok(DatasetReader {
            chain,
            categories: AHashMap::new(),
            decoded,
            available,
            file_version,
            datamodels,
        })
    }

    /// Reads the next entry of the given category.
    ///
    /// Returns `Ok(None)` when no entries are left or when no data exists
    /// for this name; the cursor does not move in either case.
    pub fn read_next(&mut self, category: &str) -> Result<Option<FrameData>> {
        self.category_mut(category).read_next()
    }

    /// Reads the specified entry of the given category and repositions the
    /// category's cursor to `entry + 1`, so a subsequent sequential read
    /// continues from the requested point.
    ///
    /// Returns `Ok(None)` when the entry does not exist or when no data
    /// exists for this name.
    pub fn read_at(&mut self, category: &str, entry: u64) -> Result<Option<FrameData>> {
        self.category_mut(category).read_at(entry)
    }

    /// Number of entries available for the given category, summed across all
    /// chained files. Zero for a category absent from the dataset.
    pub fn entry_count(&mut self, category: &str) -> u64 {
        self.category_mut(category).entry_count()
    }

    /// Names of all frame categories available from this dataset, i.e. those
    /// with decodable metadata, in metadata order.
    pub fn available_categories(&self) -> &[String] {
        &self.available
    }

    /// The build version recorded by the writer of the first opened file.
    pub fn file_version(&self) -> Version {
        self.file_version
    }

    /// The datamodel definition text stored under the given name.
    pub fn datamodel_definition(&self, name: &str) -> Option<&str> {
        self.datamodels.definition(name)
    }

    /// Names of all datamodels available from this reader.
    pub fn available_datamodels(&self) -> &[String] {
        self.datamodels.names()
    }

    /// Fetches or lazily initializes the state of a category. Initialization
    /// happens once per name; probing an absent category is cheap and yields
    /// a permanently uninitialized state.
    fn category_mut(&mut self, category: &str) -> &mut CategoryState {
        if !self.categories.contains_key(category) {
            let decode = self.decoded.remove(category);
            let state = CategoryState::initialize(category, &self.chain, decode);
            self.categories.insert(category.to_string(), state);
        }
        self.categories.get_mut(category).expect("category state")
    }
}

impl std::fmt::Debug for DatasetReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetReader")
            .field("segments", &self.chain.segment_count())
            .field("categories", &self.available)
            .field("file_version", &self.file_version)
            .finish_non_exhaustive()
    }
}

/// Reads and decodes the single metadata cell of the given branch, or
/// returns `None` if the branch is absent.
fn read_metadata_cell<T: DeserializeOwned>(
    metadata: &Arc<dyn TreeSegment>,
    branch: &str,
) -> Result<Option<T>> {
    let Some(column) = metadata.open_branch(branch) else {
        return Ok(None);
    };
    let cell = column.read_cell(0)?;
    record::decode_payload(branch, &cell).map(Some)
}
