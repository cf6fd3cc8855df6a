//! Per-category reading state.
//!
//! A category groups all frames with the same name; the file structure
//! constrains them to the same contents. `CategoryState` owns everything
//! needed to read one category: the chained data tree, the entry cursor, the
//! collection descriptors, the branch cache and the shared collection-ID
//! table.

use std::sync::Arc;

use telar_common::{Result, error::Error};
use telar_format::{id_table::CollectionIdTable, metadata::CategoryMetadata};
use telar_store::{ChainedTree, SegmentChain};

use super::branches::{BranchSlot, ParametersSlot};

/// One collection declared by the category, with its branch-cache slot.
pub(crate) struct CollectionDescriptor {
    pub name: String,
    pub is_subset: bool,
    pub schema_version: u32,
    pub reference_count: u32,
    pub member_count: u32,
    /// Index of this collection's branch-cache slot.
    pub slot: usize,
}

/// Outcome of decoding a category's metadata at open time.
pub(crate) enum CategoryDecode {
    Ready(CategoryMetadata),
    Failed(String),
}

pub(crate) struct CategoryState {
    name: String,
    /// The chained data tree; `None` when the backend has no tree for this
    /// category (reads yield null) or when metadata decoding failed.
    pub(super) tree: Option<ChainedTree>,
    /// Decode failure recorded at open; every read surfaces it anew.
    failure: Option<String>,
    /// The next entry a sequential read will serve.
    pub(super) cursor: u64,
    pub(super) descriptors: Vec<CollectionDescriptor>,
    pub(super) slots: Vec<BranchSlot>,
    pub(super) parameters_slot: ParametersSlot,
    pub(super) id_table: Arc<CollectionIdTable>,
    /// Segment ordinal of the previously served entry; a change invalidates
    /// every cache slot.
    pub(super) current_segment: Option<usize>,
}

impl CategoryState {
    /// Builds the state for `name` from the metadata decoded at open time.
    ///
    /// Initialization never fails: an unknown category (no metadata, or no
    /// data tree in any segment) produces a permanently uninitialized state
    /// whose reads yield null, and a metadata decode failure produces a
    /// state whose reads surface that failure.
    pub fn initialize(
        name: &str,
        chain: &SegmentChain,
        decode: Option<CategoryDecode>,
    ) -> CategoryState {
        let mut state = CategoryState {
            name: name.to_string(),
            tree: None,
            failure: None,
            cursor: 0,
            descriptors: Vec::new(),
            slots: Vec::new(),
            parameters_slot: ParametersSlot::Unresolved,
            id_table: Default::default(),
            current_segment: None,
        };
        match decode {
            None => state,
            Some(CategoryDecode::Failed(message)) => {
                state.failure = Some(message);
                state
            }
            Some(CategoryDecode::Ready(metadata)) => {
                let Some(tree) = chain.open_tree(name) else {
                    return state;
                };
                state.tree = Some(tree);
                state.descriptors = metadata
                    .collections
                    .into_iter()
                    .enumerate()
                    .map(|(slot, meta)| CollectionDescriptor {
                        name: meta.name,
                        is_subset: meta.is_subset,
                        schema_version: meta.schema_version,
                        reference_count: meta.reference_count,
                        member_count: meta.member_count,
                        slot,
                    })
                    .collect();
                state.slots = state
                    .descriptors
                    .iter()
                    .map(|_| BranchSlot::Unresolved)
                    .collect();
                state.id_table = metadata.id_table;
                state
            }
        }
    }

    /// Total number of entries available for this category, summed across
    /// all chained segments. Zero for unknown categories.
    pub fn entry_count(&self) -> u64 {
        self.tree.as_ref().map_or(0, ChainedTree::entry_count)
    }

    /// Surfaces a recorded metadata failure, if any.
    pub(super) fn check_usable(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::metadata_inconsistency(&self.name, message)),
            None => Ok(()),
        }
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }
}
