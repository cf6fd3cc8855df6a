//! The assembled intermediate representation of one entry.

use std::sync::Arc;

use telar_format::id_table::CollectionIdTable;

use crate::{buffers::CollectionBuffers, parameters::EntryParameters};

/// One entry's worth of collection buffers plus parameters.
///
/// A `FrameData` is self-contained: it owns the raw buffers of every
/// collection of its category (in declaration order), the entry-scoped
/// parameters, and a shared handle to the category's collection-ID table for
/// cross-referencing relations during reconstruction.
pub struct FrameData {
    buffers: Vec<(String, CollectionBuffers)>,
    id_table: Arc<CollectionIdTable>,
    parameters: EntryParameters,
}

impl FrameData {
    pub fn new(
        buffers: Vec<(String, CollectionBuffers)>,
        id_table: Arc<CollectionIdTable>,
        parameters: EntryParameters,
    ) -> FrameData {
        FrameData {
            buffers,
            id_table,
            parameters,
        }
    }

    /// The buffers of the named collection, if the category declares it.
    pub fn collection_buffers(&self, name: &str) -> Option<&CollectionBuffers> {
        self.buffers
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, buffers)| buffers)
    }

    /// Collection names in declaration order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.buffers.iter().map(|(name, _)| name.as_str())
    }

    /// Buffers in declaration order, positionally aligned with the
    /// category's descriptor list.
    pub fn collections(&self) -> &[(String, CollectionBuffers)] {
        &self.buffers
    }

    pub fn id_table(&self) -> &Arc<CollectionIdTable> {
        &self.id_table
    }

    pub fn parameters(&self) -> &EntryParameters {
        &self.parameters
    }

    /// Splits the frame into its parts, handing ownership to reconstruction.
    pub fn into_parts(
        self,
    ) -> (
        Vec<(String, CollectionBuffers)>,
        Arc<CollectionIdTable>,
        EntryParameters,
    ) {
        (self.buffers, self.id_table, self.parameters)
    }
}

impl std::fmt::Debug for FrameData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameData")
            .field("collections", &self.buffers.len())
            .field("parameters", &self.parameters.keys().len())
            .finish_non_exhaustive()
    }
}
