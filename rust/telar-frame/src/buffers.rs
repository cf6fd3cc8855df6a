//! Raw per-collection buffers of one entry.

/// The raw buffers of one collection for one entry, tagged with the
/// collection's on-disk schema version.
///
/// A full collection owns a payload buffer plus any reference and
/// vector-member buffers. A subset collection is a relation-only view: its
/// `payload` is `None` and only reference buffers are populated. The two
/// shapes are distinguishable without consulting the metadata again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBuffers {
    /// Dispatch key selecting how downstream reconstruction interprets the
    /// buffer layout. Opaque at this layer.
    pub schema_version: u32,
    /// Whether the collection is a subset (relation-only) view.
    pub is_subset: bool,
    /// Payload buffer; `None` for subset collections.
    pub payload: Option<Vec<u8>>,
    /// Reference (relation) buffers, in branch order.
    pub references: Vec<Vec<u8>>,
    /// Vector-member buffers, in branch order; empty for subset collections.
    pub members: Vec<Vec<u8>>,
}

impl CollectionBuffers {
    /// True if every stored buffer is empty.
    ///
    /// A collection that is empty across the whole category still yields
    /// buffers (possibly zero-length), never an omission, so positional
    /// alignment with the descriptor list is preserved.
    pub fn is_empty(&self) -> bool {
        self.payload.as_ref().is_none_or(|cell| cell.is_empty())
            && self.references.iter().all(|cell| cell.is_empty())
            && self.members.iter().all(|cell| cell.is_empty())
    }
}
