//! Resolved branch handles and the per-collection branch cache slots.
//!
//! Chained files may lay out the same logical branch independently, so a
//! resolved handle is only valid for one segment. Each collection occupies
//! one cache slot: a tagged union of unresolved / resolved-for-segment, with
//! explicit invalidation when the entry cursor crosses a segment boundary.

use std::sync::Arc;

use telar_common::{Result, error::Error};
use telar_format::defs;
use telar_frame::CollectionBuffers;
use telar_store::{BranchColumn, TreeSegment};

use super::category::CollectionDescriptor;

/// The resolved column handles of one collection within one segment.
pub(crate) struct CollectionBranches {
    payload: Option<Arc<dyn BranchColumn>>,
    references: Vec<Arc<dyn BranchColumn>>,
    members: Vec<Arc<dyn BranchColumn>>,
}

impl CollectionBranches {
    /// Resolves the branch handles declared by `descriptor` from the given
    /// segment tree.
    ///
    /// Subset collections resolve only their reference branches; full
    /// collections resolve payload, reference and vector-member branches.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared branch is missing from the tree, which
    /// indicates a file inconsistent with its own metadata.
    pub fn resolve(
        tree: &Arc<dyn TreeSegment>,
        descriptor: &CollectionDescriptor,
    ) -> Result<CollectionBranches> {
        let name = descriptor.name.as_str();
        let payload = if descriptor.is_subset {
            None
        } else {
            Some(open_branch(tree, &defs::payload_branch(name))?)
        };
        let references = (0..descriptor.reference_count)
            .map(|index| open_branch(tree, &defs::reference_branch(name, index)))
            .collect::<Result<Vec<_>>>()?;
        let members = if descriptor.is_subset {
            Vec::new()
        } else {
            (0..descriptor.member_count)
                .map(|index| open_branch(tree, &defs::member_branch(name, index)))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(CollectionBranches {
            payload,
            references,
            members,
        })
    }

    /// Reads the collection's buffers for one segment-local entry.
    pub fn read_buffers(
        &self,
        descriptor: &CollectionDescriptor,
        local_entry: u64,
    ) -> Result<CollectionBuffers> {
        let payload = self
            .payload
            .as_ref()
            .map(|column| column.read_cell(local_entry))
            .transpose()?;
        let references = self
            .references
            .iter()
            .map(|column| column.read_cell(local_entry))
            .collect::<Result<Vec<_>>>()?;
        let members = self
            .members
            .iter()
            .map(|column| column.read_cell(local_entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(CollectionBuffers {
            schema_version: descriptor.schema_version,
            is_subset: descriptor.is_subset,
            payload,
            references,
            members,
        })
    }
}

fn open_branch(tree: &Arc<dyn TreeSegment>, branch: &str) -> Result<Arc<dyn BranchColumn>> {
    tree.open_branch(branch)
        .ok_or_else(|| Error::invalid_format(format!("branch '{branch}'")))
}

/// One branch-cache slot.
pub(crate) enum BranchSlot {
    Unresolved,
    Resolved {
        segment: usize,
        branches: CollectionBranches,
    },
}

impl BranchSlot {
    pub fn invalidate(&mut self) {
        *self = BranchSlot::Unresolved;
    }

    /// Returns the handles for `segment`, resolving them if the slot is
    /// stale or empty.
    pub fn resolve(
        &mut self,
        segment: usize,
        tree: &Arc<dyn TreeSegment>,
        descriptor: &CollectionDescriptor,
    ) -> Result<&CollectionBranches> {
        let stale = match self {
            BranchSlot::Unresolved => true,
            BranchSlot::Resolved { segment: known, .. } => *known != segment,
        };
        if stale {
            *self = BranchSlot::Resolved {
                segment,
                branches: CollectionBranches::resolve(tree, descriptor)?,
            };
        }
        match self {
            BranchSlot::Resolved { branches, .. } => Ok(branches),
            BranchSlot::Unresolved => unreachable!("slot resolved above"),
        }
    }
}

/// Cache slot for the entry-parameters branch. The branch is optional: a
/// category without parameters yields empty `EntryParameters`.
pub(crate) enum ParametersSlot {
    Unresolved,
    Resolved {
        segment: usize,
        column: Option<Arc<dyn BranchColumn>>,
    },
}

impl ParametersSlot {
    pub fn invalidate(&mut self) {
        *self = ParametersSlot::Unresolved;
    }

    pub fn resolve(
        &mut self,
        segment: usize,
        tree: &Arc<dyn TreeSegment>,
    ) -> &Option<Arc<dyn BranchColumn>> {
        let stale = match self {
            ParametersSlot::Unresolved => true,
            ParametersSlot::Resolved { segment: known, .. } => *known != segment,
        };
        if stale {
            *self = ParametersSlot::Resolved {
                segment,
                column: tree.open_branch(defs::PARAMETERS_BRANCH),
            };
        }
        match self {
            ParametersSlot::Resolved { column, .. } => column,
            ParametersSlot::Unresolved => unreachable!("slot resolved above"),
        }
    }
}
