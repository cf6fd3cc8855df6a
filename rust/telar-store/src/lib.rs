//! Tree-storage backend:
//! - `SegmentSource`: one physical dataset file exposing named trees.
//! - `TreeSegment`: a tree within one segment, with an entry count and named
//!   branches (columns).
//! - `BranchColumn`: a resolved column handle able to read one raw cell per
//!   entry.
//!
//! Provides an in-memory implementation, a file-backed implementation and the
//! segment chain that concatenates several physical files into one logical
//! entry space.

use std::sync::Arc;

use telar_common::Result;

pub mod chain;
pub mod file;
pub mod memory;

pub use chain::{ChainedTree, EntryLocation, SegmentChain};
pub use file::FileSegment;
pub use memory::{MemorySegment, MemorySegmentBuilder, TreeBuilder};

/// One physical dataset file (a "segment").
///
/// Segments are shared read-only across all categories of a reader, so
/// implementations must be `Send + Sync`.
pub trait SegmentSource: Send + Sync + 'static {
    /// Names of all trees stored in this segment.
    fn tree_names(&self) -> Vec<String>;

    /// Opens the named tree, or returns `None` if this segment does not
    /// carry it.
    fn open_tree(&self, name: &str) -> Option<Arc<dyn TreeSegment>>;
}

/// A named tree inside one segment.
pub trait TreeSegment: Send + Sync + 'static {
    /// Number of entries stored in this segment's part of the tree.
    fn entry_count(&self) -> u64;

    /// Names of all branches of this tree.
    fn branch_names(&self) -> Vec<String>;

    /// Resolves a column handle for the named branch, or returns `None` if
    /// the branch does not exist.
    ///
    /// The returned handle is only valid for this segment; chained files may
    /// lay out the same branch independently.
    fn open_branch(&self, name: &str) -> Option<Arc<dyn BranchColumn>>;
}

/// A resolved column handle for one branch within one segment.
pub trait BranchColumn: Send + Sync + 'static {
    /// Reads the raw cell value for the given segment-local entry index.
    ///
    /// **NOTE**: the index must be below the owning tree's `entry_count`;
    /// an out-of-range index is an argument error, not end-of-data (bounds
    /// against the logical entry space are the reader's concern).
    fn read_cell(&self, entry: u64) -> Result<Vec<u8>>;
}
