//! Chaining of physical segments into one logical entry space.
//!
//! A [`SegmentChain`] keeps the opened segments in file order. For each tree
//! name it can produce a [`ChainedTree`]: the concatenation of that tree's
//! per-segment parts, with entry indices translated from the logical space
//! into (segment ordinal, local index) pairs. The chain never assumes a fixed
//! number of entries per segment; totals are recomputed as sums.

use std::{path::Path, sync::Arc};

use telar_common::{Result, error::Error, verify_arg};

use crate::{FileSegment, SegmentSource, TreeSegment};

/// An ordered list of opened segments, treated as one dataset.
pub struct SegmentChain {
    segments: Vec<Arc<dyn SegmentSource>>,
}

impl SegmentChain {
    /// Builds a chain over already-opened segment sources.
    pub fn new(segments: Vec<Arc<dyn SegmentSource>>) -> Result<SegmentChain> {
        verify_arg!(segments, !segments.is_empty());
        Ok(SegmentChain { segments })
    }

    /// Opens the given files in order and chains them.
    pub fn open_files<P: AsRef<Path>>(paths: &[P]) -> Result<SegmentChain> {
        let segments = paths
            .iter()
            .map(|path| {
                FileSegment::open(path).map(|segment| Arc::new(segment) as Arc<dyn SegmentSource>)
            })
            .collect::<Result<Vec<_>>>()?;
        SegmentChain::new(segments)
    }

    /// The first segment of the chain; metadata is read from here only.
    pub fn first(&self) -> &Arc<dyn SegmentSource> {
        &self.segments[0]
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Chains the named tree across all segments that carry it.
    ///
    /// Returns `None` if no segment carries a tree with this name.
    pub fn open_tree(&self, name: &str) -> Option<ChainedTree> {
        let mut parts = Vec::new();
        let mut total = 0u64;
        for segment in &self.segments {
            if let Some(tree) = segment.open_tree(name) {
                let entry_count = tree.entry_count();
                parts.push(TreePart {
                    tree,
                    first_entry: total,
                });
                total += entry_count;
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(ChainedTree { parts, total })
    }
}

struct TreePart {
    tree: Arc<dyn TreeSegment>,
    /// Logical index of this part's first entry.
    first_entry: u64,
}

/// Location of a logical entry within a chained tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLocation {
    /// Ordinal of the part within the chained tree.
    pub segment: usize,
    /// Entry index local to that part.
    pub local: u64,
}

/// One logical tree spanning every segment that carries it.
pub struct ChainedTree {
    parts: Vec<TreePart>,
    total: u64,
}

impl ChainedTree {
    /// Total number of entries, summed across all parts.
    pub fn entry_count(&self) -> u64 {
        self.total
    }

    pub fn segment_count(&self) -> usize {
        self.parts.len()
    }

    /// Translates a logical entry index into its part and local index.
    ///
    /// Returns `None` when the index lies beyond the last entry.
    pub fn locate(&self, entry: u64) -> Option<EntryLocation> {
        if entry >= self.total {
            return None;
        }
        let segment = self
            .parts
            .partition_point(|part| part.first_entry <= entry)
            - 1;
        Some(EntryLocation {
            segment,
            local: entry - self.parts[segment].first_entry,
        })
    }

    /// The tree part with the given ordinal.
    pub fn segment(&self, ordinal: usize) -> Result<&Arc<dyn TreeSegment>> {
        self.parts
            .get(ordinal)
            .map(|part| &part.tree)
            .ok_or_else(|| Error::invalid_arg("ordinal", format!("no segment {ordinal}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySegmentBuilder, TreeBuilder};

    fn segment_with(name: &str, entries: u64) -> Arc<dyn SegmentSource> {
        let cells = (0..entries).map(|i| vec![i as u8]).collect();
        let mut builder = MemorySegmentBuilder::new();
        builder
            .add_tree(TreeBuilder::new(name).branch("data", cells))
            .unwrap();
        Arc::new(builder.finish().unwrap())
    }

    #[test]
    fn test_counts_are_summed() {
        let chain =
            SegmentChain::new(vec![segment_with("events", 3), segment_with("events", 2)]).unwrap();
        let tree = chain.open_tree("events").unwrap();
        assert_eq!(tree.entry_count(), 5);
        assert_eq!(tree.segment_count(), 2);
    }

    #[test]
    fn test_locate_translates_across_boundary() {
        let chain =
            SegmentChain::new(vec![segment_with("events", 3), segment_with("events", 2)]).unwrap();
        let tree = chain.open_tree("events").unwrap();

        assert_eq!(
            tree.locate(0),
            Some(EntryLocation {
                segment: 0,
                local: 0
            })
        );
        assert_eq!(
            tree.locate(2),
            Some(EntryLocation {
                segment: 0,
                local: 2
            })
        );
        // First entry of the second physical file.
        assert_eq!(
            tree.locate(3),
            Some(EntryLocation {
                segment: 1,
                local: 0
            })
        );
        assert_eq!(
            tree.locate(4),
            Some(EntryLocation {
                segment: 1,
                local: 1
            })
        );
        assert_eq!(tree.locate(5), None);
    }

    #[test]
    fn test_missing_tree_is_none() {
        let chain = SegmentChain::new(vec![segment_with("events", 3)]).unwrap();
        assert!(chain.open_tree("runs").is_none());
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(SegmentChain::new(Vec::new()).is_err());
    }
}
