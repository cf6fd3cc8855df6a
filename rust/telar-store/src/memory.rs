//! In-memory segments, used for tests, tooling and in-process pipelines
//! that hand a dataset to the reader without touching disk.

use std::sync::Arc;

use ahash::AHashMap;
use telar_common::{Result, error::Error, verify_arg};
use telar_format::defs::{BranchManifest, SegmentManifest, TreeManifest};

use crate::{BranchColumn, SegmentSource, TreeSegment};

/// An immutable in-memory segment.
pub struct MemorySegment {
    names: Vec<String>,
    trees: AHashMap<String, Arc<MemoryTree>>,
}

struct MemoryTree {
    entry_count: u64,
    branch_names: Vec<String>,
    branches: AHashMap<String, Arc<MemoryBranch>>,
}

struct MemoryBranch {
    cells: Vec<Vec<u8>>,
}

impl MemorySegment {
    /// Reconstructs a segment from its decoded on-disk manifest.
    pub fn from_manifest(manifest: SegmentManifest) -> Result<MemorySegment> {
        let mut builder = MemorySegmentBuilder::new();
        for tree in manifest.trees {
            let mut tree_builder = TreeBuilder::new(&tree.name).entry_count(tree.entry_count);
            for branch in tree.branches {
                tree_builder = tree_builder.branch(branch.name, branch.cells);
            }
            builder.add_tree(tree_builder)?;
        }
        builder.finish()
    }

    /// Produces the on-disk manifest of this segment.
    pub fn to_manifest(&self) -> SegmentManifest {
        let trees = self
            .names
            .iter()
            .map(|name| {
                let tree = &self.trees[name];
                TreeManifest {
                    name: name.clone(),
                    entry_count: tree.entry_count,
                    branches: tree
                        .branch_names
                        .iter()
                        .map(|branch| BranchManifest {
                            name: branch.clone(),
                            cells: tree.branches[branch].cells.clone(),
                        })
                        .collect(),
                }
            })
            .collect();
        SegmentManifest { trees }
    }
}

impl SegmentSource for MemorySegment {
    fn tree_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn open_tree(&self, name: &str) -> Option<Arc<dyn TreeSegment>> {
        self.trees
            .get(name)
            .cloned()
            .map(|tree| tree as Arc<dyn TreeSegment>)
    }
}

impl TreeSegment for MemoryTree {
    fn entry_count(&self) -> u64 {
        self.entry_count
    }

    fn branch_names(&self) -> Vec<String> {
        self.branch_names.clone()
    }

    fn open_branch(&self, name: &str) -> Option<Arc<dyn BranchColumn>> {
        self.branches
            .get(name)
            .cloned()
            .map(|branch| branch as Arc<dyn BranchColumn>)
    }
}

impl BranchColumn for MemoryBranch {
    fn read_cell(&self, entry: u64) -> Result<Vec<u8>> {
        self.cells
            .get(entry as usize)
            .cloned()
            .ok_or_else(|| Error::invalid_arg("entry", format!("no cell at entry {entry}")))
    }
}

/// Builder for one tree of a [`MemorySegment`].
///
/// Branches are supplied as whole columns (one cell per entry); every branch
/// of a tree must have the same number of cells.
pub struct TreeBuilder {
    name: String,
    entry_count: Option<u64>,
    branches: Vec<(String, Vec<Vec<u8>>)>,
}

impl TreeBuilder {
    pub fn new(name: impl Into<String>) -> TreeBuilder {
        TreeBuilder {
            name: name.into(),
            entry_count: None,
            branches: Vec::new(),
        }
    }

    /// Sets an explicit entry count; only needed for trees without branches.
    pub fn entry_count(mut self, count: u64) -> TreeBuilder {
        self.entry_count = Some(count);
        self
    }

    /// Adds a branch with one cell per entry.
    pub fn branch(mut self, name: impl Into<String>, cells: Vec<Vec<u8>>) -> TreeBuilder {
        self.branches.push((name.into(), cells));
        self
    }

    fn build(self) -> Result<(String, MemoryTree)> {
        let entry_count = match self.entry_count {
            Some(count) => count,
            None => self
                .branches
                .first()
                .map(|(_, cells)| cells.len() as u64)
                .unwrap_or(0),
        };
        let mut branch_names = Vec::with_capacity(self.branches.len());
        let mut branches = AHashMap::with_capacity(self.branches.len());
        for (name, cells) in self.branches {
            verify_arg!(cells, cells.len() as u64 == entry_count);
            verify_arg!(name, !branches.contains_key(&name));
            branch_names.push(name.clone());
            branches.insert(name, Arc::new(MemoryBranch { cells }));
        }
        Ok((
            self.name,
            MemoryTree {
                entry_count,
                branch_names,
                branches,
            },
        ))
    }
}

/// Builder for a [`MemorySegment`].
#[derive(Default)]
pub struct MemorySegmentBuilder {
    names: Vec<String>,
    trees: AHashMap<String, Arc<MemoryTree>>,
}

impl MemorySegmentBuilder {
    pub fn new() -> MemorySegmentBuilder {
        Default::default()
    }

    /// Validates and adds a finished tree.
    pub fn add_tree(&mut self, tree: TreeBuilder) -> Result<()> {
        let (name, tree) = tree.build()?;
        verify_arg!(name, !self.trees.contains_key(&name));
        self.names.push(name.clone());
        self.trees.insert(name, Arc::new(tree));
        Ok(())
    }

    pub fn finish(self) -> Result<MemorySegment> {
        Ok(MemorySegment {
            names: self.names,
            trees: self.trees,
        })
    }
}
