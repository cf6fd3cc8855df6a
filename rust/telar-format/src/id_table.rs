//! Collection-ID table: a stable name to numeric-id mapping shared by all
//! frames of one category.

use ahash::AHashMap;
use telar_common::{Result, error::Error};

/// Immutable mapping between collection names and their stable numeric
/// identifiers within one category.
///
/// The table is built once when a category is initialized and shared
/// (via `Arc`) into every frame produced for that category, where downstream
/// reconstruction uses it to cross-reference relations between collections.
#[derive(Debug, Default)]
pub struct CollectionIdTable {
    ids: Vec<u32>,
    names: Vec<String>,
    index: AHashMap<String, usize>,
}

impl CollectionIdTable {
    /// Builds a table from parallel id and name lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists differ in length or a name repeats.
    pub fn new(ids: Vec<u32>, names: Vec<String>) -> Result<CollectionIdTable> {
        if ids.len() != names.len() {
            return Err(Error::invalid_arg(
                "ids",
                format!("{} ids for {} names", ids.len(), names.len()),
            ));
        }
        let mut index = AHashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            if index.insert(name.clone(), pos).is_some() {
                return Err(Error::invalid_arg(
                    "names",
                    format!("duplicate collection name '{name}'"),
                ));
            }
        }
        Ok(CollectionIdTable { ids, names, index })
    }

    /// Returns the id of the named collection, if present.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|&pos| self.ids[pos])
    }

    /// Returns the name of the collection with the given id, if present.
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.ids
            .iter()
            .position(|&known| known == id)
            .map(|pos| self.names[pos].as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Collection names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        let table =
            CollectionIdTable::new(vec![7, 9], vec!["hits".to_string(), "tracks".to_string()])
                .unwrap();
        assert_eq!(table.id_of("tracks"), Some(9));
        assert_eq!(table.name_of(7), Some("hits"));
        assert_eq!(table.id_of("clusters"), None);
        assert_eq!(table.name_of(1), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = CollectionIdTable::new(vec![1, 2], vec!["a".to_string(), "a".to_string()]);
        assert!(result.is_err());
    }
}
