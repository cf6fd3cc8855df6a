//! Entry-scoped key/value parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Typed key/value parameters attached to one entry.
///
/// Values are vectors keyed by name, one map per supported value type. The
/// whole bundle is stored as a single cell of the entry-parameters branch and
/// round-trips through serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryParameters {
    pub ints: BTreeMap<String, Vec<i32>>,
    pub floats: BTreeMap<String, Vec<f32>>,
    pub doubles: BTreeMap<String, Vec<f64>>,
    pub strings: BTreeMap<String, Vec<String>>,
}

impl EntryParameters {
    pub fn new() -> EntryParameters {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ints.is_empty()
            && self.floats.is_empty()
            && self.doubles.is_empty()
            && self.strings.is_empty()
    }

    /// All keys present in any of the typed maps, sorted and deduplicated.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .ints
            .keys()
            .chain(self.floats.keys())
            .chain(self.doubles.keys())
            .chain(self.strings.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn get_ints(&self, key: &str) -> Option<&[i32]> {
        self.ints.get(key).map(Vec::as_slice)
    }

    pub fn get_floats(&self, key: &str) -> Option<&[f32]> {
        self.floats.get(key).map(Vec::as_slice)
    }

    pub fn get_doubles(&self, key: &str) -> Option<&[f64]> {
        self.doubles.get(key).map(Vec::as_slice)
    }

    pub fn get_strings(&self, key: &str) -> Option<&[String]> {
        self.strings.get(key).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_merged_across_types() {
        let mut params = EntryParameters::new();
        params.ints.insert("run".to_string(), vec![42]);
        params.strings.insert("tag".to_string(), vec!["a".to_string()]);
        params.doubles.insert("run".to_string(), vec![1.5]);

        assert_eq!(params.keys(), vec!["run", "tag"]);
        assert_eq!(params.get_ints("run"), Some(&[42][..]));
        assert_eq!(params.get_floats("run"), None);
        assert!(!params.is_empty());
    }
}
