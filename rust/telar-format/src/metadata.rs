//! Decoding of per-category collection metadata.
//!
//! The metadata tree stores, for each category, a [`CategoryInfoRecord`] of
//! parallel arrays: collection ids, names, subset flags, schema versions and
//! branch counts. This module validates those arrays and produces the ordered
//! collection list plus the shared [`CollectionIdTable`] consumed by the
//! reader. The schema version is carried through as an opaque dispatch key;
//! buffer layouts are never interpreted here.

use std::sync::Arc;

use telar_common::{Result, error::Error};

use crate::{defs::CategoryInfoRecord, id_table::CollectionIdTable};

/// One collection declared by a category's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMeta {
    pub id: u32,
    pub name: String,
    /// Subset collections store only reference (relation) branches.
    pub is_subset: bool,
    /// On-disk schema version of the collection's buffer layout.
    pub schema_version: u32,
    /// Number of reference branches stored for this collection.
    pub reference_count: u32,
    /// Number of vector-member branches stored for this collection.
    pub member_count: u32,
}

/// The decoded metadata of one category: ordered collection declarations and
/// the shared collection-ID table.
#[derive(Debug)]
pub struct CategoryMetadata {
    pub collections: Vec<CollectionMeta>,
    pub id_table: Arc<CollectionIdTable>,
}

impl CategoryMetadata {
    /// Validates and decodes a [`CategoryInfoRecord`].
    ///
    /// # Errors
    ///
    /// Returns `MetadataInconsistency` if the record's parallel arrays
    /// disagree in length. This indicates a corrupt or incompatible file and
    /// is fatal for the category.
    pub fn from_record(category: &str, record: CategoryInfoRecord) -> Result<CategoryMetadata> {
        let count = record.names.len();
        let declared = [
            ("ids", record.ids.len()),
            ("subset flags", record.subset_flags.len()),
            ("schema versions", record.schema_versions.len()),
            ("reference counts", record.reference_counts.len()),
            ("member counts", record.member_counts.len()),
        ];
        for (what, len) in declared {
            if len != count {
                return Err(Error::metadata_inconsistency(
                    category,
                    format!("{count} collection names but {len} {what}"),
                ));
            }
        }

        let collections = record
            .names
            .iter()
            .enumerate()
            .map(|(pos, name)| CollectionMeta {
                id: record.ids[pos],
                name: name.clone(),
                is_subset: record.subset_flags[pos],
                schema_version: record.schema_versions[pos],
                reference_count: record.reference_counts[pos],
                member_count: record.member_counts[pos],
            })
            .collect();

        let id_table = CollectionIdTable::new(record.ids, record.names)
            .map_err(|e| Error::metadata_inconsistency(category, e.to_string()))?;

        Ok(CategoryMetadata {
            collections,
            id_table: Arc::new(id_table),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telar_common::error::ErrorKind;

    fn record() -> CategoryInfoRecord {
        CategoryInfoRecord {
            ids: vec![1, 2, 3],
            names: vec!["hits".into(), "tracks".into(), "selected".into()],
            subset_flags: vec![false, false, true],
            schema_versions: vec![2, 1, 1],
            reference_counts: vec![0, 2, 1],
            member_counts: vec![1, 0, 0],
        }
    }

    #[test]
    fn test_decode_preserves_declaration_order() {
        let meta = CategoryMetadata::from_record("events", record()).unwrap();
        assert_eq!(meta.collections.len(), 3);
        assert_eq!(meta.collections[1].name, "tracks");
        assert_eq!(meta.collections[1].reference_count, 2);
        assert!(meta.collections[2].is_subset);
        assert_eq!(meta.id_table.id_of("selected"), Some(3));
    }

    #[test]
    fn test_parallel_array_mismatch_is_inconsistency() {
        let mut bad = record();
        bad.schema_versions.pop();
        let err = CategoryMetadata::from_record("events", bad).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MetadataInconsistency { category, .. } if category == "events"
        ));
    }

    #[test]
    fn test_duplicate_collection_name_is_inconsistency() {
        let mut bad = record();
        bad.names[2] = "hits".into();
        let err = CategoryMetadata::from_record("events", bad).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MetadataInconsistency { .. }
        ));
    }
}
