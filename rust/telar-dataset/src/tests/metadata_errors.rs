use telar_common::error::ErrorKind;
use telar_format::defs::CategoryInfoRecord;

use crate::tests::{data_generator as r#gen, dataset_store::DatasetStore};

fn broken_info_record() -> CategoryInfoRecord {
    let mut info = r#gen::events_info_record();
    info.schema_versions.pop();
    info
}

#[test]
fn test_corrupt_category_fails_without_disabling_others() {
    let store = DatasetStore::new();
    let segment = r#gen::build_segment(&[
        r#gen::CategoryData {
            name: "broken",
            info: broken_info_record(),
            first_entry: 0,
            entry_count: 2,
        },
        r#gen::CategoryData {
            name: "events",
            info: r#gen::events_info_record(),
            first_entry: 0,
            entry_count: 2,
        },
    ]);
    let mut reader = store.open_reader(&[segment]);

    // Only decodable categories are advertised.
    assert_eq!(reader.available_categories(), ["events".to_string()]);

    let err = reader.read_next("broken").unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MetadataInconsistency { category, .. } if category == "broken"
    ));
    // The failure is sticky, not silently recovered.
    assert!(reader.read_next("broken").is_err());
    assert!(reader.read_at("broken", 0).is_err());

    // Sibling categories stay usable.
    let frame = reader.read_next("events").unwrap().unwrap();
    assert!(frame.collection_buffers("hits").is_some());
}

#[test]
fn test_missing_declared_branch_is_format_error() {
    // Metadata declares a reference branch the data tree does not carry.
    let mut info = r#gen::runs_info_record();
    info.reference_counts[0] = 1;
    let mut builder = telar_store::MemorySegmentBuilder::new();
    builder
        .add_tree(r#gen::metadata_tree(&[("runs", &info)]))
        .unwrap();
    builder
        .add_tree(r#gen::category_tree("runs", &r#gen::runs_info_record(), 0, 1))
        .unwrap();
    let segment = builder.finish().unwrap();

    let mut reader =
        crate::read::DatasetReader::open_source(std::sync::Arc::new(segment)).unwrap();
    let err = reader.read_next("runs").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
}

#[test]
fn test_dataset_without_metadata_tree_fails_to_open() {
    let mut builder = telar_store::MemorySegmentBuilder::new();
    builder
        .add_tree(r#gen::category_tree(
            "events",
            &r#gen::events_info_record(),
            0,
            1,
        ))
        .unwrap();
    let segment = builder.finish().unwrap();

    let result = crate::read::DatasetReader::open_source(std::sync::Arc::new(segment));
    assert!(result.is_err());
}
