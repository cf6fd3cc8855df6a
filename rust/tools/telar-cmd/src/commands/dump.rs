//! Dump command implementation

use anyhow::Result;
use serde::Serialize;
use telar_frame::{EntryParameters, FrameData};

use crate::commands::open_reader;

#[derive(Serialize)]
struct FrameDump {
    entry: u64,
    collections: Vec<CollectionDump>,
    #[serde(skip_serializing_if = "EntryParameters::is_empty")]
    parameters: EntryParameters,
}

#[derive(Serialize)]
struct CollectionDump {
    name: String,
    schema_version: u32,
    subset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reference_bytes: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    member_bytes: Vec<usize>,
}

pub fn run(category: String, start: u64, count: u64, files: Vec<String>) -> Result<()> {
    let mut reader = open_reader(&files)?;

    let mut entry = start;
    let end = start.saturating_add(count);
    while entry < end {
        let Some(frame) = reader.read_at(&category, entry)? else {
            break;
        };
        println!("{}", serde_json::to_string_pretty(&dump_frame(entry, frame))?);
        entry += 1;
    }
    if entry == start {
        eprintln!("No entries for category '{category}' at index {start}");
    }
    Ok(())
}

fn dump_frame(entry: u64, frame: FrameData) -> FrameDump {
    let (buffers, _, parameters) = frame.into_parts();
    let collections = buffers
        .into_iter()
        .map(|(name, collection)| CollectionDump {
            name,
            schema_version: collection.schema_version,
            subset: collection.is_subset,
            payload_bytes: collection.payload.as_ref().map(Vec::len),
            reference_bytes: collection.references.iter().map(Vec::len).collect(),
            member_bytes: collection.members.iter().map(Vec::len).collect(),
        })
        .collect();
    FrameDump {
        entry,
        collections,
        parameters,
    }
}
