//! File-backed segments.
//!
//! A segment file is a checksummed manifest record wrapped in the telar
//! header and footer:
//!
//! ```text
//! telar_header (8 bytes)
//! manifest_length: u32
//! manifest_record
//! manifest_checksum: u32
//! telar_footer (8 bytes)
//! ```

use std::{path::Path, sync::Arc};

use telar_common::{Result, error::Error, verify_data};
use telar_format::{
    defs::{
        SEGMENT_FILE_MIN_SIZE, SegmentManifest, TELAR_FOOTER_SIZE, TELAR_HEADER,
        TELAR_HEADER_SIZE, TELAR_MAGIC, TELAR_VERSION_MAJOR,
    },
    record,
};

use crate::{MemorySegment, SegmentSource, TreeSegment};

/// A segment loaded from a file on disk.
///
/// The whole manifest is read and verified on open; subsequent tree and
/// branch access is served from memory.
pub struct FileSegment {
    inner: MemorySegment,
}

impl FileSegment {
    /// Opens and verifies a segment file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is too small, carries an
    /// unknown magic or an incompatible major version, or fails checksum
    /// validation.
    pub fn open(path: impl AsRef<Path>) -> Result<FileSegment> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path.display().to_string(), e))?;
        verify_data!("segment file size", bytes.len() >= SEGMENT_FILE_MIN_SIZE);
        verify_header_or_footer(&bytes[..TELAR_HEADER_SIZE])?;
        verify_header_or_footer(&bytes[bytes.len() - TELAR_FOOTER_SIZE..])?;

        let framed = &bytes[TELAR_HEADER_SIZE..bytes.len() - TELAR_FOOTER_SIZE];
        let manifest: SegmentManifest =
            record::decode_payload("segment manifest", record::validate_record(framed)?)?;
        let inner = MemorySegment::from_manifest(manifest)?;
        log::debug!(
            "opened segment '{}' with {} trees",
            path.display(),
            inner.tree_names().len()
        );
        Ok(FileSegment { inner })
    }
}

impl SegmentSource for FileSegment {
    fn tree_names(&self) -> Vec<String> {
        self.inner.tree_names()
    }

    fn open_tree(&self, name: &str) -> Option<Arc<dyn TreeSegment>> {
        self.inner.open_tree(name)
    }
}

/// Writes a segment file for the given in-memory segment.
///
/// This is the backend-level producer used by tooling and test fixtures;
/// there is no frame-level writing surface.
pub fn write_segment_file(path: impl AsRef<Path>, segment: &MemorySegment) -> Result<()> {
    let path = path.as_ref();
    let payload = record::encode_payload("segment manifest", &segment.to_manifest())?;
    let framed = record::build_record(&payload);

    let mut bytes = Vec::with_capacity(TELAR_HEADER_SIZE + framed.len() + TELAR_FOOTER_SIZE);
    bytes.extend_from_slice(&TELAR_HEADER);
    bytes.extend_from_slice(&framed);
    bytes.extend_from_slice(&TELAR_HEADER);
    std::fs::write(path, bytes).map_err(|e| Error::io(path.display().to_string(), e))
}

fn verify_header_or_footer(bytes: &[u8]) -> Result<()> {
    verify_data!("header size", bytes.len() == TELAR_HEADER_SIZE);
    verify_data!("magic", bytes[..TELAR_MAGIC.len()] == TELAR_MAGIC);
    verify_data!("major version", bytes[7] <= TELAR_VERSION_MAJOR);
    Ok(())
}
