//! # Telar: Categorized Frame Data Format
//!
//! Telar reads sequences of structured records ("frames"), grouped into named
//! logical streams called categories, out of one or more column-oriented
//! dataset files that are treated as a single virtual concatenation. Each
//! category advances independently: a caller asks for "the next entry" or
//! "entry N" and receives a self-contained bundle of raw collection buffers
//! plus key/value parameters, ready for higher-level object reconstruction.
//!
//! ## Key properties
//!
//! * **Categorized streams**: independently-advancing cursors per category,
//!   with sequential and random access sharing one well-defined cursor
//!   contract
//! * **File chaining**: several physical files form one logical entry space;
//!   branch handles are cached per segment and re-resolved only on segment
//!   boundary crossings
//! * **Schema evolution tolerance**: every collection buffer is tagged with
//!   its on-disk schema version, consumed downstream as a dispatch key
//! * **Null on absence**: unknown categories and exhausted entry ranges read
//!   as `None`, never as errors
//!
//! ## Module organization
//!
//! This crate is a convenience entry point re-exporting the component crates:
//!
//! * [`common`] - error type, result alias and verification macros
//! * [`format`] - on-disk record definitions, checksummed framing, metadata
//!   decoding, collection-ID table and datamodel registry
//! * [`store`] - the tree-storage backend: segment sources, trees, branch
//!   columns, the in-memory and file-backed implementations, segment chaining
//! * [`frame`] - the reader-neutral intermediate representation of one entry
//! * [`dataset`] - the dataset reader itself
//!
//! ## Reading a dataset
//!
//! ```no_run
//! use telar::DatasetReader;
//!
//! # fn main() -> telar::common::Result<()> {
//! let mut reader = DatasetReader::open_files(&["run-001.telar", "run-002.telar"])?;
//! while let Some(frame) = reader.read_next("events")? {
//!     for (name, buffers) in frame.collections() {
//!         let _ = (name, buffers.schema_version);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use telar_common as common;
pub use telar_dataset as dataset;
pub use telar_format as format;
pub use telar_frame as frame;
pub use telar_store as store;

pub use telar_dataset::read::DatasetReader;
pub use telar_frame::{CollectionBuffers, EntryParameters, FrameData};
