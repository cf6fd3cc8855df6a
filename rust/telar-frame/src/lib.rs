//! Reader-neutral intermediate representation of one dataset entry: raw
//! collection buffers, entry-scoped parameters and the shared collection-ID
//! table, bundled as a [`FrameData`] ready for higher-level object
//! reconstruction.

pub mod buffers;
pub mod frame_data;
pub mod parameters;

pub use buffers::CollectionBuffers;
pub use frame_data::FrameData;
pub use parameters::EntryParameters;
