//! Frame assembly: materializing the buffers and parameters of one entry.
//!
//! The cursor contract:
//! - a sequential read serves the cursor entry and advances the cursor only
//!   on success;
//! - an explicit read of entry `k` sets the cursor to `k + 1` on success, so
//!   a following sequential read continues from the requested point;
//! - end-of-data and failures never move the cursor.

use telar_common::Result;
use telar_format::record;
use telar_frame::{EntryParameters, FrameData};
use telar_store::BranchColumn;

use super::category::CategoryState;

impl CategoryState {
    /// Serves the next sequential entry, or `None` at end of data.
    pub(crate) fn read_next(&mut self) -> Result<Option<FrameData>> {
        let frame = self.materialize(self.cursor)?;
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    /// Serves an explicit entry, repositioning the cursor behind it on
    /// success. Entries read out of order do not corrupt later sequential
    /// reads.
    pub(crate) fn read_at(&mut self, entry: u64) -> Result<Option<FrameData>> {
        let frame = self.materialize(entry)?;
        if frame.is_some() {
            self.cursor = entry + 1;
        }
        Ok(frame)
    }

    /// Assembles the buffer bundle for `entry`.
    ///
    /// Returns `Ok(None)` when the entry index is at or beyond the end of
    /// the chained entry space, or when the category is unknown; both are
    /// normal terminal conditions, not errors.
    fn materialize(&mut self, entry: u64) -> Result<Option<FrameData>> {
        self.check_usable()?;
        let Some(tree) = &self.tree else {
            return Ok(None);
        };
        let Some(location) = tree.locate(entry) else {
            return Ok(None);
        };

        // Crossing into another physical file invalidates every resolved
        // handle; the new segment may lay the branches out independently.
        if self.current_segment != Some(location.segment) {
            for slot in &mut self.slots {
                slot.invalidate();
            }
            self.parameters_slot.invalidate();
            self.current_segment = Some(location.segment);
        }

        let segment_tree = tree.segment(location.segment)?.clone();
        let mut buffers = Vec::with_capacity(self.descriptors.len());
        for descriptor in &self.descriptors {
            let slot = &mut self.slots[descriptor.slot];
            let branches = slot.resolve(location.segment, &segment_tree, descriptor)?;
            let collection = branches.read_buffers(descriptor, location.local)?;
            buffers.push((descriptor.name.clone(), collection));
        }

        let parameters_column = self
            .parameters_slot
            .resolve(location.segment, &segment_tree)
            .clone();
        let parameters = match parameters_column {
            Some(column) => {
                let cell = column.read_cell(location.local)?;
                record::decode_payload::<EntryParameters>(
                    &format!("parameters of '{}'", self.name()),
                    &cell,
                )?
            }
            None => EntryParameters::new(),
        };

        Ok(Some(FrameData::new(
            buffers,
            self.id_table.clone(),
            parameters,
        )))
    }
}
