//! Per-sheet XML producer

use std::io::{Seek, Write};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;

use sheetstream_core::{CellValue, Error as CoreError, SheetWriter, MAX_ROW_COUNT};

use crate::error::OdsResult;
use crate::spill::{SpillBuffer, SpillReader};
use crate::xml;

use super::Document;

/// One worksheet being written
///
/// The handle owns a private spill buffer until [`OdsSheet::close`], at
/// which point ownership of the finished byte stream transfers to the
/// document through the sheet's one-shot slot. The handle is `Send` but
/// not `Sync`: one writer per sheet, enforced by the type system rather
/// than a lock, and row encoding never takes the document lock.
pub struct OdsSheet<W: Write + Seek> {
    doc: Arc<Document<W>>,
    name: String,
    spill: Option<SpillBuffer>,
    done: Option<SyncSender<SpillReader>>,
    row_count: u32,
}

impl<W: Write + Seek> OdsSheet<W> {
    pub(crate) fn new(
        doc: Arc<Document<W>>,
        name: &str,
        spill: SpillBuffer,
        done: SyncSender<SpillReader>,
    ) -> Self {
        OdsSheet {
            doc,
            name: name.to_string(),
            spill: Some(spill),
            done: Some(done),
            row_count: 0,
        }
    }

    /// The sheet's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encode one row into the sheet's spill buffer
    ///
    /// Returns the row-limit condition once the sheet holds
    /// [`MAX_ROW_COUNT`] rows; rows already written stay intact and the
    /// sheet can still be closed normally.
    pub fn append_row(&mut self, values: &[CellValue]) -> OdsResult<()> {
        let spill = self.spill.as_mut().ok_or(CoreError::SheetClosed)?;
        if self.row_count >= MAX_ROW_COUNT {
            return Err(CoreError::TooManyRows.into());
        }
        xml::write_row(spill, values)?;
        self.row_count += 1;
        Ok(())
    }

    /// Finish the sheet and hand its stream to the document
    ///
    /// Writes the closing tag, finalizes the compressor, rewinds the spill
    /// and delivers the readable stream into the sheet's slot. Afterwards
    /// it asks the document to opportunistically drain any earlier sheets
    /// that are also ready; that attempt never blocks on another sheet.
    /// Idempotent: closing an already-closed sheet is a no-op.
    pub fn close(&mut self) -> OdsResult<()> {
        let (Some(mut spill), Some(done)) = (self.spill.take(), self.done.take()) else {
            return Ok(());
        };
        xml::write_end_sheet(&mut spill)?;
        let reader = spill.into_reader()?;
        // The slot buffers exactly one payload, so this never blocks; a
        // dead receiver means the document was dropped underneath us.
        if done.send(reader).is_err() {
            log::warn!("sheet {:?}: document gone before handoff", self.name);
            return Ok(());
        }
        self.doc.lock().drain(false)
    }
}

impl<W: Write + Seek> Drop for OdsSheet<W> {
    /// A handle that goes out of scope still delivers its stream, so the
    /// document's final drain cannot stall on it. Errors are ignored here;
    /// call [`OdsSheet::close`] to observe them.
    fn drop(&mut self) {
        if self.spill.is_some() {
            if let Err(e) = self.close() {
                log::warn!("sheet {:?}: close on drop failed: {e}", self.name);
            }
        }
    }
}

impl<W: Write + Seek + Send> SheetWriter for OdsSheet<W> {
    type Error = crate::error::OdsError;

    fn append_row(&mut self, values: &[CellValue]) -> OdsResult<()> {
        OdsSheet::append_row(self, values)
    }

    fn close(&mut self) -> OdsResult<()> {
        OdsSheet::close(self)
    }
}
