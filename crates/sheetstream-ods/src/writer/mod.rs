//! The ODS document assembler
//!
//! The writer owns the output archive and hands out one [`OdsSheet`] per
//! `new_sheet` call. Sheets are filled (and closed) on their own threads;
//! the assembler merges their finished streams into the archive body in
//! creation order, no matter which sheet finishes first.
//!
//! Each `new_sheet` call reserves the next slot in an ordered list before
//! the sheet's content exists. A slot is a one-shot channel: the producer
//! delivers its finished byte stream there, and the drain walks the slot
//! list from a cursor, copying streams into the archive. Non-blocking
//! drains (triggered whenever any sheet closes) bound how many finished
//! sheets sit buffered on disk; the final blocking drain in [`OdsWriter::close`]
//! guarantees completeness.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use sheetstream_core::{Column, Error as CoreError, SpreadsheetWriter};

use crate::error::{OdsError, OdsResult};
use crate::spill::{SpillBuffer, SpillReader};
use crate::styles::StyleRegistry;
use crate::xml;

mod sheet;
pub use sheet::OdsSheet;

/// Entry options for everything after the stored mimetype marker
fn deflated() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Writes an ODS document whose sheets may be filled concurrently
///
/// The final archive lists sheets in the order they were created with
/// [`OdsWriter::new_sheet`], independent of the order their threads finish.
/// [`OdsWriter::close`] blocks until every sheet has delivered its content.
pub struct OdsWriter<W: Write + Seek> {
    doc: Arc<Document<W>>,
}

/// Shared, lock-protected coordinator behind every sheet handle
pub(crate) struct Document<W: Write + Seek> {
    inner: Mutex<Inner<W>>,
}

impl<W: Write + Seek> Document<W> {
    /// A poisoned lock means a producer panicked mid-append; its sheet is
    /// abandoned but the document state itself is still consistent, so the
    /// remaining sheets may finish.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub(crate) struct Inner<W: Write + Seek> {
    /// Positioned inside the content.xml entry while the document is open
    zip: Option<ZipWriter<W>>,
    pub(crate) styles: StyleRegistry,
    /// One slot per sheet, in creation order
    slots: Vec<Slot>,
    /// First slot not yet copied into the archive body
    cursor: usize,
}

enum Slot {
    Pending(Receiver<SpillReader>),
    Drained,
}

impl OdsWriter<File> {
    /// Create an ODS file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> OdsResult<Self> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write + Seek> OdsWriter<W> {
    /// Open the archive and write the fixed preamble parts
    ///
    /// The mimetype marker goes first and uncompressed per ODF packaging
    /// rules; metadata, manifest and settings follow, then the body entry
    /// is opened and its wrapper tags written. Sheet bytes land in the body
    /// as sheets finish.
    pub fn new(w: W) -> OdsResult<Self> {
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut zip = ZipWriter::new(w);
        zip.start_file("mimetype", stored)?;
        zip.write_all(xml::MIMETYPE.as_bytes())?;
        zip.start_file("meta.xml", deflated())?;
        zip.write_all(xml::META.as_bytes())?;
        zip.add_directory("META-INF", deflated())?;
        zip.start_file("META-INF/manifest.xml", deflated())?;
        zip.write_all(xml::MANIFEST.as_bytes())?;
        zip.start_file("settings.xml", deflated())?;
        zip.write_all(xml::SETTINGS.as_bytes())?;
        zip.start_file("content.xml", deflated())?;
        zip.write_all(xml::CONTENT_BEGIN.as_bytes())?;

        Ok(OdsWriter {
            doc: Arc::new(Document {
                inner: Mutex::new(Inner {
                    zip: Some(zip),
                    styles: StyleRegistry::default(),
                    slots: Vec::new(),
                    cursor: 0,
                }),
            }),
        })
    }

    /// Create the next sheet; its position in the document is fixed now
    ///
    /// Thread-safe. The returned handle is meant to move to its own thread;
    /// appends on it never block on other sheets. Header and column style
    /// lookups against the shared style registry happen here, under the
    /// document lock.
    pub fn new_sheet(&self, name: &str, columns: &[Column]) -> OdsResult<OdsSheet<W>> {
        let mut inner = self.doc.lock();
        if inner.zip.is_none() {
            return Err(CoreError::DocumentClosed.into());
        }

        let mut spill = SpillBuffer::create()?;
        xml::write_begin_sheet(&mut spill, name, columns, &mut inner.styles)?;

        let (done, slot) = std::sync::mpsc::sync_channel(1);
        inner.slots.push(Slot::Pending(slot));

        Ok(OdsSheet::new(Arc::clone(&self.doc), name, spill, done))
    }

    /// Wait for every sheet, then finalize the archive
    ///
    /// Blocks until each slot has delivered, copies the remaining streams
    /// into the body in creation order, closes the body wrapper, emits the
    /// consolidated styles entry and finishes the archive. Idempotent:
    /// closing an already-closed writer is a no-op.
    pub fn close(&mut self) -> OdsResult<()> {
        let mut inner = self.doc.lock();
        if inner.zip.is_none() {
            return Ok(());
        }
        inner.drain(true)?;

        // All slots are drained; the body can be sealed now.
        let Some(mut zip) = inner.zip.take() else {
            return Ok(());
        };
        zip.write_all(xml::CONTENT_END.as_bytes())?;

        zip.start_file("styles.xml", deflated())?;
        zip.write_all(xml::STYLES_BEGIN.as_bytes())?;
        for fragment in inner.styles.fragments() {
            zip.write_all(fragment.as_bytes())?;
        }
        zip.write_all(xml::STYLES_END.as_bytes())?;
        zip.finish()?;
        Ok(())
    }
}

impl<W: Write + Seek> Inner<W> {
    /// Copy finished sheet streams into the archive body, in slot order
    ///
    /// Walks the slot list from the cursor. When `blocking`, waits for each
    /// slot's completion; otherwise advances only over slots that are
    /// already finished and stops at the first pending one. Either way the
    /// cursor only ever moves forward, so sheet bodies appear in creation
    /// order and are never interleaved.
    pub(crate) fn drain(&mut self, blocking: bool) -> OdsResult<()> {
        let Some(zip) = self.zip.as_mut() else {
            // Nothing to copy into; late non-blocking drains after close
            // are harmless.
            return Ok(());
        };
        while self.cursor < self.slots.len() {
            let finished = match &self.slots[self.cursor] {
                Slot::Drained => {
                    self.cursor += 1;
                    continue;
                }
                Slot::Pending(slot) => {
                    if blocking {
                        // A disconnected slot means its producer died
                        // without delivering; skip it rather than stall.
                        slot.recv().ok()
                    } else {
                        match slot.try_recv() {
                            Ok(reader) => Some(reader),
                            Err(TryRecvError::Empty) => return Ok(()),
                            Err(TryRecvError::Disconnected) => None,
                        }
                    }
                }
            };
            let index = self.cursor;
            self.slots[index] = Slot::Drained;
            self.cursor += 1;
            match finished {
                Some(mut reader) => {
                    let n = std::io::copy(&mut reader, zip)?;
                    log::debug!("sheet slot {index}: copied {n} bytes into archive body");
                }
                None => log::warn!("sheet slot {index} abandoned without content, skipping"),
            }
        }
        Ok(())
    }
}

impl<W: Write + Seek + Send> SpreadsheetWriter for OdsWriter<W> {
    type Error = OdsError;
    type Sheet = OdsSheet<W>;

    fn new_sheet(&self, name: &str, columns: &[Column]) -> OdsResult<OdsSheet<W>> {
        OdsWriter::new_sheet(self, name, columns)
    }

    fn close(&mut self) -> OdsResult<()> {
        OdsWriter::close(self)
    }
}
