//! Disk-backed spill buffer with transparent compression
//!
//! Sheet content may exceed comfortable memory limits, so each producer
//! streams its rows into an anonymous temporary file through a fast
//! compressor. `tempfile::tempfile()` unlinks the file on creation (Unix)
//! or marks it delete-on-close (Windows), so normal process exit reclaims
//! it without an explicit deletion step.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Write half of the spill: fill phase
pub(crate) struct SpillBuffer {
    enc: GzEncoder<BufWriter<File>>,
}

impl SpillBuffer {
    /// Open a fresh spill backed by an anonymous temporary file
    pub(crate) fn create() -> io::Result<Self> {
        let file = tempfile::tempfile()?;
        Ok(SpillBuffer {
            enc: GzEncoder::new(BufWriter::new(file), Compression::fast()),
        })
    }

    /// Finish the fill phase: flush and close the compressor, rewind the
    /// backing file and expose it as a decompressing reader.
    pub(crate) fn into_reader(self) -> io::Result<SpillReader> {
        let buf = self.enc.finish()?;
        let mut file = buf.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.seek(SeekFrom::Start(0))?;
        Ok(SpillReader {
            dec: GzDecoder::new(BufReader::new(file)),
        })
    }
}

impl Write for SpillBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.enc.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.enc.flush()
    }
}

/// Read half of the spill: the finished byte stream
///
/// Dropping the reader closes the backing file, which is all the cleanup
/// an anonymous temporary file needs.
pub(crate) struct SpillReader {
    dec: GzDecoder<BufReader<File>>,
}

impl Read for SpillReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.dec.read(buf)
    }
}
