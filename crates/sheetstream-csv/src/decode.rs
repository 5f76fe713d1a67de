//! Incremental character-set transcoding
//!
//! Wraps a byte stream in any encoding `encoding_rs` knows and reads out
//! UTF-8, chunk by chunk, so large files never load whole. UTF-8 input
//! bypasses this module entirely.

use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder, Encoding};

pub(crate) struct DecodingReader<R: Read> {
    inner: R,
    decoder: Decoder,
    input: [u8; 8192],
    start: usize,
    end: usize,
    pending: Vec<u8>,
    pos: usize,
    /// Inner reader exhausted
    eof: bool,
    /// Decoder flushed with its final chunk
    done: bool,
}

impl<R: Read> DecodingReader<R> {
    pub(crate) fn new(inner: R, encoding: &'static Encoding) -> Self {
        DecodingReader {
            inner,
            decoder: encoding.new_decoder(),
            input: [0; 8192],
            start: 0,
            end: 0,
            pending: Vec::new(),
            pos: 0,
            eof: false,
            done: false,
        }
    }

    /// Decode the next non-empty chunk into `pending`
    fn refill(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.pos = 0;
        let mut out = [0u8; 8192];
        while self.pending.is_empty() && !self.done {
            if self.start == self.end && !self.eof {
                self.start = 0;
                self.end = self.inner.read(&mut self.input)?;
                if self.end == 0 {
                    self.eof = true;
                }
            }
            let last = self.eof && self.start == self.end;
            let (result, read, written, _had_errors) =
                self.decoder
                    .decode_to_utf8(&self.input[self.start..self.end], &mut out, last);
            self.start += read;
            self.pending.extend_from_slice(&out[..written]);
            if last && result == CoderResult::InputEmpty {
                self.done = true;
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.pending.len() {
            if self.done {
                return Ok(0);
            }
            self.refill()?;
        }
        let n = (self.pending.len() - self.pos).min(out.len());
        out[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
