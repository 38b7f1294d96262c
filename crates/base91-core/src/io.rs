//! `std::io::Write` adapters that encode or decode on the way through.
//!
//! Both adapters hold back input that does not fill a whole block and emit
//! it when [`EncoderWriter::finish`] / [`DecoderWriter::finish`] is called.
//! `flush` delivers every converted block but keeps the held-back tail: a
//! tail can only be written once, at the very end. When the inner writer
//! fails, input already accepted stays buffered and goes out with a later
//! call. Dropping an unfinished adapter finishes it and discards any error.
//!
//! ```
//! use std::io::Write;
//! use base91_core::io::{DecoderWriter, EncoderWriter};
//!
//! let mut enc = EncoderWriter::new(Vec::new());
//! enc.write_all(b"streamed ").unwrap();
//! enc.write_all(b"in pieces").unwrap();
//! let text = enc.finish().unwrap();
//!
//! let mut dec = DecoderWriter::new(Vec::new());
//! for piece in text.chunks(5) {
//!     dec.write_all(piece).unwrap();
//! }
//! assert_eq!(dec.finish().unwrap(), b"streamed in pieces");
//! ```

use std::io::{self, Write};

use crate::codec::Codec;
use crate::error::Base91Error;
use crate::length::{BLOCK_BYTES, BLOCK_SYMBOLS};

/// Most blocks converted by one `write` call.
const BATCH_BLOCKS: usize = 256;

fn to_io_error(err: Base91Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn finished() -> io::Error {
    io::Error::other("base91 writer already finished")
}

/// Which direction a [`Pipe`] converts.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Encode,
    Decode,
}

impl Direction {
    /// (input unit, output unit) of one block.
    fn units(self) -> (usize, usize) {
        match self {
            Direction::Encode => (BLOCK_BYTES, BLOCK_SYMBOLS),
            Direction::Decode => (BLOCK_SYMBOLS, BLOCK_BYTES),
        }
    }

    fn run(
        self,
        codec: &Codec,
        input: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<usize, Base91Error> {
        let progress = match self {
            Direction::Encode => codec.encode(input, output, is_final)?,
            Direction::Decode => codec.decode(input, output, is_final)?,
        };
        Ok(progress.written)
    }
}

/// Shared buffering for both adapters.
///
/// `pending` holds accepted input short of a whole block; `unflushed` holds
/// converted output the inner writer has not taken yet. Input counted as
/// written by `write` is always in one of the two (or already delivered).
#[derive(Debug)]
struct Pipe<W: Write> {
    inner: Option<W>,
    codec: Codec,
    direction: Direction,
    pending: Vec<u8>,
    unflushed: Vec<u8>,
}

impl<W: Write> Pipe<W> {
    fn new(inner: W, codec: Codec, direction: Direction) -> Self {
        let (unit, out_unit) = direction.units();
        Pipe {
            inner: Some(inner),
            codec,
            direction,
            pending: Vec::with_capacity(BATCH_BLOCKS * unit),
            unflushed: Vec::with_capacity(BATCH_BLOCKS * out_unit),
        }
    }

    fn inner_mut(&mut self) -> io::Result<&mut W> {
        self.inner.as_mut().ok_or_else(finished)
    }

    /// Hand converted output to the inner writer until none is left.
    fn drain(&mut self) -> io::Result<()> {
        let inner = self.inner.as_mut().ok_or_else(finished)?;
        while !self.unflushed.is_empty() {
            match inner.write(&self.unflushed) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "base91: inner writer accepted no bytes",
                    ))
                }
                Ok(n) => {
                    log::trace!("base91: flushed {n} bytes ({:?})", self.direction);
                    self.unflushed.drain(..n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Convert `pending[..input_len]` and append the result to `unflushed`.
    /// On error neither buffer changes.
    fn convert(&mut self, input_len: usize, is_final: bool) -> io::Result<()> {
        let (unit, out_unit) = self.direction.units();
        let start = self.unflushed.len();
        self.unflushed.resize(start + input_len.div_ceil(unit) * out_unit, 0);
        match self.direction.run(
            &self.codec,
            &self.pending[..input_len],
            &mut self.unflushed[start..],
            is_final,
        ) {
            Ok(written) => {
                self.unflushed.truncate(start + written);
                self.pending.drain(..input_len);
                Ok(())
            }
            Err(e) => {
                self.unflushed.truncate(start);
                Err(to_io_error(e))
            }
        }
    }

    /// Accept up to a batch of `buf`. An `Err` means nothing was accepted;
    /// a failed delivery after accepting is reported by the next call.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.drain()?;
        let (unit, _) = self.direction.units();
        let take = buf.len().min(BATCH_BLOCKS * unit - self.pending.len());
        self.pending.extend_from_slice(&buf[..take]);

        let whole = self.pending.len() / unit * unit;
        if whole > 0 {
            if let Err(e) = self.convert(whole, false) {
                self.pending.truncate(self.pending.len() - take);
                return Err(e);
            }
            if let Err(e) = self.drain() {
                log::trace!("base91: delivery deferred: {e}");
            }
        }
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.inner_mut()?.flush()
    }

    fn finish(&mut self) -> io::Result<W> {
        self.drain()?;
        self.convert(self.pending.len(), true)?;
        self.drain()?;
        let mut inner = self.inner.take().ok_or_else(finished)?;
        inner.flush()?;
        Ok(inner)
    }
}

/// Encodes everything written to it into `W`.
#[derive(Debug)]
pub struct EncoderWriter<W: Write> {
    pipe: Pipe<W>,
}

impl<W: Write> EncoderWriter<W> {
    /// Wrap `inner` using the detected tier.
    pub fn new(inner: W) -> Self {
        Self::with_codec(inner, Codec::new())
    }

    /// Wrap `inner` using a specific codec.
    pub fn with_codec(inner: W, codec: Codec) -> Self {
        EncoderWriter {
            pipe: Pipe::new(inner, codec, Direction::Encode),
        }
    }

    /// Encode the held-back tail, flush, and hand back the inner writer.
    ///
    /// # Errors
    ///
    /// Any error from the inner writer, or an error if already finished.
    pub fn finish(mut self) -> io::Result<W> {
        self.pipe.finish()
    }
}

impl<W: Write> Write for EncoderWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pipe.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.pipe.flush()
    }
}

impl<W: Write> Drop for EncoderWriter<W> {
    fn drop(&mut self) {
        if self.pipe.inner.is_some() {
            self.pipe.finish().ok();
        }
    }
}

/// Decodes base91 text written to it into `W`.
///
/// Symbols are not validated; a text length that no encoder produces makes
/// [`DecoderWriter::finish`] fail with [`io::ErrorKind::InvalidData`].
#[derive(Debug)]
pub struct DecoderWriter<W: Write> {
    pipe: Pipe<W>,
}

impl<W: Write> DecoderWriter<W> {
    /// Wrap `inner` using the detected tier.
    pub fn new(inner: W) -> Self {
        Self::with_codec(inner, Codec::new())
    }

    /// Wrap `inner` using a specific codec.
    pub fn with_codec(inner: W, codec: Codec) -> Self {
        DecoderWriter {
            pipe: Pipe::new(inner, codec, Direction::Decode),
        }
    }

    /// Decode the held-back tail, flush, and hand back the inner writer.
    ///
    /// # Errors
    ///
    /// [`io::ErrorKind::InvalidData`] for an undecodable total length, any
    /// error from the inner writer, or an error if already finished.
    pub fn finish(mut self) -> io::Result<W> {
        self.pipe.finish()
    }
}

impl<W: Write> Write for DecoderWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pipe.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.pipe.flush()
    }
}

impl<W: Write> Drop for DecoderWriter<W> {
    fn drop(&mut self) {
        if self.pipe.inner.is_some() {
            self.pipe.finish().ok();
        }
    }
}
