// Byte-at-a-time reader with one byte of push-back.
//
// Decoders see the input only through `ByteSource`, so the same decoder
// runs over an in-memory slice, a file, or the inflated payload of a
// compressed envelope.

use std::io::{self, Read};

use super::decoder::DecodeError;

// ---------------------------------------------------------------------------
// ByteSource trait
// ---------------------------------------------------------------------------

/// Sequential byte input with a single byte of lookahead.
///
/// `unread_byte` returns the byte most recently produced by `read_byte` to
/// the source. It may be called once per read; a second call, or a call
/// before any read, fails with [`DecodeError::InvalidState`].
pub trait ByteSource {
    /// Read the next byte, failing with [`DecodeError::EndOfInput`] when the
    /// source is exhausted.
    fn read_byte(&mut self) -> Result<u8, DecodeError>;

    /// Push the last read byte back.
    fn unread_byte(&mut self) -> Result<(), DecodeError>;

    /// Fill `buf` completely.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        for slot in buf.iter_mut() {
            *slot = self.read_byte()?;
        }
        Ok(())
    }

    /// Read a big-endian `u16`.
    fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let mut buf = [0u8; 2];
        self.read_into(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read a big-endian `u32`.
    fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let mut buf = [0u8; 4];
        self.read_into(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Read a big-endian `u64`.
    fn read_u64_be(&mut self) -> Result<u64, DecodeError> {
        let mut buf = [0u8; 8];
        self.read_into(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }
}

/// Consume the tag byte and check it is `expected`.
pub(crate) fn expect_tag(src: &mut dyn ByteSource, expected: u8) -> Result<(), DecodeError> {
    let found = src.read_byte()?;
    if found != expected {
        return Err(DecodeError::TagMismatch { expected, found });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ByteCursor
// ---------------------------------------------------------------------------

/// [`ByteSource`] over any [`Read`] implementation.
///
/// The cursor does not buffer: each `read_byte` pulls exactly one byte from
/// the inner reader unless a pushed-back byte is pending. Wrap slow readers
/// in a `BufReader` before handing them over.
pub struct ByteCursor<R> {
    inner: R,
    /// Byte returned by the last `read_byte`, eligible for push-back.
    last: Option<u8>,
    /// Pushed-back byte served by the next read.
    pending: Option<u8>,
    /// Net bytes consumed (reads minus push-backs).
    consumed: u64,
    /// Inner reader is an inflate stream; its errors are decompression errors.
    inflating: bool,
}

impl<R: Read> ByteCursor<R> {
    /// Create a cursor over a plain byte stream.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            last: None,
            pending: None,
            consumed: 0,
            inflating: false,
        }
    }

    /// Create a cursor over an inflate stream.
    pub(crate) fn inflating(inner: R) -> Self {
        Self {
            inflating: true,
            ..Self::new(inner)
        }
    }

    /// Number of bytes consumed so far, not counting a pending push-back.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Recover the inner reader. A pending push-back byte is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read to the end of the stream. Returns how many bytes were left.
    pub(crate) fn drain(&mut self) -> Result<u64, DecodeError> {
        let mut rest = 0u64;
        let mut buf = [0u8; 512];
        loop {
            match Read::read(self, &mut buf) {
                Ok(0) => return Ok(rest),
                Ok(n) => rest += n as u64,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.map_io(e)),
            }
        }
    }

    fn map_io(&self, e: io::Error) -> DecodeError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::EndOfInput
        } else if self.inflating {
            DecodeError::Decompression(e)
        } else {
            DecodeError::Io(e)
        }
    }
}

impl<R: Read> ByteSource for ByteCursor<R> {
    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = match self.pending.take() {
            Some(byte) => byte,
            None => {
                let mut buf = [0u8; 1];
                self.inner.read_exact(&mut buf).map_err(|e| self.map_io(e))?;
                buf[0]
            }
        };
        self.consumed += 1;
        self.last = Some(byte);
        Ok(byte)
    }

    fn unread_byte(&mut self) -> Result<(), DecodeError> {
        let byte = self.last.take().ok_or(DecodeError::InvalidState)?;
        self.pending = Some(byte);
        self.consumed -= 1;
        Ok(())
    }
}

/// Bulk reads drain the pushed-back byte first. After a bulk read nothing
/// can be pushed back.
impl<R: Read> Read for ByteCursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.last = None;
        if let Some(byte) = self.pending.take() {
            buf[0] = byte;
            self.consumed += 1;
            return Ok(1);
        }
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
