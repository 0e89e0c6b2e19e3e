// Envelope handling and tag dispatch.
//
// A top-level encoding is `131, tag, record...` or, for the compressed
// envelope, `131, 80, size: u32, zlib(tag, record...)`. The tag is read,
// pushed back, and the record decoder re-reads it from the same cursor.
// After inflation the cursor is the inflate stream, which cannot seek, so
// push-back is what lets the real tag be dispatched the same way.

use std::io::{BufReader, Read};

use super::cursor::{ByteCursor, ByteSource};
use super::inflate::ZlibStream;
use super::tag::{self, COMPRESSED, VERSION_MAGIC};
use super::{float, integer, list};
use crate::term::Term;

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Input ended in the middle of a record.
    #[error("unexpected end of input")]
    EndOfInput,
    /// `unread_byte` without a preceding `read_byte`.
    #[error("no byte available to push back")]
    InvalidState,
    #[error("{0} is an unknown version specifier (expected 131)")]
    BadVersion(u8),
    #[error("{0} is an unknown tag")]
    UnknownTag(u8),
    #[error("tag {0} ({name}) is not supported", name = tag_label(.0))]
    UnsupportedTag(u8),
    /// A record decoder was handed a record with another tag.
    #[error("expected tag {expected}, found {found}")]
    TagMismatch { expected: u8, found: u8 },
    #[error("malformed float text {0:?}")]
    MalformedFloat(String),
    #[error("decompression failed: {0}")]
    Decompression(#[source] std::io::Error),
    #[error("compressed size hint {expected} does not match record length {actual}")]
    SizeHintMismatch { expected: u32, actual: u64 },
    #[error("trailing bytes after record")]
    TrailingBytes,
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

fn tag_label(tag: &u8) -> &'static str {
    tag::name(*tag).unwrap_or("?")
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Decoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail with [`DecodeError::SizeHintMismatch`] when a compressed
    /// envelope's size field disagrees with the inflated record length.
    /// When unset the mismatch is only logged.
    pub verify_size_hint: bool,
    /// Fail with [`DecodeError::TrailingBytes`] unless the record is the last
    /// thing in its stream (the input, or the inflated payload).
    pub reject_trailing: bool,
}

// ---------------------------------------------------------------------------
// Dispatch table
// ---------------------------------------------------------------------------

/// A record decoder. It is handed a cursor positioned on its own tag byte.
pub type DecodeFn = fn(&mut dyn ByteSource) -> Result<Term, DecodeError>;

static DECODERS: [Option<DecodeFn>; 256] = build_table();

const fn build_table() -> [Option<DecodeFn>; 256] {
    let mut table: [Option<DecodeFn>; 256] = [None; 256];
    table[tag::SMALL_INTEGER_EXT as usize] = Some(integer::decode_small_integer as DecodeFn);
    table[tag::INTEGER_EXT as usize] = Some(integer::decode_integer as DecodeFn);
    table[tag::SMALL_BIG_EXT as usize] = Some(integer::decode_small_big as DecodeFn);
    table[tag::LARGE_BIG_EXT as usize] = Some(integer::decode_large_big as DecodeFn);
    table[tag::NEW_FLOAT_EXT as usize] = Some(float::decode_new_float as DecodeFn);
    table[tag::FLOAT_EXT as usize] = Some(float::decode_old_float as DecodeFn);
    table[tag::STRING_EXT as usize] = Some(list::decode_string as DecodeFn);
    table[tag::NIL_EXT as usize] = Some(list::decode_nil as DecodeFn);
    table
}

/// Decoder registered for `tag`, if any.
#[inline]
pub fn decoder_for(tag: u8) -> Option<DecodeFn> {
    DECODERS[usize::from(tag)]
}

/// Peek the tag and hand the cursor to its decoder.
fn dispatch(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    let tag = src.read_byte()?;
    src.unread_byte()?;
    match decoder_for(tag) {
        Some(decode) => {
            log::trace!("dispatching tag {tag} ({})", tag::name(tag).unwrap_or("?"));
            decode(src)
        }
        None if tag::is_known(tag) => Err(DecodeError::UnsupportedTag(tag)),
        None => Err(DecodeError::UnknownTag(tag)),
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decode one term from an in-memory encoding with default options.
///
/// ```
/// use erlext::{Term, decode};
///
/// assert_eq!(decode(&[131, 97, 42]).unwrap(), Term::Int64(42));
/// ```
pub fn decode(bytes: &[u8]) -> Result<Term, DecodeError> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode one term from an in-memory encoding.
pub fn decode_with(bytes: &[u8], opts: &DecodeOptions) -> Result<Term, DecodeError> {
    decode_reader(bytes, opts)
}

/// Decode one term from a byte stream positioned at the version byte.
///
/// With `reject_trailing` set this reads one byte past a plain record to
/// confirm the stream is exhausted. A compressed payload is always inflated
/// to its end marker.
pub fn decode_reader<R: Read>(reader: R, opts: &DecodeOptions) -> Result<Term, DecodeError> {
    let mut cursor = ByteCursor::new(reader);
    read_version(&mut cursor)?;

    let tag = cursor.read_byte()?;
    if tag != COMPRESSED {
        cursor.unread_byte()?;
        let term = dispatch(&mut cursor)?;
        if opts.reject_trailing {
            expect_exhausted(&mut cursor)?;
        }
        return Ok(term);
    }

    let size_hint = cursor.read_u32_be()?;
    log::debug!("compressed envelope, uncompressed size hint {size_hint}");

    let mut inflated = ByteCursor::inflating(ZlibStream::new(BufReader::new(&mut cursor)));
    let term = dispatch(&mut inflated)?;
    let record_len = inflated.consumed();
    let trailing = inflated.drain()?;
    check_size_hint(size_hint, record_len, opts)?;
    if trailing > 0 {
        if opts.reject_trailing {
            return Err(DecodeError::TrailingBytes);
        }
        log::debug!("ignoring {trailing} inflated bytes after the record");
    }
    Ok(term)
}

fn read_version(src: &mut dyn ByteSource) -> Result<(), DecodeError> {
    let version = src.read_byte()?;
    if version != VERSION_MAGIC {
        return Err(DecodeError::BadVersion(version));
    }
    Ok(())
}

fn check_size_hint(expected: u32, actual: u64, opts: &DecodeOptions) -> Result<(), DecodeError> {
    if u64::from(expected) == actual {
        return Ok(());
    }
    if opts.verify_size_hint {
        return Err(DecodeError::SizeHintMismatch { expected, actual });
    }
    log::warn!("compressed size hint {expected} does not match record length {actual}");
    Ok(())
}

fn expect_exhausted(src: &mut dyn ByteSource) -> Result<(), DecodeError> {
    match src.read_byte() {
        Err(DecodeError::EndOfInput) => Ok(()),
        Ok(_) => Err(DecodeError::TrailingBytes),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Envelope inspection
// ---------------------------------------------------------------------------

/// What precedes the record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeInfo {
    /// Whether the record sits inside a zlib envelope.
    pub compressed: bool,
    /// Uncompressed size field of the envelope.
    pub size_hint: Option<u32>,
    /// Tag of the record itself (after inflation when compressed).
    pub tag: u8,
}

impl EnvelopeInfo {
    pub fn tag_name(&self) -> Option<&'static str> {
        tag::name(self.tag)
    }

    pub fn has_decoder(&self) -> bool {
        decoder_for(self.tag).is_some()
    }
}

/// Read the envelope and the record tag without decoding the payload.
pub fn inspect<R: Read>(reader: R) -> Result<EnvelopeInfo, DecodeError> {
    let mut cursor = ByteCursor::new(reader);
    read_version(&mut cursor)?;

    let tag = cursor.read_byte()?;
    if tag != COMPRESSED {
        return Ok(EnvelopeInfo {
            compressed: false,
            size_hint: None,
            tag,
        });
    }

    let size_hint = cursor.read_u32_be()?;
    let mut inflated = ByteCursor::inflating(ZlibStream::new(BufReader::new(&mut cursor)));
    let tag = inflated.read_byte()?;
    Ok(EnvelopeInfo {
        compressed: true,
        size_hint: Some(size_hint),
        tag,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
