// External term format decoding.
//
// Decode-only; covers the numeric records, byte-list strings, nil and the
// zlib-compressed envelope.
//
// # Modules
//
// - `tag`    : Version byte and record tag constants
// - `cursor` : Byte-at-a-time input with one byte of push-back
// - `integer`: Small/32-bit integers and bignums
// - `float`  : Binary and legacy ASCII floats
// - `inflate`: Zlib payload reader that insists on the stream end
// - `list`   : Byte-list strings and nil
// - `decoder`: Envelope handling, tag dispatch, errors and options

pub mod cursor;
pub mod decoder;
pub mod float;
pub mod inflate;
pub mod integer;
pub mod list;
pub mod tag;

// Re-export key types for convenience.
pub use cursor::{ByteCursor, ByteSource};
pub use decoder::{
    DecodeError, DecodeFn, DecodeOptions, EnvelopeInfo, decode, decode_reader, decode_with,
    decoder_for, inspect,
};
pub use tag::VERSION_MAGIC;
