// List records: STRING_EXT (byte list) and NIL_EXT.
//
// A zero-length STRING_EXT decodes to `Term::Nil`, the same value NIL_EXT
// gives, so an empty list has a single representation.

use super::cursor::{ByteSource, expect_tag};
use super::decoder::DecodeError;
use super::tag::{NIL_EXT, STRING_EXT};
use crate::term::Term;

/// `106`.
pub fn decode_nil(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, NIL_EXT)?;
    Ok(Term::Nil)
}

/// `107, len: u16, bytes[len]`: each byte becomes an `Int64` element.
pub fn decode_string(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, STRING_EXT)?;
    let len = src.read_u16_be()?;
    let mut elements = Vec::with_capacity(usize::from(len));
    for _ in 0..len {
        elements.push(Term::Int64(i64::from(src.read_byte()?)));
    }
    Ok(Term::list(elements))
}
