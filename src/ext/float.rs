// Float records: NEW_FLOAT_EXT (binary) and FLOAT_EXT (legacy ASCII).

use super::cursor::{ByteSource, expect_tag};
use super::decoder::DecodeError;
use super::tag::{FLOAT_EXT, NEW_FLOAT_EXT};
use crate::term::Term;

/// Fixed payload width of FLOAT_EXT.
pub const OLD_FLOAT_LEN: usize = 31;

/// `70, f64`: big-endian IEEE-754 bit pattern, taken as-is.
pub fn decode_new_float(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, NEW_FLOAT_EXT)?;
    let bits = src.read_u64_be()?;
    Ok(Term::Float(f64::from_bits(bits)))
}

/// `99, ascii[31]`: NUL-padded decimal text such as
/// `"0.00000000000000000000e+00"`.
pub fn decode_old_float(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, FLOAT_EXT)?;
    let mut buf = [0u8; OLD_FLOAT_LEN];
    src.read_into(&mut buf)?;
    parse_old_float(&buf).map(Term::Float)
}

fn parse_old_float(buf: &[u8]) -> Result<f64, DecodeError> {
    let end = buf.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = &buf[..end];
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| DecodeError::MalformedFloat(String::from_utf8_lossy(text).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::cursor::ByteCursor;

    fn old_float_record(text: &str) -> Vec<u8> {
        let mut rec = vec![FLOAT_EXT];
        rec.extend_from_slice(text.as_bytes());
        rec.resize(1 + OLD_FLOAT_LEN, 0);
        rec
    }

    #[test]
    fn new_float_is_bit_exact() {
        for v in [0.0f64, -0.0, 1.5, -2.25e300, f64::MIN_POSITIVE, f64::INFINITY] {
            let mut rec = vec![NEW_FLOAT_EXT];
            rec.extend_from_slice(&v.to_bits().to_be_bytes());
            let mut cur = ByteCursor::new(&rec[..]);
            match decode_new_float(&mut cur).unwrap() {
                Term::Float(got) => assert_eq!(got.to_bits(), v.to_bits()),
                other => panic!("expected float, got {other:?}"),
            }
        }
    }

    #[test]
    fn old_float_parses_trimmed_text() {
        let cases = [
            ("0.00000000000000000000e+00", 0.0),
            ("1.50000000000000000000e+00", 1.5),
            ("-3.14159000000000010577e+00", -3.14159),
            ("1.00000000000000000000e+100", 1e100),
        ];
        for (text, expected) in cases {
            let rec = old_float_record(text);
            let mut cur = ByteCursor::new(&rec[..]);
            assert_eq!(decode_old_float(&mut cur).unwrap(), Term::Float(expected), "{text}");
        }
    }

    #[test]
    fn old_float_rejects_garbage() {
        let rec = old_float_record("not a float");
        let mut cur = ByteCursor::new(&rec[..]);
        match decode_old_float(&mut cur) {
            Err(DecodeError::MalformedFloat(text)) => assert_eq!(text, "not a float"),
            other => panic!("expected MalformedFloat, got {other:?}"),
        }
    }

    #[test]
    fn old_float_all_nul_is_malformed() {
        let rec = old_float_record("");
        let mut cur = ByteCursor::new(&rec[..]);
        assert!(matches!(
            decode_old_float(&mut cur),
            Err(DecodeError::MalformedFloat(_))
        ));
    }

    #[test]
    fn old_float_interior_nul_is_malformed() {
        let mut rec = old_float_record("1.0");
        rec[10] = b'7';
        let mut cur = ByteCursor::new(&rec[..]);
        assert!(matches!(
            decode_old_float(&mut cur),
            Err(DecodeError::MalformedFloat(_))
        ));
    }

    #[test]
    fn short_payloads_are_end_of_input() {
        let rec = old_float_record("1.0");
        let mut cur = ByteCursor::new(&rec[..rec.len() - 1]);
        assert!(matches!(decode_old_float(&mut cur), Err(DecodeError::EndOfInput)));

        let mut cur = ByteCursor::new(&[NEW_FLOAT_EXT, 0, 0, 0][..]);
        assert!(matches!(decode_new_float(&mut cur), Err(DecodeError::EndOfInput)));
    }
}
