// Zlib payload of the compressed envelope.
//
// `ZlibStream` drives `flate2::Decompress` directly so that running out of
// input before the stream end marker (and its adler32 trailer) surfaces as
// `UnexpectedEof` instead of a quiet end of data.

use std::io::{self, BufRead, Read};

use flate2::{Decompress, FlushDecompress, Status};

pub struct ZlibStream<R> {
    inner: R,
    state: Decompress,
    finished: bool,
}

impl<R: BufRead> ZlibStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: Decompress::new(true),
            finished: false,
        }
    }
}

impl<R: BufRead> Read for ZlibStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.finished {
            return Ok(0);
        }
        loop {
            let input = self.inner.fill_buf()?;
            let eof = input.is_empty();
            let flush = if eof {
                FlushDecompress::Finish
            } else {
                FlushDecompress::None
            };
            let (in_before, out_before) = (self.state.total_in(), self.state.total_out());
            let status = self
                .state
                .decompress(input, buf, flush)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let read = (self.state.total_in() - in_before) as usize;
            let written = (self.state.total_out() - out_before) as usize;
            self.inner.consume(read);

            match status {
                Status::StreamEnd => {
                    self.finished = true;
                    return Ok(written);
                }
                _ if written > 0 => return Ok(written),
                _ if eof => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "zlib stream ended early",
                    ));
                }
                _ if read == 0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "inflate made no progress",
                    ));
                }
                _ => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn inflates_to_stream_end() {
        let packed = zlib(b"hello hello hello");
        let mut out = Vec::new();
        ZlibStream::new(&packed[..]).read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello hello hello");
    }

    #[test]
    fn missing_trailer_is_unexpected_eof() {
        let packed = zlib(&[1, 2, 3, 4, 5, 6, 7, 8]);
        for cut in 1..packed.len() {
            let err = ZlibStream::new(&packed[..packed.len() - cut])
                .read_to_end(&mut Vec::new())
                .unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof, "cut {cut}");
        }
    }

    #[test]
    fn bad_checksum_is_invalid_data() {
        let mut packed = zlib(&[9; 32]);
        let last = packed.len() - 1;
        packed[last] ^= 0xFF;
        let err = ZlibStream::new(&packed[..])
            .read_to_end(&mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn bytes_after_stream_end_are_left_unread() {
        let mut packed = zlib(b"ab");
        let len = packed.len();
        packed.extend_from_slice(&[0xEE, 0xEE]);
        let mut input = &packed[..];
        let mut out = Vec::new();
        ZlibStream::new(&mut input).read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab");
        assert_eq!(input, &packed[len..]);
    }
}
