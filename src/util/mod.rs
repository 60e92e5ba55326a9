//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

use std::io::{self, ErrorKind, Read};

use bytes::BytesMut;

/// Fills all of `buf` from `source`.
///
/// Short reads are retried until `buf` is full or the source reports end of
/// stream, so a return value below `buf.len()` means the stream is
/// exhausted. `buf` is truncated to exactly the bytes read; its previous
/// contents are overwritten, never zeroed first.
pub(crate) fn read_full<R: Read>(source: &mut R, buf: &mut BytesMut) -> io::Result<usize> {
    let size = buf.len();
    let mut filled = 0;
    while filled < size {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                buf.clear();
                return Err(e);
            }
        }
    }

    buf.truncate(filled);
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read.
    struct Trickle<R> {
        inner: R,
        step: usize,
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    #[test]
    fn test_read_full_loops_over_short_reads() {
        let mut source = Trickle {
            inner: Cursor::new(b"abcdefghij".to_vec()),
            step: 3,
        };
        let mut buf = BytesMut::zeroed(8);

        assert_eq!(read_full(&mut source, &mut buf).unwrap(), 8);
        assert_eq!(&buf[..], b"abcdefgh");

        assert_eq!(read_full(&mut source, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..], b"ij");

        buf.resize(8, 0);
        assert_eq!(read_full(&mut source, &mut buf).unwrap(), 0);
        assert!(buf.is_empty());
    }
}
