//! The Chunk type - one record-aligned slice of the stream.

use bytes::BytesMut;
use std::fmt;
use std::ops::Deref;

/// A chunk of input held in a pooled buffer.
///
/// A chunk is created by the producer, moved through the dispatch queue to
/// exactly one worker, and its buffer is then returned to the pool. The
/// readable bytes are the whole buffer; they are never modified after the
/// producer hands the chunk off.
pub(crate) struct Chunk {
    buffer: BytesMut,
    seq: u64,
    offset: u64,
}

impl Chunk {
    /// `seq` is the position in dispatch order, `offset` the stream offset of
    /// the first byte.
    pub(crate) fn new(buffer: BytesMut, seq: u64, offset: u64) -> Self {
        Self {
            buffer,
            seq,
            offset,
        }
    }

    pub(crate) fn readable(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    #[cfg(test)]
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Consumes the chunk and returns its buffer for reuse.
    pub(crate) fn into_buffer(self) -> BytesMut {
        self.buffer
    }
}

impl Deref for Chunk {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buffer
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("seq", &self.seq)
            .field("offset", &self.offset)
            .field("len", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let chunk = Chunk::new(BytesMut::from(&b"hello"[..]), 1, 10);
        assert_eq!(chunk.len(), 5);
        assert_eq!(chunk.readable(), b"hello");
        assert_eq!(chunk.seq(), 1);
        assert_eq!(chunk.offset(), 10);
    }

    #[test]
    fn test_into_buffer_keeps_allocation() {
        let mut buf = BytesMut::with_capacity(64);
        buf.extend_from_slice(b"data");
        let ptr = buf.as_ptr();
        let chunk = Chunk::new(buf, 0, 0);
        let buf = chunk.into_buffer();
        assert_eq!(buf.as_ptr(), ptr);
        assert!(buf.capacity() >= 64);
    }

    #[test]
    fn test_debug_omits_contents() {
        let chunk = Chunk::new(BytesMut::from(&b"secret"[..]), 2, 100);
        let s = format!("{chunk:?}");
        assert!(s.contains("seq: 2"));
        assert!(s.contains("len: 6"));
        assert!(!s.contains("secret"));
    }
}
