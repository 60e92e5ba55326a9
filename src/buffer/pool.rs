//! Bounded, lock-free pool of chunk buffers.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use crossbeam_queue::ArrayQueue;

/// A pool of reusable byte buffers shared by the producer and the workers.
///
/// The pool is a cache: [`borrow`](Self::borrow) allocates when it is empty
/// and [`give_back`](Self::give_back) drops the buffer when it is full.
/// Neither call ever blocks.
///
/// Returned buffers keep their length. Whoever borrows decides what the
/// length should be, so a fixed-size reader can refill a buffer without
/// zeroing it again.
#[derive(Debug)]
pub(crate) struct BufferPool {
    free: ArrayQueue<BytesMut>,
    buffer_size: usize,
    retain_limit: usize,
    allocated: AtomicU64,
}

impl BufferPool {
    /// Creates a pool holding at most `max` idle buffers of `buffer_size`
    /// bytes each. Buffers that grew past twice that size are not kept.
    ///
    /// `max` is clamped to at least one.
    pub(crate) fn new(max: usize, buffer_size: usize) -> Self {
        Self {
            free: ArrayQueue::new(max.max(1)),
            buffer_size,
            retain_limit: buffer_size.saturating_mul(2),
            allocated: AtomicU64::new(0),
        }
    }

    /// Takes an empty buffer from the pool or allocates a new one.
    pub(crate) fn borrow(&self) -> BytesMut {
        let mut buf = self.take();
        buf.clear();
        buf
    }

    /// Takes a buffer of exactly `len` bytes.
    ///
    /// The contents are whatever the buffer held last; bytes past the old
    /// length are zeroed.
    pub(crate) fn borrow_sized(&self, len: usize) -> BytesMut {
        let mut buf = self.take();
        if buf.len() < len {
            buf.resize(len, 0);
        } else {
            buf.truncate(len);
        }
        buf
    }

    fn take(&self) -> BytesMut {
        self.free.pop().unwrap_or_else(|| {
            self.allocated.fetch_add(1, Ordering::Relaxed);
            BytesMut::with_capacity(self.buffer_size)
        })
    }

    /// Offers a buffer back for reuse.
    ///
    /// Buffers that grew past the retain limit, and any buffer arriving while
    /// the pool is full, are dropped.
    pub(crate) fn give_back(&self, buf: BytesMut) {
        if buf.capacity() > self.retain_limit {
            return;
        }
        // Full pool: let the buffer go.
        let _ = self.free.push(buf);
    }

    /// Number of buffers allocated since the pool was created.
    pub(crate) fn allocated(&self) -> u64 {
        self.allocated.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_borrow_allocates_when_empty() {
        let pool = BufferPool::new(2, 64);
        let buf = pool.borrow();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 64);
        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_buffer_reuse() {
        let pool = BufferPool::new(2, 64);
        let mut buf = pool.borrow();
        buf.extend_from_slice(b"test data");
        let ptr = buf.as_ptr();
        pool.give_back(buf);
        assert_eq!(pool.idle(), 1);

        let again = pool.borrow();
        assert!(again.is_empty(), "borrow hands out an empty buffer");
        assert_eq!(again.as_ptr(), ptr);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_borrow_sized_keeps_length_across_reuse() {
        let pool = BufferPool::new(2, 8);
        let mut buf = pool.borrow_sized(8);
        assert_eq!(&buf[..], &[0u8; 8]);
        buf.copy_from_slice(b"abcdefgh");
        pool.give_back(buf);

        // Same buffer, same length, old bytes still there.
        let buf = pool.borrow_sized(8);
        assert_eq!(&buf[..], b"abcdefgh");
        pool.give_back(buf);

        let buf = pool.borrow_sized(3);
        assert_eq!(&buf[..], b"abc");
        pool.give_back(buf);

        let buf = pool.borrow_sized(5);
        assert_eq!(&buf[..], b"abc\0\0");
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_full_pool_drops_returns() {
        let pool = BufferPool::new(1, 8);
        let a = pool.borrow();
        let b = pool.borrow();
        pool.give_back(a);
        pool.give_back(b);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_oversized_buffer_not_retained() {
        let pool = BufferPool::new(4, 8);
        let mut buf = pool.borrow();
        buf.extend_from_slice(&[0u8; 64]);
        pool.give_back(buf);
        assert_eq!(pool.idle(), 0);

        let mut buf = pool.borrow();
        buf.extend_from_slice(&[0u8; 16]);
        pool.give_back(buf);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_concurrent_borrow_and_return() {
        let pool = Arc::new(BufferPool::new(4, 32));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let mut buf = pool.borrow();
                        assert!(buf.is_empty());
                        buf.extend_from_slice(&[i as u8; 16]);
                        assert!(buf.iter().all(|&b| b == i as u8));
                        pool.give_back(buf);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.idle() <= 4);
    }
}
