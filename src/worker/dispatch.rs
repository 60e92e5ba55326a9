//! Producer side of the chunk queue.

use bytes::BytesMut;
use crossbeam_channel::Sender;
use tracing::trace;

use super::Shared;
use crate::chunk::Chunk;

/// Single-producer handle onto the bounded chunk queue.
///
/// Dropping the dispatcher closes the queue; workers exit once it is drained.
pub(crate) struct Dispatcher<'a> {
    queue: Sender<Chunk>,
    shared: &'a Shared,
    seq: u64,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(queue: Sender<Chunk>, shared: &'a Shared) -> Self {
        Self {
            queue,
            shared,
            seq: 0,
        }
    }

    /// Borrows an empty buffer to fill with the next chunk.
    pub(crate) fn borrow_buffer(&self) -> BytesMut {
        self.shared.pool().borrow()
    }

    /// Borrows a buffer of exactly `len` bytes to read into.
    pub(crate) fn borrow_sized(&self, len: usize) -> BytesMut {
        self.shared.pool().borrow_sized(len)
    }

    /// Hands back a buffer that ended up not being dispatched.
    pub(crate) fn recycle(&self, buffer: BytesMut) {
        self.shared.pool().give_back(buffer);
    }

    /// Queues a filled buffer, blocking while every slot is taken.
    ///
    /// Returns `false` when the read is being aborted or no worker is left to
    /// receive; the producer should stop.
    pub(crate) fn dispatch(&mut self, buffer: BytesMut, offset: u64) -> bool {
        if self.shared.is_aborted() {
            self.recycle(buffer);
            return false;
        }

        let chunk = Chunk::new(buffer, self.seq, offset);
        trace!(seq = chunk.seq(), offset, len = chunk.len(), "dispatching chunk");
        self.seq += 1;
        self.queue.send(chunk).is_ok()
    }

    /// Number of chunks queued so far.
    pub(crate) fn dispatched(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferPool;

    #[test]
    fn test_dispatch_assigns_sequence_numbers() {
        let shared = Shared::new(BufferPool::new(2, 8));
        let (tx, rx) = crossbeam_channel::bounded(4);
        let mut dispatcher = Dispatcher::new(tx, &shared);

        for (i, data) in [&b"ab"[..], b"cde"].iter().enumerate() {
            let mut buf = dispatcher.borrow_buffer();
            buf.extend_from_slice(data);
            assert!(dispatcher.dispatch(buf, i as u64 * 10));
        }
        assert_eq!(dispatcher.dispatched(), 2);
        drop(dispatcher);

        let chunks: Vec<_> = rx.iter().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!((chunks[0].seq(), chunks[0].offset()), (0, 0));
        assert_eq!((chunks[1].seq(), chunks[1].offset()), (1, 10));
        assert_eq!(&chunks[1][..], b"cde");
    }

    #[test]
    fn test_dispatch_stops_after_abort() {
        let shared = Shared::new(BufferPool::new(2, 8));
        let (tx, rx) = crossbeam_channel::bounded(4);
        let mut dispatcher = Dispatcher::new(tx, &shared);

        shared.abort();
        let buf = dispatcher.borrow_buffer();
        assert!(!dispatcher.dispatch(buf, 0));
        assert!(rx.try_recv().is_err());
        assert_eq!(shared.pool().idle(), 1, "rejected buffer goes back to the pool");
    }

    #[test]
    fn test_dispatch_fails_without_receivers() {
        let shared = Shared::new(BufferPool::new(2, 8));
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let mut dispatcher = Dispatcher::new(tx, &shared);
        let buf = dispatcher.borrow_buffer();
        assert!(!dispatcher.dispatch(buf, 0));
    }
}
