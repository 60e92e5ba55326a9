//! Chunk dispatch and the worker pool.
//!
//! One producer pushes chunks through a [`Dispatcher`] into a bounded queue
//! with one slot per worker. A [`WorkerPool`] of scoped threads drains the
//! queue, runs the caller's work function and hands buffers back to the
//! [`BufferPool`]. Closing the queue is the only completion signal.

mod dispatch;
mod pool;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::buffer::BufferPool;

pub(crate) use dispatch::Dispatcher;
pub(crate) use pool::WorkerPool;

/// State shared by the producer and every worker of one read.
#[derive(Debug)]
pub(crate) struct Shared {
    pool: BufferPool,
    abort: AtomicBool,
}

impl Shared {
    pub(crate) fn new(pool: BufferPool) -> Self {
        Self {
            pool,
            abort: AtomicBool::new(false),
        }
    }

    pub(crate) fn pool(&self) -> &BufferPool {
        &self.pool
    }

    pub(crate) fn abort(&self) {
        self.abort.store(true, Ordering::Release);
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Acquire)
    }
}

/// Per-worker counters, merged after join.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerStats {
    pub(crate) chunks: u64,
    pub(crate) bytes: u64,
}

impl WorkerStats {
    pub(crate) fn merge(&mut self, other: WorkerStats) {
        self.chunks += other.chunks;
        self.bytes += other.bytes;
    }
}

/// Raises the abort flag if the owning worker unwinds.
pub(crate) struct AbortOnPanic<'a>(pub(crate) &'a Shared);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abort();
        }
    }
}
