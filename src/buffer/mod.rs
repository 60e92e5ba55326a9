//! Buffer management for chunk hand-off.
//!
//! Chunk buffers move from the producer to a worker and back into the pool,
//! so a read allocates at most `2 * concurrency + 1` buffers no matter how long
//! the stream is.

mod pool;

pub(crate) use pool::BufferPool;
