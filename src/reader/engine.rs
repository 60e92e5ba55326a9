//! Parallel reader - wires scanner, queue and workers together.
//!
//! Every read follows the same shape:
//!
//! 1. a fresh [`BufferPool`] and worker pool are created for the call;
//! 2. the caller's thread reads the source and dispatches chunks;
//! 3. the queue is closed, every worker is joined, and only then does the
//!    call return, with a [`ReadSummary`] or the first error.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use ripchunk::{ParallelReader, ReaderConfig};
//!
//! let lines = AtomicUsize::new(0);
//! let reader = ParallelReader::new(ReaderConfig::default().with_chunk_size(8));
//!
//! reader.read(&b"a\nbb\nccc\ndddd\n"[..], |chunk| {
//!     let n = chunk.iter().filter(|&&b| b == b'\n').count();
//!     lines.fetch_add(n, Ordering::Relaxed);
//! })?;
//!
//! assert_eq!(lines.into_inner(), 4);
//! # Ok::<(), ripchunk::ReadError>(())
//! ```

use std::convert::Infallible;
use std::error::Error;
use std::io::Read;
use std::thread;

use tracing::{debug, trace};

use super::ReadSummary;
use crate::buffer::BufferPool;
use crate::config::ReaderConfig;
use crate::error::ReadError;
use crate::scan::{ScanWindow, Scanner, Step};
use crate::worker::{Dispatcher, Shared, WorkerPool};

/// Reads a stream in chunks and processes them on a pool of workers.
///
/// The work function runs on worker threads, once per chunk, in no
/// particular order. It must therefore be `Sync`; results are usually
/// gathered through atomics, a mutex or a channel.
///
/// # Example
///
/// ```
/// use std::sync::Mutex;
/// use ripchunk::{ParallelReader, ReaderConfig};
///
/// let config = ReaderConfig::default()
///     .with_chunk_size(16)
///     .with_boundary("END");
/// let chunks = Mutex::new(Vec::new());
///
/// ParallelReader::new(config).read(&b"abcdefgENDhijklmnopEND"[..], |chunk| {
///     chunks.lock().unwrap().push(chunk.to_vec());
/// })?;
///
/// let mut chunks = chunks.into_inner().unwrap();
/// chunks.sort();
/// assert_eq!(chunks, [b"abcdefgEND".to_vec(), b"hijklmnopEND".to_vec()]);
/// # Ok::<(), ripchunk::ReadError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParallelReader {
    config: ReaderConfig,
}

impl ParallelReader {
    /// Creates a reader with the given configuration.
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by this reader.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Splits `source` at record boundaries and calls `work` once per chunk.
    ///
    /// Chunks are as close to `chunk_size` as the boundaries allow and never
    /// split a record.
    ///
    /// # Errors
    ///
    /// - [`ReadError::InvalidConfig`] before anything is read
    /// - [`ReadError::Io`] if the source fails
    /// - [`ReadError::ScanOverflow`] if a record does not fit `max_window`
    /// - [`ReadError::WorkerPanicked`] if `work` panics
    pub fn read<R, F>(&self, source: R, work: F) -> Result<ReadSummary, ReadError>
    where
        R: Read,
        F: Fn(&[u8]) + Sync,
    {
        self.try_read(source, infallible(work))
    }

    /// Like [`read`](Self::read), with a work function that can fail.
    ///
    /// The first failure stops dispatching. Chunks already queued are
    /// drained without calling `work`, all workers are joined, and the
    /// error is returned as [`ReadError::Callback`].
    pub fn try_read<R, F, E>(&self, mut source: R, work: F) -> Result<ReadSummary, ReadError>
    where
        R: Read,
        F: Fn(&[u8]) -> Result<(), E> + Sync,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        self.config.validate()?;
        debug!(
            concurrency = self.config.concurrency(),
            chunk_size = self.config.chunk_size(),
            max_window = self.config.max_window(),
            bracketed = self.config.is_bracketed(),
            require_boundary = self.config.require_boundary(),
            "starting boundary read"
        );

        let config = &self.config;
        let summary = self.run(&work, |dispatcher| {
            produce_records(&mut source, config, dispatcher)
        })?;

        debug!(
            chunks = summary.chunks,
            bytes = summary.bytes,
            discarded = summary.discarded_bytes,
            "read finished"
        );
        Ok(summary)
    }

    /// Splits `source` into chunks of exactly `chunk_size` bytes, ignoring
    /// boundaries, and calls `work` once per chunk.
    ///
    /// The last chunk is shorter when the stream length is not a multiple of
    /// `chunk_size`. An empty stream produces no chunk.
    pub fn read_fixed<R, F>(&self, source: R, work: F) -> Result<ReadSummary, ReadError>
    where
        R: Read,
        F: Fn(&[u8]) + Sync,
    {
        self.try_read_fixed(source, infallible(work))
    }

    /// Like [`read_fixed`](Self::read_fixed), with a work function that can
    /// fail.
    pub fn try_read_fixed<R, F, E>(&self, mut source: R, work: F) -> Result<ReadSummary, ReadError>
    where
        R: Read,
        F: Fn(&[u8]) -> Result<(), E> + Sync,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        self.config.validate()?;
        debug!(
            concurrency = self.config.concurrency(),
            chunk_size = self.config.chunk_size(),
            "starting fixed-size read"
        );

        let chunk_size = self.config.chunk_size();
        let summary = self.run(&work, |dispatcher| {
            produce_fixed(&mut source, chunk_size, dispatcher)
        })?;

        debug!(chunks = summary.chunks, bytes = summary.bytes, "read finished");
        Ok(summary)
    }

    /// Runs `produce` on the calling thread against a fresh worker pool.
    ///
    /// `produce` returns the number of discarded bytes. Worker failures take
    /// precedence over producer errors, since a producer stopped by an abort
    /// has nothing more useful to report.
    fn run<F, E, P>(&self, work: &F, produce: P) -> Result<ReadSummary, ReadError>
    where
        F: Fn(&[u8]) -> Result<(), E> + Sync,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
        P: FnOnce(&mut Dispatcher<'_>) -> Result<u64, ReadError>,
    {
        let concurrency = self.config.concurrency();
        // Queue slots, one per worker, plus the producer's buffer.
        let pool = BufferPool::new(
            concurrency.saturating_mul(2).saturating_add(1),
            self.config.chunk_size(),
        );
        let shared = Shared::new(pool);

        thread::scope(|scope| {
            let (queue_tx, queue_rx) = crossbeam_channel::bounded(concurrency);
            let workers = WorkerPool::spawn(scope, concurrency, queue_rx, &shared, work)?;

            let mut dispatcher = Dispatcher::new(queue_tx, &shared);
            let produced = produce(&mut dispatcher);
            trace!(dispatched = dispatcher.dispatched(), "closing chunk queue");
            drop(dispatcher);

            let processed = workers.join()?;
            let discarded_bytes = produced?;

            Ok(ReadSummary {
                chunks: processed.chunks,
                bytes: processed.bytes,
                discarded_bytes,
                buffers: shared.pool().allocated(),
            })
        })
    }
}

fn infallible<F>(work: F) -> impl Fn(&[u8]) -> Result<(), Infallible> + Sync
where
    F: Fn(&[u8]) + Sync,
{
    move |chunk| {
        work(chunk);
        Ok(())
    }
}

/// Boundary mode producer: scan, copy spans into a pooled buffer, dispatch.
fn produce_records<R: Read>(
    source: &mut R,
    config: &ReaderConfig,
    dispatcher: &mut Dispatcher<'_>,
) -> Result<u64, ReadError> {
    let mut scanner = Scanner::new(config);
    let mut window = ScanWindow::new(config.chunk_size(), config.max_window());
    let mut discarded = 0u64;

    loop {
        let offset = window.offset();
        match scanner.scan(window.data(), window.is_eof()) {
            Step::Finished => return Ok(discarded),
            Step::NeedMore => window.fill(source)?,
            Step::Advance { advance, spans } => {
                let data = window.data();
                let kept: usize = spans.iter().map(|span| span.len()).sum();
                if kept < advance {
                    debug!(offset, bytes = advance - kept, "discarding bytes outside records");
                    discarded += (advance - kept) as u64;
                }

                if let Some(first) = spans.first() {
                    let mut buffer = dispatcher.borrow_buffer();
                    for span in spans {
                        buffer.extend_from_slice(&data[span.clone()]);
                    }
                    if !dispatcher.dispatch(buffer, offset + first.start as u64) {
                        return Ok(discarded);
                    }
                }

                window.consume(advance);
            }
        }
    }
}

/// Fixed mode producer: fill whole buffers until the source runs dry.
fn produce_fixed<R: Read>(
    source: &mut R,
    chunk_size: usize,
    dispatcher: &mut Dispatcher<'_>,
) -> Result<u64, ReadError> {
    let mut offset = 0u64;

    loop {
        let mut buffer = dispatcher.borrow_sized(chunk_size);
        let filled = crate::util::read_full(source, &mut buffer)?;
        if filled == 0 {
            dispatcher.recycle(buffer);
            return Ok(0);
        }

        if !dispatcher.dispatch(buffer, offset) {
            return Ok(0);
        }
        offset += filled as u64;

        if filled < chunk_size {
            return Ok(0);
        }
    }
}
