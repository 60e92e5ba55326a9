//! Fixed-size pool of scoped worker threads.

use std::thread::{self, Scope, ScopedJoinHandle};

use crossbeam_channel::Receiver;
use tracing::{trace, warn};

use super::{AbortOnPanic, Shared, WorkerStats};
use crate::chunk::Chunk;
use crate::error::ReadError;

type WorkerResult = Result<WorkerStats, ReadError>;

/// Workers draining the chunk queue for the duration of one read.
pub(crate) struct WorkerPool<'scope> {
    handles: Vec<ScopedJoinHandle<'scope, WorkerResult>>,
}

impl<'scope> WorkerPool<'scope> {
    /// Spawns `count` workers on `scope`, each pulling from `queue`.
    ///
    /// A worker whose work function fails raises the abort flag and exits.
    /// Workers that see the flag keep draining the queue without running the
    /// work function, so the producer never blocks on a dead pool.
    pub(crate) fn spawn<'env, F, E>(
        scope: &'scope Scope<'scope, 'env>,
        count: usize,
        queue: Receiver<Chunk>,
        shared: &'scope Shared,
        work: &'scope F,
    ) -> Result<Self, ReadError>
    where
        F: Fn(&[u8]) -> Result<(), E> + Sync,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        let mut handles = Vec::with_capacity(count);
        for worker in 0..count {
            let queue = queue.clone();
            let handle = thread::Builder::new()
                .name(format!("ripchunk-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    let _guard = AbortOnPanic(shared);
                    let mut stats = WorkerStats::default();

                    for chunk in queue.iter() {
                        if shared.is_aborted() {
                            shared.pool().give_back(chunk.into_buffer());
                            continue;
                        }

                        let result = work(chunk.readable());
                        stats.chunks += 1;
                        stats.bytes += chunk.len() as u64;
                        let seq = chunk.seq();
                        shared.pool().give_back(chunk.into_buffer());

                        if let Err(err) = result {
                            let err = ReadError::callback(err);
                            warn!(worker, seq, error = %err, "work function failed, aborting read");
                            shared.abort();
                            return Err(err);
                        }
                    }

                    trace!(worker, chunks = stats.chunks, "worker finished");
                    Ok(stats)
                })?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    /// Waits for every worker and merges their counters.
    ///
    /// All workers are joined, even after one has failed. The first failure
    /// in worker order is returned.
    pub(crate) fn join(self) -> WorkerResult {
        let mut total = WorkerStats::default();
        let mut failure = None;

        for (worker, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(stats)) => total.merge(stats),
                Ok(Err(err)) => {
                    failure.get_or_insert(err);
                }
                Err(_) => {
                    warn!(worker, "worker panicked");
                    failure.get_or_insert(ReadError::WorkerPanicked { worker });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(total),
        }
    }
}
