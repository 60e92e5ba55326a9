//! Error types for ripchunk.

use thiserror::Error;

/// Errors that can occur while reading and dispatching chunks.
///
/// Every variant is terminal for the read that produced it. By the time a
/// `ReadError` reaches the caller all worker threads have been joined.
#[derive(Debug, Error)]
pub enum ReadError {
    /// An I/O error occurred while reading the source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No boundary was found even though the scan window is full.
    ///
    /// The boundary probably does not occur in the input, or records are
    /// longer than the configured `max_window`.
    #[error("no boundary found within a full scan window of {window} bytes")]
    ScanOverflow {
        /// Size of the scan window that filled up.
        window: usize,
    },

    /// The caller's work function returned an error.
    #[error("callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A worker thread panicked while running the caller's work function.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        worker: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl ReadError {
    /// Wraps a callback failure.
    pub(crate) fn callback<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        ReadError::Callback(err.into())
    }
}
