//! Outcome of a completed read.

use std::fmt;

/// Counters describing a finished read.
///
/// # Example
///
/// ```
/// use ripchunk::{ParallelReader, ReaderConfig};
///
/// let reader = ParallelReader::new(ReaderConfig::default().with_require_boundary(true));
/// let summary = reader.read(&b"one\ntwo\nthree"[..], |_| {})?;
///
/// assert_eq!(summary.chunks, 1);
/// assert_eq!(summary.bytes, 8);
/// assert_eq!(summary.discarded_bytes, 5);
/// # Ok::<(), ripchunk::ReadError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReadSummary {
    /// Number of chunks passed to the work function.
    pub chunks: u64,

    /// Total bytes passed to the work function.
    pub bytes: u64,

    /// Bytes consumed from the source that were not part of any record.
    pub discarded_bytes: u64,

    /// Chunk buffers allocated by the read. Buffers are recycled between
    /// chunks, so this stays around `2 * concurrency + 1` however long the
    /// stream is.
    pub buffers: u64,
}

impl ReadSummary {
    /// Returns the mean chunk size, 0 when no chunk was delivered.
    pub fn average_chunk_size(&self) -> u64 {
        self.bytes.checked_div(self.chunks).unwrap_or(0)
    }
}

impl fmt::Display for ReadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chunks, {} bytes", self.chunks, self.bytes)?;
        if self.discarded_bytes > 0 {
            write!(f, " ({} discarded)", self.discarded_bytes)?;
        }
        Ok(())
    }
}
