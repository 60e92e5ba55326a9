//! Configuration for parallel reading.
//!
//! - [`ReaderConfig`] - Concurrency, target chunk size and record boundaries
//!
//! # Example
//!
//! ```
//! use ripchunk::ReaderConfig;
//!
//! // Newline-delimited records in 1 MiB chunks on four workers
//! let config = ReaderConfig::default()
//!     .with_concurrency(4)
//!     .with_chunk_size(1 << 20);
//! config.validate()?;
//!
//! // Bracketed records, anything outside <row>...</row> is dropped
//! let config = ReaderConfig::default()
//!     .with_boundary_start("<row>")
//!     .with_boundary("</row>");
//! assert!(config.is_bracketed());
//!
//! # Ok::<(), ripchunk::ReadError>(())
//! ```

use bytes::Bytes;

use crate::error::ReadError;

/// Default target chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default record boundary.
pub const DEFAULT_BOUNDARY: &[u8] = b"\n";

/// Scan window cap, as a multiple of `chunk_size`, when `max_window` is not
/// set.
pub const DEFAULT_WINDOW_FACTOR: usize = 16;

/// Configuration for a [`ParallelReader`](crate::ParallelReader).
///
/// # Sizes
///
/// `chunk_size` is the target size of a chunk in boundary mode. The scanner
/// reads at least that many bytes before it cuts, then cuts at the last
/// boundary it has seen. Chunks are usually a little smaller than the target.
///
/// `max_window` caps how far the scanner may read looking for a boundary.
/// A record longer than the target still comes out whole, as a chunk larger
/// than `chunk_size`. Only a record that does not fit `max_window` fails the
/// read. It defaults to [`DEFAULT_WINDOW_FACTOR`] times `chunk_size`.
///
/// In fixed mode every chunk is exactly `chunk_size` bytes except the last.
///
/// # Boundaries
///
/// - End-only (default): a record ends with `boundary`.
/// - Bracketed: set `boundary_start`; a record is a complete
///   `boundary_start ... boundary` span and bytes outside spans are dropped.
///
/// # Example
///
/// ```
/// use ripchunk::ReaderConfig;
///
/// let config = ReaderConfig::default()
///     .with_chunk_size(16)
///     .with_boundary("END")
///     .with_require_boundary(true);
///
/// assert_eq!(config.chunk_size(), 16);
/// assert_eq!(config.max_window(), 256);
/// assert_eq!(config.boundary(), b"END");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReaderConfig {
    concurrency: usize,
    chunk_size: usize,
    max_window: Option<usize>,
    boundary: Bytes,
    boundary_start: Bytes,
    require_boundary: bool,
}

impl ReaderConfig {
    /// Creates a validated configuration with a custom concurrency and chunk
    /// size, keeping the default newline boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::InvalidConfig`] if either value is zero.
    pub fn new(concurrency: usize, chunk_size: usize) -> Result<Self, ReadError> {
        let config = Self::default()
            .with_concurrency(concurrency)
            .with_chunk_size(chunk_size);
        config.validate()?;
        Ok(config)
    }

    /// Sets the number of worker threads.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the target chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the largest window the scanner may buffer while looking for a
    /// boundary.
    pub fn with_max_window(mut self, size: usize) -> Self {
        self.max_window = Some(size);
        self
    }

    /// Sets the sequence that ends a record.
    pub fn with_boundary(mut self, boundary: impl Into<Bytes>) -> Self {
        self.boundary = boundary.into();
        self
    }

    /// Sets the sequence that starts a record. Empty disables bracketing.
    pub fn with_boundary_start(mut self, start: impl Into<Bytes>) -> Self {
        self.boundary_start = start.into();
        self
    }

    /// Whether a trailing fragment without a boundary is discarded.
    pub fn with_require_boundary(mut self, require: bool) -> Self {
        self.require_boundary = require;
        self
    }

    /// Returns the number of worker threads.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the target chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the scan window cap.
    pub fn max_window(&self) -> usize {
        self.max_window
            .unwrap_or_else(|| self.chunk_size.saturating_mul(DEFAULT_WINDOW_FACTOR))
    }

    /// Returns the end-of-record sequence.
    pub fn boundary(&self) -> &[u8] {
        &self.boundary
    }

    /// Returns the start-of-record sequence, empty when not bracketed.
    pub fn boundary_start(&self) -> &[u8] {
        &self.boundary_start
    }

    /// Returns true when records are bracketed by a start sequence.
    pub fn is_bracketed(&self) -> bool {
        !self.boundary_start.is_empty()
    }

    /// Returns whether trailing unterminated data is discarded.
    pub fn require_boundary(&self) -> bool {
        self.require_boundary
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use ripchunk::ReaderConfig;
    ///
    /// let config = ReaderConfig::default().with_boundary("");
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ReadError> {
        if self.concurrency == 0 {
            return Err(ReadError::InvalidConfig {
                message: "concurrency must be non-zero",
            });
        }

        if self.chunk_size == 0 {
            return Err(ReadError::InvalidConfig {
                message: "chunk_size must be non-zero",
            });
        }

        if self.boundary.is_empty() {
            return Err(ReadError::InvalidConfig {
                message: "boundary must not be empty",
            });
        }

        if self.max_window() < self.chunk_size {
            return Err(ReadError::InvalidConfig {
                message: "max_window cannot be smaller than chunk_size",
            });
        }

        if self.max_window() < self.boundary_start.len() + self.boundary.len() {
            return Err(ReadError::InvalidConfig {
                message: "max_window cannot hold the boundary sequences",
            });
        }

        Ok(())
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_window: None,
            boundary: Bytes::from_static(DEFAULT_BOUNDARY),
            boundary_start: Bytes::new(),
            require_boundary: false,
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReaderConfig::default();
        assert!(config.concurrency() >= 1);
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(config.max_window(), DEFAULT_CHUNK_SIZE * DEFAULT_WINDOW_FACTOR);
        assert_eq!(config.boundary(), b"\n");
        assert!(!config.is_bracketed());
        assert!(!config.require_boundary());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReaderConfig::default()
            .with_concurrency(3)
            .with_chunk_size(128)
            .with_max_window(1024)
            .with_boundary_start("<a>")
            .with_boundary("</a>")
            .with_require_boundary(true);

        assert_eq!(config.concurrency(), 3);
        assert_eq!(config.chunk_size(), 128);
        assert_eq!(config.max_window(), 1024);
        assert_eq!(config.boundary_start(), b"<a>");
        assert_eq!(config.boundary(), b"</a>");
        assert!(config.is_bracketed());
        assert!(config.require_boundary());
    }

    #[test]
    fn test_max_window_follows_chunk_size() {
        let config = ReaderConfig::default().with_chunk_size(10);
        assert_eq!(config.max_window(), 160);

        let config = config.with_max_window(10);
        assert_eq!(config.max_window(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_zero_values() {
        assert!(ReaderConfig::new(0, 16).is_err());
        assert!(ReaderConfig::new(2, 0).is_err());
        assert!(ReaderConfig::new(2, 16).is_ok());
    }

    #[test]
    fn test_invalid_config_empty_boundary() {
        let config = ReaderConfig::default().with_boundary(Bytes::new());
        assert!(matches!(
            config.validate(),
            Err(ReadError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_config_window_below_chunk_size() {
        let config = ReaderConfig::default()
            .with_chunk_size(64)
            .with_max_window(32);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_config_window_below_boundary() {
        let config = ReaderConfig::default()
            .with_chunk_size(2)
            .with_max_window(2)
            .with_boundary("END");
        assert!(matches!(
            config.validate(),
            Err(ReadError::InvalidConfig { .. })
        ));

        // Bracketed records need room for both sequences.
        let config = ReaderConfig::default()
            .with_chunk_size(4)
            .with_max_window(6)
            .with_boundary_start("<r>")
            .with_boundary("</r>");
        assert!(config.validate().is_err());
        assert!(config.with_max_window(7).validate().is_ok());
    }
}
