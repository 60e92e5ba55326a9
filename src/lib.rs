//! ripchunk
//!
//! Parallel, record-aligned stream reading for Rust.
//!
//! `ripchunk` splits a byte stream into chunks that never cut a record in
//! half and runs a caller-supplied function over those chunks on a fixed
//! pool of worker threads. It is designed for CPU-bound per-record work:
//!
//! - parsing newline-delimited logs or CSV
//! - transforming or filtering large dumps
//! - reducing bracketed records (`<row>...</row>`) out of a stream
//!
//! The crate intentionally:
//! - does NOT open files or sockets (anything implementing `Read` will do)
//! - does NOT order callback invocations
//! - does NOT keep state between reads
//!
//! Memory stays bounded: at most `2 * concurrency + 1` chunk buffers are
//! alive at any time, and buffers are pooled and reused. A record longer
//! than `chunk_size` is delivered whole; only one that does not fit
//! `max_window` fails the read.
//!
//! # Boundary mode
//!
//! ```no_run
//! use std::fs::File;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use ripchunk::{ParallelReader, ReaderConfig, ReadError};
//!
//! fn main() -> Result<(), ReadError> {
//!     let file = File::open("access.log")?;
//!     let lines = AtomicU64::new(0);
//!
//!     let reader = ParallelReader::new(ReaderConfig::default());
//!     reader.read(file, |chunk| {
//!         let n = memchr::memchr_iter(b'\n', chunk).count();
//!         lines.fetch_add(n as u64, Ordering::Relaxed);
//!     })?;
//!
//!     println!("{} lines", lines.into_inner());
//!     Ok(())
//! }
//! ```
//!
//! # Fixed-size mode
//!
//! ```
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use ripchunk::{ParallelReader, ReaderConfig};
//!
//! let data = vec![7u8; 10_000];
//! let total = AtomicU64::new(0);
//!
//! let reader = ParallelReader::new(ReaderConfig::default().with_chunk_size(4096));
//! let summary = reader.read_fixed(&data[..], |chunk| {
//!     let sum: u64 = chunk.iter().map(|&b| b as u64).sum();
//!     total.fetch_add(sum, Ordering::Relaxed);
//! })?;
//!
//! assert_eq!(summary.chunks, 3);
//! assert_eq!(total.into_inner(), 70_000);
//! # Ok::<(), ripchunk::ReadError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod chunk;
mod config;
mod error;
mod reader;
mod scan;
mod util;
mod worker;

//
// Public surface
//

pub use config::{DEFAULT_BOUNDARY, DEFAULT_CHUNK_SIZE, DEFAULT_WINDOW_FACTOR, ReaderConfig};
pub use error::ReadError;
pub use reader::{ParallelReader, ReadSummary};
pub use scan::{Scanner, Step};
