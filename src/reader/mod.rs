//! Parallel reading entry points.
//!
//! - [`ParallelReader`] - `read`/`try_read` (boundary mode) and
//!   `read_fixed`/`try_read_fixed` (fixed-size mode)
//! - [`ReadSummary`] - Counters returned by every read

mod engine;
mod summary;

pub use engine::ParallelReader;
pub use summary::ReadSummary;
