//! Counts lines and words of a file (or stdin) in parallel.
//!
//! ```text
//! cargo run --release --example line_count -- access.log
//! ```

use ripchunk::{ParallelReader, ReadError, ReaderConfig};
use std::fs::File;
use std::io::{self, Read};
use std::sync::atomic::{AtomicU64, Ordering};

fn main() -> Result<(), ReadError> {
    let source: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };

    let lines = AtomicU64::new(0);
    let words = AtomicU64::new(0);

    let reader = ParallelReader::new(ReaderConfig::default().with_chunk_size(256 * 1024));
    let summary = reader.read(source, |chunk| {
        lines.fetch_add(memchr::memchr_iter(b'\n', chunk).count() as u64, Ordering::Relaxed);
        let n = chunk
            .split(|b| b.is_ascii_whitespace())
            .filter(|w| !w.is_empty())
            .count();
        words.fetch_add(n as u64, Ordering::Relaxed);
    })?;

    println!(
        "{} lines, {} words ({summary})",
        lines.into_inner(),
        words.into_inner()
    );
    Ok(())
}
