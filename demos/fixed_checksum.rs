//! Byte-sum checksum of a file, computed per fixed-size block in parallel.
//!
//! ```text
//! cargo run --release --example fixed_checksum -- disk.img
//! ```

use ripchunk::{ParallelReader, ReadError, ReaderConfig};
use std::fs::File;
use std::io::{self, Read};
use std::sync::Mutex;

fn main() -> Result<(), ReadError> {
    let source: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };

    let blocks = Mutex::new(Vec::new());
    let reader = ParallelReader::new(ReaderConfig::default().with_chunk_size(1024 * 1024));
    let summary = reader.read_fixed(source, |chunk| {
        let sum = chunk.iter().fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
        let mut blocks = blocks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        blocks.push(sum);
    })?;

    // Block order is not preserved, so only combine order-independent values.
    let blocks = blocks.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    let total = blocks.iter().fold(0u32, |acc, &s| acc.wrapping_add(s));
    println!("{:08x} over {summary}", total);
    Ok(())
}
