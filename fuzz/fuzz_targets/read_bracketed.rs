#![no_main]

use libfuzzer_sys::fuzz_target;
use ripchunk::{ParallelReader, ReadError, ReaderConfig};
use std::sync::Mutex;

fuzz_target!(|data: &[u8]| {
    let config = ReaderConfig::default()
        .with_concurrency(2)
        .with_chunk_size(8)
        .with_max_window(128)
        .with_boundary_start(&b"<"[..])
        .with_boundary(&b">"[..]);
    let chunks = Mutex::new(Vec::new());

    let result = ParallelReader::new(config).read(data, |chunk| {
        chunks.lock().unwrap().push(chunk.to_vec());
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(ReadError::ScanOverflow { .. }) => return,
        Err(err) => panic!("unexpected error: {err}"),
    };

    assert_eq!(summary.bytes + summary.discarded_bytes, data.len() as u64);
    for chunk in chunks.into_inner().unwrap() {
        assert!(chunk.starts_with(b"<"));
        assert!(chunk.ends_with(b">"));
    }
});
