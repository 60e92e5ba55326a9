#![no_main]

use libfuzzer_sys::fuzz_target;
use ripchunk::{ParallelReader, ReadError, ReaderConfig};
use std::sync::Mutex;

fuzz_target!(|data: &[u8]| {
    let configs = [
        ReaderConfig::default().with_concurrency(2).with_chunk_size(4).with_max_window(64),
        ReaderConfig::default().with_concurrency(3).with_chunk_size(16).with_boundary(&b"\r\n"[..]),
        ReaderConfig::default().with_concurrency(1).with_chunk_size(8).with_require_boundary(true),
    ];

    for config in configs {
        let boundary = config.boundary().to_vec();
        let require = config.require_boundary();
        let chunks = Mutex::new(Vec::new());

        let result = ParallelReader::new(config).read(data, |chunk| {
            chunks.lock().unwrap().push(chunk.to_vec());
        });

        let summary = match result {
            Ok(summary) => summary,
            // Records longer than the window are rejected, not split.
            Err(ReadError::ScanOverflow { .. }) => continue,
            Err(err) => panic!("unexpected error: {err}"),
        };

        let chunks = chunks.into_inner().unwrap();
        assert_eq!(summary.chunks as usize, chunks.len());
        assert_eq!(summary.bytes + summary.discarded_bytes, data.len() as u64);
        if !require {
            assert_eq!(summary.discarded_bytes, 0);
        }

        // At most one chunk (the stream tail) may lack the boundary.
        let unterminated = chunks.iter().filter(|c| !c.ends_with(&boundary)).count();
        assert!(unterminated <= usize::from(!require));
    }
});
