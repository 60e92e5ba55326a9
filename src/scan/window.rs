//! Bounded, growable input window feeding the scanner.

use std::io::{ErrorKind, Read};

use crate::error::ReadError;

/// The producer's view of unconsumed input.
///
/// Starts with room for one target chunk and doubles, up to `max_window`,
/// only when unconsumed bytes fill it. Consumed bytes are reclaimed by
/// shifting the remainder to the front before the next read.
#[derive(Debug)]
pub(crate) struct ScanWindow {
    buf: Vec<u8>,
    initial: usize,
    limit: usize,
    start: usize,
    end: usize,
    consumed: u64,
    eof: bool,
}

impl ScanWindow {
    pub(crate) fn new(initial: usize, max_window: usize) -> Self {
        let initial = initial.clamp(1, max_window.max(1));
        Self {
            buf: vec![0u8; initial],
            initial,
            limit: max_window,
            start: 0,
            end: 0,
            consumed: 0,
            eof: false,
        }
    }

    /// Unconsumed bytes.
    pub(crate) fn data(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    /// Stream offset of `data()[0]`.
    pub(crate) fn offset(&self) -> u64 {
        self.consumed
    }

    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.end - self.start);
        self.start += n;
        self.consumed += n as u64;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }

    /// Performs one read from `source` into the free tail of the window.
    ///
    /// Reads stop at the initial size while fewer bytes than that are
    /// buffered, so a grown window does not pull in more than one target
    /// chunk at a time.
    ///
    /// # Errors
    ///
    /// [`ReadError::ScanOverflow`] if `max_window` unconsumed bytes are
    /// already buffered, [`ReadError::Io`] for read failures other than
    /// `Interrupted`.
    pub(crate) fn fill<R: Read>(&mut self, source: &mut R) -> Result<(), ReadError> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        if self.end == self.buf.len() {
            if self.buf.len() >= self.limit {
                return Err(ReadError::ScanOverflow { window: self.limit });
            }
            let grown = self.buf.len().saturating_mul(2).min(self.limit);
            self.buf.resize(grown, 0);
        }
        let target = if self.end < self.initial {
            self.initial
        } else {
            self.buf.len()
        };

        loop {
            match source.read(&mut self.buf[self.end..target]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.end += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
    }
}
