//! Boundary scanner deciding where chunks are cut.
//!
//! The scanner looks at the unconsumed window of input and answers one
//! question: how many bytes form the next chunk, and how many bytes are
//! consumed? It never reads from the source itself.
//!
//! # Algorithm
//!
//! The scanner is greedy. Until input is exhausted it waits for at least
//! `chunk_size` bytes, then cuts at the **last** boundary in the window, which
//! is the largest record-aligned chunk the window holds. When no boundary is
//! present it asks for more data instead of cutting mid-record.
//!
//! With a start sequence configured, the window is walked front to back
//! collecting complete `start ... end` spans. All spans found are delivered
//! as one chunk; bytes outside spans are consumed without being delivered.
//!
//! At end of input:
//! - end-only: a trailing fragment without boundary is emitted unless
//!   `require_boundary` is set, in which case it is dropped;
//! - bracketed: an incomplete trailing span is always dropped.

use std::ops::Range;

use memchr::memmem::{Finder, FinderRev};

use crate::config::ReaderConfig;

/// The scanner's decision for the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    /// Read more input before deciding. Nothing is consumed.
    NeedMore,

    /// Consume `advance` bytes from the front of the window.
    ///
    /// The concatenation of `spans` (ranges into the window) is the chunk to
    /// deliver. No spans means the consumed bytes are discarded.
    Advance {
        /// Number of bytes to consume.
        advance: usize,
        /// Window ranges forming the chunk.
        spans: &'a [Range<usize>],
    },

    /// The window is empty and the input is exhausted.
    Finished,
}

/// Record boundary scanner.
///
/// # Example
///
/// ```
/// use ripchunk::{ReaderConfig, Scanner, Step};
///
/// let config = ReaderConfig::default().with_chunk_size(6);
/// let mut scanner = Scanner::new(&config);
///
/// // Fewer than chunk_size bytes and more input to come
/// assert_eq!(scanner.scan(b"abc\n", false), Step::NeedMore);
///
/// // Cut after the last newline in the window
/// assert_eq!(
///     scanner.scan(b"abc\nde", false),
///     Step::Advance { advance: 4, spans: &[0..4] }
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    chunk_size: usize,
    require_boundary: bool,
    end: Finder<'static>,
    end_rev: FinderRev<'static>,
    start: Option<Finder<'static>>,
    spans: Vec<Range<usize>>,
}

impl Scanner {
    /// Creates a scanner for the given configuration.
    pub fn new(config: &ReaderConfig) -> Self {
        let start = config
            .is_bracketed()
            .then(|| Finder::new(config.boundary_start()).into_owned());

        Self {
            chunk_size: config.chunk_size(),
            require_boundary: config.require_boundary(),
            end: Finder::new(config.boundary()).into_owned(),
            end_rev: FinderRev::new(config.boundary()).into_owned(),
            start,
            spans: Vec::with_capacity(4),
        }
    }

    /// Decides what to do with `window`.
    ///
    /// `at_eof` tells the scanner no more input will follow the window.
    pub fn scan(&mut self, window: &[u8], at_eof: bool) -> Step<'_> {
        if at_eof && window.is_empty() {
            return Step::Finished;
        }

        // Greedy: always try to reach the target before cutting.
        if !at_eof && window.len() < self.chunk_size {
            return Step::NeedMore;
        }

        self.spans.clear();
        if self.start.is_some() {
            self.scan_bracketed(window, at_eof)
        } else {
            self.scan_terminated(window, at_eof)
        }
    }

    fn scan_terminated(&mut self, window: &[u8], at_eof: bool) -> Step<'_> {
        if let Some(idx) = self.end_rev.rfind(window) {
            let cut = idx + self.end_rev.needle().len();
            self.spans.push(0..cut);
            return Step::Advance {
                advance: cut,
                spans: &self.spans,
            };
        }

        if !at_eof {
            return Step::NeedMore;
        }

        if !self.require_boundary {
            self.spans.push(0..window.len());
        }
        Step::Advance {
            advance: window.len(),
            spans: &self.spans,
        }
    }

    fn scan_bracketed(&mut self, window: &[u8], at_eof: bool) -> Step<'_> {
        let Self {
            start, end, spans, ..
        } = self;
        let Some(start) = start.as_ref() else {
            return Step::NeedMore;
        };
        let start_len = start.needle().len();
        let end_len = end.needle().len();

        let mut pos = 0;
        let mut first_start = None;
        while let Some(s) = start.find(&window[pos..]).map(|i| pos + i) {
            first_start.get_or_insert(s);
            let body = s + start_len;
            let Some(e) = end.find(&window[body..]).map(|i| body + i) else {
                break;
            };
            pos = e + end_len;
            spans.push(s..pos);
        }

        if !spans.is_empty() {
            return Step::Advance {
                advance: pos,
                spans,
            };
        }

        if at_eof {
            return Step::Advance {
                advance: window.len(),
                spans,
            };
        }

        match first_start {
            // An open span at the front only grows with more input.
            Some(0) => Step::NeedMore,
            Some(s) => Step::Advance { advance: s, spans },
            None => {
                // Keep a tail that may be the beginning of a split start sequence.
                let drop = window.len().saturating_sub(start_len - 1);
                if drop == 0 {
                    Step::NeedMore
                } else {
                    Step::Advance {
                        advance: drop,
                        spans,
                    }
                }
            }
        }
    }
}
