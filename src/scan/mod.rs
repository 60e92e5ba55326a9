//! Record boundary detection.
//!
//! - [`Scanner`] - Decides chunk cuts over a window of input
//! - [`Step`] - The scanner's decision
//!
//! The producer keeps a `ScanWindow` of unconsumed input and asks
//! the scanner what to do with it after every read.

mod boundary;
pub(crate) mod window;

pub use boundary::{Scanner, Step};
pub(crate) use window::ScanWindow;
