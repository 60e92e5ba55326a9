//! Chunk types.
//!
//! - [`Chunk`] - Pooled buffer with the readable bytes of one chunk

mod data;

pub(crate) use data::Chunk;
