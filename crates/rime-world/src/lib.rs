//! # Rime World
//!
//! World management for Rimeworld.
//!
//! This crate turns an unbounded 2D tile world into lazily generated,
//! fixed-size square chunks and keeps a bounded working set of them active
//! around a moving viewpoint. It handles:
//! - Isometric coordinate transforms
//! - Room-and-corridor region generation
//! - Chunk storage and lazy, per-coordinate deterministic generation
//! - Streaming (activation window) and tile/passability queries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod generation;
pub mod iso;
pub mod streaming;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chunk::*;
    pub use crate::generation::*;
    pub use crate::iso::*;
    pub use crate::streaming::*;
}

pub use prelude::*;
