//! # Rime Common
//!
//! Common types, utilities, and shared abstractions for Rimeworld.
//!
//! This crate provides foundational types used across all Rimeworld
//! subsystems:
//! - Coordinate types (world, chunk, local)
//! - The tile code enumeration (per-cell terrain contract)
//! - Entity ID type
//! - World configuration
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod coords;
pub mod error;
pub mod ids;
pub mod tile;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::tile::*;
}

pub use prelude::*;
