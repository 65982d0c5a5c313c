//! Error types for Rimeworld.

use thiserror::Error;

use crate::coords::ChunkCoord;

/// Errors from world queries.
///
/// The core degrades rather than fails: generation skips unplaceable rooms
/// and clips corridors instead of erroring. The one explicit failure is a
/// tile query whose local offset falls outside its chunk, which indicates an
/// arithmetic inconsistency in the caller rather than a runtime condition.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A tile query resolved to a local offset outside the chunk's bounds.
    #[error("local offset ({local_x}, {local_y}) out of range for chunk ({}, {})", .chunk.x, .chunk.y)]
    TileOutOfRange {
        /// Chunk the query resolved to
        chunk: ChunkCoord,
        /// Computed local X offset
        local_x: i64,
        /// Computed local Y offset
        local_y: i64,
    },
}

/// Result type alias for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
