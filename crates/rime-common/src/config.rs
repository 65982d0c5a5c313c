//! World configuration.
//!
//! An explicit value passed into the chunk system and generator constructors;
//! there is no process-wide configuration singleton.

use serde::{Deserialize, Serialize};

/// Per-chunk room generation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomParams {
    /// Desired room count per chunk. A ceiling, not a guarantee: rooms that
    /// cannot be placed within the attempt budget are skipped.
    pub room_count: u32,
    /// Minimum room dimension in tiles
    pub min_room_size: u32,
    /// Maximum room dimension in tiles
    pub max_room_size: u32,
    /// Run the decoration pass after carving
    pub decorate: bool,
    /// Probability that a wall-adjacent floor cell becomes a column
    pub column_chance: f32,
}

impl Default for RoomParams {
    fn default() -> Self {
        Self {
            room_count: 4,
            min_room_size: 4,
            max_room_size: 8,
            decorate: true,
            column_chance: 0.02,
        }
    }
}

/// World engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. A chunk's content is a pure function of this seed and the
    /// chunk coordinate.
    pub world_seed: u64,
    /// Chunk size in tiles (chunks are square). Must fit a local offset,
    /// i.e. at most `u16::MAX`; the chunk system asserts this in debug.
    pub chunk_size: u32,
    /// Chebyshev radius within which chunks are activated
    pub load_radius: u32,
    /// Chebyshev radius beyond which active chunks are deactivated.
    /// Callers must keep `load_radius <= unload_radius`; this is not
    /// enforced, and violating it makes chunks thrash between active and
    /// inactive on small movements.
    pub unload_radius: u32,
    /// Room generation parameters
    pub rooms: RoomParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_seed: 0x52_49_4d_45,
            chunk_size: 64,
            load_radius: 2,
            unload_radius: 3,
            rooms: RoomParams::default(),
        }
    }
}
