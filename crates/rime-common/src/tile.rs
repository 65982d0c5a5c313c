//! Tile codes: the per-cell terrain/obstacle enumeration.
//!
//! The numeric mapping is a wire-level contract shared with movement, the
//! minimap, and the batch renderer. Do not reorder or renumber variants.

use serde::{Deserialize, Serialize};

/// One cell's terrain/obstacle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileCode {
    /// Open floor.
    Floor = 0,
    /// Solid wall. Also the fill value for ungenerated area.
    #[default]
    Wall = 1,
    /// Decorative obstacle (column, pillar).
    Column = 2,
    /// Tree.
    Tree = 3,
    /// Rock.
    Rock = 4,
    /// Water.
    Water = 5,
    /// Ice. Walkable.
    Ice = 6,
    /// Passable decoration (rubble, bones, carpet).
    Decoration = 7,
}

impl TileCode {
    /// All tile codes, in numeric order.
    pub const ALL: [Self; 8] = [
        Self::Floor,
        Self::Wall,
        Self::Column,
        Self::Tree,
        Self::Rock,
        Self::Water,
        Self::Ice,
        Self::Decoration,
    ];

    /// Returns whether an entity can stand on this tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Floor | Self::Ice | Self::Decoration)
    }

    /// Returns the numeric code for this tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a tile by numeric code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            2 => Some(Self::Column),
            3 => Some(Self::Tree),
            4 => Some(Self::Rock),
            5 => Some(Self::Water),
            6 => Some(Self::Ice),
            7 => Some(Self::Decoration),
            _ => None,
        }
    }

    /// Get the display name for this tile.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Floor => "Floor",
            Self::Wall => "Wall",
            Self::Column => "Column",
            Self::Tree => "Tree",
            Self::Rock => "Rock",
            Self::Water => "Water",
            Self::Ice => "Ice",
            Self::Decoration => "Decoration",
        }
    }
}
