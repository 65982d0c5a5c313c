//! Isometric coordinate transform.
//!
//! The single source of truth for the tile-space <-> screen-space projection.
//! Generation, simulation, and rendering all go through this type; nothing
//! else re-derives the projection, so the three stay in agreement.

use glam::DVec2;
use rime_common::WorldCoord;

/// The fixed isometric projection between tile space and screen pixels.
///
/// Pure and stateless; parameterized by the on-screen tile footprint and the
/// projection angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    /// Tile width in screen pixels
    pub tile_width: f64,
    /// Tile height in screen pixels
    pub tile_height: f64,
    /// Isometric rotation angle in radians
    pub angle: f64,
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self {
            tile_width: 64.0,
            tile_height: 32.0,
            angle: std::f64::consts::FRAC_PI_6,
        }
    }
}

impl IsoProjection {
    /// Creates a projection with explicit tile footprint and angle.
    #[must_use]
    pub const fn new(tile_width: f64, tile_height: f64, angle: f64) -> Self {
        Self {
            tile_width,
            tile_height,
            angle,
        }
    }

    /// Projects tile-space coordinates to screen pixel coordinates.
    #[must_use]
    pub fn iso_to_screen(&self, iso: DVec2) -> DVec2 {
        DVec2 {
            x: (iso.x - iso.y) * self.angle.cos() * self.tile_width * 0.5,
            y: (iso.x + iso.y) * self.angle.sin() * self.tile_height * 0.5,
        }
    }

    /// Exact algebraic inverse of [`Self::iso_to_screen`].
    #[must_use]
    pub fn screen_to_iso(&self, screen: DVec2) -> DVec2 {
        let a = screen.x / (self.angle.cos() * self.tile_width * 0.5);
        let b = screen.y / (self.angle.sin() * self.tile_height * 0.5);
        DVec2 {
            x: (a + b) * 0.5,
            y: (b - a) * 0.5,
        }
    }

    /// Returns the integer tile index under a screen position.
    #[must_use]
    pub fn tile_index_of(&self, screen: DVec2) -> WorldCoord {
        let iso = self.screen_to_iso(screen);
        WorldCoord::new(iso.x.floor() as i64, iso.y.floor() as i64)
    }
}
