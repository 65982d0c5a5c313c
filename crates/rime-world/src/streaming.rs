//! World streaming: the chunk backing store and active-set controller.

use ahash::{AHashMap, AHashSet};
use glam::DVec2;
use rime_common::{ChunkCoord, LocalCoord, TileCode, WorldConfig, WorldCoord, WorldError, WorldResult};
use tracing::{debug, trace};

use crate::chunk::Chunk;
use crate::iso::IsoProjection;

/// Minimum render radius in chunks.
const MIN_RENDER_RADIUS: u32 = 3;

/// Extra chunks past the computed screen footprint, covering the isometric
/// diagonal overhang.
const RENDER_SAFETY_MARGIN: u32 = 2;

/// The spatial index and streaming controller for the tile world.
///
/// Owns every chunk ever touched and tracks which chunk coordinates are
/// currently active. The backing map is append-only: deactivation removes a
/// coordinate from the active set, never from the map, so memory grows with
/// the set of visited chunks until a retention policy is layered on top.
///
/// Single-threaded and synchronous: generation runs inline on the calling
/// thread the first time a chunk is touched, which is a latency spike on that
/// frame. Moving generation to a worker queue is a deliberate follow-up, not
/// part of this core.
pub struct ChunkSystem {
    /// Configuration
    config: WorldConfig,
    /// Isometric projection shared with the renderer
    projection: IsoProjection,
    /// Every chunk ever referenced, keyed by coordinate
    chunks: AHashMap<ChunkCoord, Chunk>,
    /// Coordinates currently inside the streaming window
    active: AHashSet<ChunkCoord>,
}

impl ChunkSystem {
    /// Creates a chunk system with the default projection.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self::with_projection(config, IsoProjection::default())
    }

    /// Creates a chunk system with an explicit projection.
    ///
    /// `chunk_size` must fit a [`LocalCoord`] axis (at most `u16::MAX`);
    /// larger values would truncate local offsets.
    #[must_use]
    pub fn with_projection(config: WorldConfig, projection: IsoProjection) -> Self {
        debug_assert!(
            config.chunk_size <= u32::from(u16::MAX),
            "chunk_size {} exceeds the local coordinate range",
            config.chunk_size
        );
        Self {
            config,
            projection,
            chunks: AHashMap::new(),
            active: AHashSet::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the projection.
    #[must_use]
    pub const fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    /// Number of chunks in the backing map.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of active chunk coordinates.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether a chunk coordinate is currently active.
    #[must_use]
    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Gets or creates the chunk at the given coordinate.
    ///
    /// Idempotent: repeated calls with the same coordinate return the same
    /// chunk. A newly created chunk is ungenerated.
    pub fn get_or_create_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let size = self.config.chunk_size;
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord, size))
    }

    /// Looks up an existing chunk without creating one.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Returns the tile at a world coordinate, generating the owning chunk
    /// on demand.
    ///
    /// The only failure is a local offset outside `[0, chunk_size)`, which
    /// cannot happen when the chunk coordinate is derived by euclidean
    /// division and indicates an arithmetic inconsistency.
    pub fn get_tile(&mut self, world: WorldCoord) -> WorldResult<TileCode> {
        let chunk_size = self.config.chunk_size;
        let coord = world.to_chunk_coord(chunk_size);
        let origin = coord.to_world_coord(chunk_size);
        let local_x = world.x - origin.x;
        let local_y = world.y - origin.y;

        if local_x < 0
            || local_y < 0
            || local_x >= i64::from(chunk_size)
            || local_y >= i64::from(chunk_size)
        {
            debug_assert!(
                false,
                "local offset ({local_x}, {local_y}) out of range for chunk size {chunk_size}"
            );
            return Err(WorldError::TileOutOfRange {
                chunk: coord,
                local_x,
                local_y,
            });
        }

        self.ensure_generated(coord);
        let local = LocalCoord::new(local_x as u16, local_y as u16);
        // The chunk exists and the offset is checked; a miss here is the same
        // arithmetic-inconsistency class as the range check above.
        self.chunks
            .get(&coord)
            .and_then(|chunk| chunk.tile(local))
            .ok_or(WorldError::TileOutOfRange {
                chunk: coord,
                local_x,
                local_y,
            })
    }

    /// Whether an entity can stand on the tile at a world coordinate.
    ///
    /// Fail-closed: any lookup failure is treated as impassable so a
    /// boundary condition never opens an unintended path.
    pub fn is_passable(&mut self, world: WorldCoord) -> bool {
        match self.get_tile(world) {
            Ok(tile) => tile.is_passable(),
            Err(_) => false,
        }
    }

    /// Streams chunks around a world-space center.
    ///
    /// Activates (creating and generating as needed) every chunk within
    /// Chebyshev `load_radius` of the center's chunk, a square window of
    /// `(2r+1)^2` coordinates, then deactivates active chunks beyond
    /// `unload_radius`. Radii default to the configured values.
    pub fn load_chunks_around(&mut self, center: WorldCoord, radii: Option<(u32, u32)>) {
        let (load_radius, unload_radius) =
            radii.unwrap_or((self.config.load_radius, self.config.unload_radius));
        let center_chunk = center.to_chunk_coord(self.config.chunk_size);

        let r = load_radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let coord = ChunkCoord::new(center_chunk.x + dx, center_chunk.y + dy);
                self.ensure_generated(coord);
                if self.active.insert(coord) {
                    trace!(x = coord.x, y = coord.y, "chunk activated");
                }
            }
        }

        self.unload_chunks_outside_radius(center_chunk, unload_radius);
        debug!(
            center_x = center_chunk.x,
            center_y = center_chunk.y,
            active = self.active.len(),
            backing = self.chunks.len(),
            "streaming window updated"
        );
    }

    /// Deactivates every active coordinate farther than `radius` (Chebyshev)
    /// from the center. Chunks stay in the backing map.
    pub fn unload_chunks_outside_radius(&mut self, center: ChunkCoord, radius: u32) {
        self.active
            .retain(|coord| coord.chebyshev_distance(center) <= radius);
    }

    /// Returns the active chunks a camera viewport may need drawn.
    ///
    /// Resolves the screen center to a chunk through the isometric
    /// projection, pads the radius for the diagonal screen footprint, and
    /// filters the active set. Never generates or mutates chunks.
    #[must_use]
    pub fn chunks_to_render(
        &self,
        camera: DVec2,
        screen_width: f64,
        screen_height: f64,
        tile_size: f64,
    ) -> Vec<&Chunk> {
        let center_screen = camera + DVec2::new(screen_width * 0.5, screen_height * 0.5);
        let center_tile = self.projection.tile_index_of(center_screen);
        let center_chunk = center_tile.to_chunk_coord(self.config.chunk_size);

        let diagonal_tiles = screen_width.hypot(screen_height) / tile_size.max(1.0);
        let footprint = (diagonal_tiles / f64::from(self.config.chunk_size)).ceil() as u32;
        let radius = footprint.max(MIN_RENDER_RADIUS) + RENDER_SAFETY_MARGIN;

        self.active
            .iter()
            .filter(|coord| coord.chebyshev_distance(center_chunk) <= radius)
            .filter_map(|coord| self.chunks.get(coord))
            .collect()
    }

    /// Creates the chunk if absent and generates it if ungenerated.
    fn ensure_generated(&mut self, coord: ChunkCoord) {
        let seed = self.config.world_seed;
        let params = self.config.rooms;
        let chunk = self.get_or_create_chunk(coord);
        if !chunk.is_generated() {
            chunk.generate(seed, &params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rime_common::RoomParams;

    fn system() -> ChunkSystem {
        ChunkSystem::new(WorldConfig {
            chunk_size: 32,
            ..WorldConfig::default()
        })
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "exceeds the local coordinate range")]
    fn rejects_chunk_size_beyond_local_range() {
        // A chunk size past u16::MAX would truncate local offsets.
        let _ = ChunkSystem::new(WorldConfig {
            chunk_size: 70_000,
            ..WorldConfig::default()
        });
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut sys = system();
        let coord = ChunkCoord::new(5, -3);
        sys.get_or_create_chunk(coord);
        sys.get_or_create_chunk(coord);
        assert_eq!(sys.chunk_count(), 1);
        assert_eq!(sys.chunk(coord).map(Chunk::coord), Some(coord));
    }

    #[test]
    fn get_tile_generates_on_demand() {
        let mut sys = system();
        let tile = sys.get_tile(WorldCoord::new(-1, -1)).expect("in range");
        assert!(TileCode::from_code(tile.code()).is_some());
        let coord = WorldCoord::new(-1, -1).to_chunk_coord(32);
        assert_eq!(coord, ChunkCoord::new(-1, -1));
        assert!(sys.chunk(coord).is_some_and(Chunk::is_generated));
    }

    #[test]
    fn is_passable_agrees_with_get_tile() {
        let mut sys = system();
        for x in -40..40 {
            for y in -40..40 {
                let world = WorldCoord::new(x, y);
                let expected = sys
                    .get_tile(world)
                    .map(TileCode::is_passable)
                    .unwrap_or(false);
                assert_eq!(sys.is_passable(world), expected);
            }
        }
    }

    #[test]
    fn load_radius_two_activates_twenty_five() {
        let mut sys = system();
        sys.load_chunks_around(WorldCoord::new(0, 0), Some((2, 2)));
        assert_eq!(sys.active_count(), 25);
        assert_eq!(sys.chunk_count(), 25);
        for dx in -2..=2 {
            for dy in -2..=2 {
                assert!(sys.is_active(ChunkCoord::new(dx, dy)));
            }
        }
    }

    #[test]
    fn unload_never_evicts_within_radius() {
        let mut sys = system();
        sys.load_chunks_around(WorldCoord::new(0, 0), Some((3, 3)));
        let before: Vec<ChunkCoord> = (-2..=2)
            .flat_map(|x| (-2..=2).map(move |y| ChunkCoord::new(x, y)))
            .collect();
        sys.unload_chunks_outside_radius(ChunkCoord::new(0, 0), 2);
        for coord in before {
            assert!(sys.is_active(coord), "{coord:?} falsely evicted");
        }
        assert_eq!(sys.active_count(), 25);
    }

    #[test]
    fn backing_map_never_shrinks() {
        let mut sys = system();
        sys.load_chunks_around(WorldCoord::new(0, 0), None);
        let after_first = sys.chunk_count();
        // Move far enough that the whole first window deactivates.
        sys.load_chunks_around(WorldCoord::new(32 * 100, 0), None);
        assert!(sys.chunk_count() > after_first);
        assert!(sys.active_count() < sys.chunk_count());
        // Deactivated chunks are still resident and generated.
        assert!(sys.chunk(ChunkCoord::new(0, 0)).is_some_and(Chunk::is_generated));
        assert!(!sys.is_active(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn moving_window_keeps_active_bounded() {
        let mut sys = system();
        for step in 0..10 {
            sys.load_chunks_around(WorldCoord::new(step * 32, 0), Some((2, 3)));
            // Window is at most (2*unload+1)^2.
            assert!(sys.active_count() <= 49);
        }
    }

    #[test]
    fn chunks_to_render_filters_active_set() {
        let mut sys = system();
        sys.load_chunks_around(WorldCoord::new(0, 0), Some((2, 2)));
        let before = sys.chunk_count();
        let visible = sys.chunks_to_render(DVec2::new(-640.0, -360.0), 1280.0, 720.0, 32.0);
        assert!(!visible.is_empty());
        assert!(visible.len() <= sys.active_count());
        for chunk in &visible {
            assert!(sys.is_active(chunk.coord()));
        }
        // Render filtering never creates chunks.
        assert_eq!(sys.chunk_count(), before);
    }

    #[test]
    fn identical_seed_systems_agree() {
        let config = WorldConfig {
            world_seed: 77,
            chunk_size: 32,
            rooms: RoomParams::default(),
            ..WorldConfig::default()
        };
        let mut a = ChunkSystem::new(config.clone());
        let mut b = ChunkSystem::new(config);
        for x in -5..5 {
            for y in -5..5 {
                let world = WorldCoord::new(x * 7, y * 11);
                assert_eq!(
                    a.get_tile(world).ok(),
                    b.get_tile(world).ok(),
                    "divergence at {world:?}"
                );
            }
        }
    }
}
