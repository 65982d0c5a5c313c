//! Chunk data structure: a fixed-size square tile region.

use rime_common::{ChunkCoord, EntityId, LocalCoord, RoomParams, TileCode, WorldCoord};
use tracing::trace;

use crate::generation::{chunk_seed, GeneratorConfig, RegionGenerator};

/// A square region of the tile world, the unit of generation and streaming.
///
/// Created empty (all wall, ungenerated) the first time its coordinate is
/// referenced; its content is filled lazily by [`Self::generate`]. Chunks
/// generate independently of their neighbors, so corridors stop at chunk
/// edges rather than continuing coherently across a boundary.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk coordinate
    coord: ChunkCoord,
    /// Chunk size (width and height in tiles)
    size: u32,
    /// Tile data (size x size), wall-filled until generated
    tiles: Vec<TileCode>,
    /// Whether content has been generated. Monotonic: never reset.
    generated: bool,
    /// Entities anchored to this chunk. Managed entirely by the external
    /// spawn system; this core neither populates nor interprets it.
    entities: Vec<EntityId>,
}

impl Chunk {
    /// Creates a new empty, ungenerated chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord, size: u32) -> Self {
        let cell_count = (size as usize) * (size as usize);
        Self {
            coord,
            size,
            tiles: vec![TileCode::Wall; cell_count],
            generated: false,
            entities: Vec::new(),
        }
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the chunk size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns whether content has been generated.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Fills the chunk with rooms and corridors.
    ///
    /// The region generator runs scoped to exactly this chunk's extent,
    /// seeded from the world seed and the chunk coordinate, so the same
    /// coordinate always produces identical content. Any cell the generator
    /// does not produce stays wall. A second call is a no-op.
    pub fn generate(&mut self, world_seed: u64, params: &RoomParams) {
        if self.generated {
            return;
        }

        let config = GeneratorConfig {
            width: self.size,
            height: self.size,
            room_count: params.room_count,
            min_room_size: params.min_room_size,
            max_room_size: params.max_room_size,
            column_chance: params.column_chance,
        };
        let mut generator = RegionGenerator::new(config, chunk_seed(world_seed, self.coord));
        if params.decorate {
            generator.generate();
        } else {
            generator.generate_undecorated();
        }

        // Cell-by-cell copy; a generator grid smaller than the chunk leaves
        // the remainder wall.
        let grid = generator.grid();
        let gen_width = generator.config().width;
        let gen_height = generator.config().height;
        for y in 0..gen_height.min(self.size) {
            for x in 0..gen_width.min(self.size) {
                let src = (y * gen_width + x) as usize;
                let dst = (y * self.size + x) as usize;
                self.tiles[dst] = grid[src];
            }
        }

        self.generated = true;
        trace!(
            x = self.coord.x,
            y = self.coord.y,
            rooms = generator.rooms().len(),
            "chunk generated"
        );
    }

    /// Gets the tile at a local offset.
    #[must_use]
    pub fn tile(&self, local: LocalCoord) -> Option<TileCode> {
        if u32::from(local.x) >= self.size || u32::from(local.y) >= self.size {
            return None;
        }
        self.tiles.get(local.to_index(self.size)).copied()
    }

    /// Sets the tile at a local offset. Returns false if out of bounds.
    pub fn set_tile(&mut self, local: LocalCoord, tile: TileCode) -> bool {
        if u32::from(local.x) >= self.size || u32::from(local.y) >= self.size {
            return false;
        }
        let index = local.to_index(self.size);
        if let Some(slot) = self.tiles.get_mut(index) {
            *slot = tile;
            return true;
        }
        false
    }

    /// Returns a slice of all tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[TileCode] {
        &self.tiles
    }

    /// True iff the world tile coordinate falls within this chunk.
    #[must_use]
    pub const fn contains_world_coordinate(&self, world: WorldCoord) -> bool {
        let origin = self.coord.to_world_coord(self.size);
        let size = self.size as i64;
        world.x >= origin.x
            && world.x < origin.x + size
            && world.y >= origin.y
            && world.y < origin.y + size
    }

    /// Entities anchored to this chunk.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Mutable access for the external spawn system.
    pub fn entities_mut(&mut self) -> &mut Vec<EntityId> {
        &mut self.entities
    }
}
