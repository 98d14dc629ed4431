//! The chunk store and the boundary facts full generation reads from it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::coords::{Coordinate, Direction};
use crate::error::{ConfigError, GenerationError, Result};
use crate::noise_field::{NoiseField, BIOME_FREQUENCY, TERRAIN_FREQUENCY};

/// Coordinate → chunk mapping plus everything shared by all chunks.
///
/// Each coordinate is populated once; asking again returns the same chunk.
pub struct World {
    config: WorldConfig,
    game_id: u64,
    /// Per-tile terrain field (6 octaves)
    terrain_noise: NoiseField,
    /// Per-chunk biome field (1 octave)
    biome_noise: NoiseField,
    chunks: HashMap<Coordinate, Chunk>,
}

impl World {
    /// Create an empty world. The configuration is validated here, before
    /// any tile exists.
    pub fn new(config: WorldConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            terrain_noise: NoiseField::new(config.seed, TERRAIN_FREQUENCY),
            biome_noise: NoiseField::new(config.seed.wrapping_add(1), BIOME_FREQUENCY),
            config,
            game_id: 0,
            chunks: HashMap::new(),
        })
    }

    /// Tag every chunk created from now on with the owning game's id
    pub fn with_game_id(mut self, game_id: u64) -> Self {
        self.game_id = game_id;
        self
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn terrain_noise(&self) -> &NoiseField {
        &self.terrain_noise
    }

    pub fn biome_noise(&self) -> &NoiseField {
        &self.biome_noise
    }

    pub fn in_bounds(&self, coord: &Coordinate) -> bool {
        self.config.contains(coord)
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.chunks.contains_key(coord)
    }

    pub fn get(&self, coord: &Coordinate) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    /// Store a chunk, replacing any earlier state at its coordinate
    pub(crate) fn insert(&mut self, chunk: Chunk) -> &Chunk {
        match self.chunks.entry(chunk.coord()) {
            Entry::Occupied(mut slot) => {
                slot.insert(chunk);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(chunk),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// A fresh, empty chunk belonging to this world
    pub(crate) fn new_chunk(&self, coord: Coordinate) -> Chunk {
        let fill = if coord.is_surface() {
            crate::tile::TileType::Grass
        } else {
            crate::tile::TileType::Wall
        };
        Chunk::new(self.config.seed, self.game_id, coord, fill)
    }

    /// Collect what neighbors committed for the chunk at `coord`.
    ///
    /// Every in-bounds lateral neighbor, and the level above for dungeon
    /// chunks, must already be soft-generated.
    pub fn boundary_commitments(&self, coord: Coordinate) -> Result<BoundaryCommitments> {
        let mut commitments = BoundaryCommitments::default();

        for direction in Direction::ALL {
            let neighbor = coord.neighbor(direction);
            if !self.in_bounds(&neighbor) {
                continue;
            }
            let chunk = self.get(&neighbor).ok_or(GenerationError::NeighborNotSoftGenerated {
                chunk: coord,
                neighbor,
            })?;
            let committed = chunk.edges.map(|e| e.get(direction.opposite()));
            commitments.set_edge(direction, committed);
        }

        if let Some(above) = coord.above() {
            let chunk = self.get(&above).ok_or(GenerationError::NeighborNotSoftGenerated {
                chunk: coord,
                neighbor: above,
            })?;
            commitments.stairs_above = chunk.down_staircases();
        }

        Ok(commitments)
    }
}

/// Facts committed by neighbors that a chunk must honor during full
/// generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryCommitments {
    /// Neighbor's opposite-edge offset across our up edge
    pub up: Option<i32>,
    /// Neighbor's opposite-edge offset across our down edge
    pub down: Option<i32>,
    /// Neighbor's opposite-edge offset across our left edge
    pub left: Option<i32>,
    /// Neighbor's opposite-edge offset across our right edge
    pub right: Option<i32>,
    /// Down-staircases of the level above, at local positions
    pub stairs_above: Vec<Coordinate>,
}

impl BoundaryCommitments {
    pub fn get(&self, direction: Direction) -> Option<i32> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set_edge(&mut self, direction: Direction, offset: Option<i32>) {
        match direction {
            Direction::Up => self.up = offset,
            Direction::Down => self.down = offset,
            Direction::Left => self.left = offset,
            Direction::Right => self.right = offset,
        }
    }

    pub fn has_any(&self) -> bool {
        self.up.is_some() || self.down.is_some() || self.left.is_some() || self.right.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::EdgeConnections;

    #[test]
    fn test_invalid_config_rejected_at_creation() {
        let mut config = WorldConfig::default();
        config.dungeon.max_leaves = 0;
        assert!(matches!(World::new(config), Err(ConfigError::ZeroMaxLeaves)));
    }

    #[test]
    fn test_chunk_record_survives_json() {
        let world = World::new(WorldConfig::with_seed(11)).unwrap().with_game_id(7);
        let coord = Coordinate::new(3, -2, 1);
        let record = world.new_chunk(coord).record();

        let json = serde_json::to_string(&record).unwrap();
        let restored: crate::chunk::ChunkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.game_id, 7);
        assert_eq!(restored.id, crate::coords::chunk_seed(11, &coord));
        assert_eq!(restored.coord, coord);
    }

    #[test]
    fn test_commitments_need_soft_neighbors() {
        let world = World::new(WorldConfig::default()).unwrap();
        let result = world.boundary_commitments(Coordinate::new(0, 0, 1));
        assert!(matches!(result, Err(GenerationError::NeighborNotSoftGenerated { .. })));
    }

    #[test]
    fn test_commitments_read_opposite_edges() {
        let mut config = WorldConfig::default();
        config.world_size = Some(1);
        let mut world = World::new(config).unwrap();

        // Only (0,0) is inside a 1-chunk world, so lateral edges are skipped
        let mut above = world.new_chunk(Coordinate::new(0, 0, 0));
        above.add_structure(Coordinate::tile(4, 4), crate::chunk::StructureKind::StairsDown);
        world.insert(above);

        let commitments = world.boundary_commitments(Coordinate::new(0, 0, 1)).unwrap();
        assert!(!commitments.has_any());
        assert_eq!(commitments.stairs_above, vec![Coordinate::tile(4, 4)]);

        let mut config = WorldConfig::default();
        config.world_size = Some(4);
        let mut world = World::new(config).unwrap();
        for d in Direction::ALL {
            let mut chunk = world.new_chunk(Coordinate::new(0, 0, 0).neighbor(d));
            chunk.edges = Some(EdgeConnections { up: 1, down: 2, left: 3, right: 4 });
            world.insert(chunk);
        }
        let commitments = world.boundary_commitments(Coordinate::new(0, 0, 0)).unwrap();
        // Our up edge meets the chunk above's down edge, and so on
        assert_eq!(commitments.up, Some(2));
        assert_eq!(commitments.down, Some(1));
        assert_eq!(commitments.left, Some(4));
        assert_eq!(commitments.right, Some(3));
    }
}
