//! Chunks: the unit of lazy generation.
//!
//! A chunk is a fixed 80×24 tile grid plus the facts it committed to its
//! neighbors. It moves through three states:
//!
//! | State            | What exists                                             |
//! |------------------|---------------------------------------------------------|
//! | `Empty`          | placeholder tiles only                                  |
//! | `SoftGenerated`  | biome, edge connections, down-staircase (if any)        |
//! | `FullyGenerated` | every tile concrete and connected; terrain is immutable |
//!
//! After full generation only the item and monster overlays may change.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::coords::{chunk_seed, Coordinate, Direction};
use crate::error::{GenerationError, Result};
use crate::tile::{Item, Tile, TileType};

/// Chunk width in tiles
pub const CHUNK_WIDTH: i32 = 80;
/// Chunk height in tiles
pub const CHUNK_HEIGHT: i32 = 24;
/// Tiles per chunk
pub const CHUNK_AREA: usize = (CHUNK_WIDTH * CHUNK_HEIGHT) as usize;

/// Generation lifecycle of a chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChunkState {
    Empty,
    SoftGenerated,
    FullyGenerated,
}

/// Committed crossing offsets, one per edge.
///
/// Up/down store an x offset, left/right store a y offset. Once soft
/// generation commits them they never change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeConnections {
    pub up: i32,
    pub down: i32,
    pub left: i32,
    pub right: i32,
}

impl EdgeConnections {
    pub fn get(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Kind of structure marker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureKind {
    StairsDown,
    StairsUp,
    /// A stamped surface template, by name
    Landmark(String),
}

/// Additive marker on a chunk. The tile grid stays the source of truth for
/// passability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub location: Coordinate,
    pub kind: StructureKind,
}

/// A monster standing on a tile (overlay, not terrain)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub position: Coordinate,
}

/// Identity of a chunk, enough to rebuild it from the world seed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: u64,
    pub game_id: u64,
    pub coord: Coordinate,
    pub biome: Biome,
}

/// A chunk of the map
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Random source, owned by this chunk for its whole life
    rng: ChaCha8Rng,
    id: u64,
    game_id: u64,
    coord: Coordinate,
    /// Tiles in row-major order
    tiles: Vec<Tile>,
    pub biome: Biome,
    pub structures: Vec<Structure>,
    /// Edge commitments (dungeon chunks only)
    pub edges: Option<EdgeConnections>,
    pub monsters: Vec<Monster>,
    state: ChunkState,
}

impl Chunk {
    /// Create an empty chunk filled with placeholder tiles
    pub fn new(world_seed: u64, game_id: u64, coord: Coordinate, fill: TileType) -> Self {
        let seed = chunk_seed(world_seed, &coord);
        let tiles = (0..CHUNK_AREA)
            .map(|idx| Tile::new(fill, Self::coord_of(idx)))
            .collect();

        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            id: seed,
            game_id,
            coord,
            tiles,
            biome: if coord.is_surface() { Biome::Plains } else { Biome::Underground },
            structures: Vec::new(),
            edges: None,
            monsters: Vec::new(),
            state: ChunkState::Empty,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    /// Chunk coordinate (not a tile position)
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn is_fully_generated(&self) -> bool {
        self.state == ChunkState::FullyGenerated
    }

    pub(crate) fn mark_soft_generated(&mut self) {
        self.state = ChunkState::SoftGenerated;
    }

    pub(crate) fn mark_fully_generated(&mut self) {
        self.state = ChunkState::FullyGenerated;
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn record(&self) -> ChunkRecord {
        ChunkRecord {
            id: self.id,
            game_id: self.game_id,
            coord: self.coord,
            biome: self.biome,
        }
    }

    // =========================================================================
    // Tile access
    // =========================================================================

    #[inline]
    fn index(coord: Coordinate) -> Option<usize> {
        if Self::in_bounds(coord) {
            Some((coord.y * CHUNK_WIDTH + coord.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    fn coord_of(idx: usize) -> Coordinate {
        let idx = idx as i32;
        Coordinate::tile(idx % CHUNK_WIDTH, idx / CHUNK_WIDTH)
    }

    /// Check if a local position lies inside the chunk
    pub fn in_bounds(coord: Coordinate) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < CHUNK_WIDTH && coord.y < CHUNK_HEIGHT
    }

    /// Check if a local position lies on the outermost ring of tiles
    pub fn on_border(coord: Coordinate) -> bool {
        coord.x == 0 || coord.y == 0 || coord.x == CHUNK_WIDTH - 1 || coord.y == CHUNK_HEIGHT - 1
    }

    /// All local positions in row-major order
    pub fn positions() -> impl Iterator<Item = Coordinate> {
        (0..CHUNK_AREA).map(Self::coord_of)
    }

    pub fn get(&self, coord: Coordinate) -> Option<&Tile> {
        Self::index(coord).map(|idx| &self.tiles[idx])
    }

    pub fn kind(&self, coord: Coordinate) -> Option<TileType> {
        self.get(coord).map(|t| t.kind)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_passable(&self, coord: Coordinate) -> bool {
        self.get(coord).is_some_and(|t| t.is_passable())
    }

    /// Write terrain during generation. Returns false when out of range.
    pub(crate) fn put(&mut self, coord: Coordinate, kind: TileType) -> bool {
        match Self::index(coord) {
            Some(idx) => {
                self.tiles[idx].kind = kind;
                true
            }
            None => false,
        }
    }

    /// Change terrain at a local position.
    ///
    /// Terrain of a fully generated chunk is immutable. Returns `Ok(false)`
    /// when the position is outside the chunk.
    pub fn set(&mut self, coord: Coordinate, kind: TileType) -> Result<bool> {
        if self.is_fully_generated() {
            return Err(GenerationError::AlreadyGenerated(self.coord));
        }
        Ok(self.put(coord, kind))
    }

    /// Drop an item on a tile. Returns false when out of range.
    pub fn add_item(&mut self, coord: Coordinate, item: Item) -> bool {
        match Self::index(coord) {
            Some(idx) => {
                self.tiles[idx].items.push(item);
                true
            }
            None => false,
        }
    }

    /// Take every item off a tile
    pub fn take_items(&mut self, coord: Coordinate) -> Vec<Item> {
        match Self::index(coord) {
            Some(idx) => std::mem::take(&mut self.tiles[idx].items),
            None => Vec::new(),
        }
    }

    pub fn monster_at(&self, coord: Coordinate) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.position == coord)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Nearest tile (Manhattan) matching a predicate; ties go to the first
    /// tile in row-major order.
    pub fn find_nearest<F>(&self, from: Coordinate, mut pred: F) -> Option<Coordinate>
    where
        F: FnMut(&Tile) -> bool,
    {
        let mut best: Option<(u32, Coordinate)> = None;
        for tile in &self.tiles {
            if !pred(tile) {
                continue;
            }
            let dist = from.manhattan(&tile.coord);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, tile.coord));
            }
        }
        best.map(|(_, c)| c)
    }

    /// Nearest dungeon floor tile
    pub fn nearest_floor(&self, from: Coordinate) -> Result<Coordinate> {
        self.find_nearest(from, |t| t.kind == TileType::Floor)
            .ok_or(GenerationError::NoFloorTile(self.coord))
    }

    /// Nearest tile carrying at least one item
    pub fn closest_tile_with_item(&self, from: Coordinate) -> Option<Coordinate> {
        self.find_nearest(from, Tile::has_items)
    }

    /// Uniformly random passable tile, drawn from this chunk's random source
    pub fn random_passable_tile(&mut self) -> Result<Coordinate> {
        let candidates: Vec<Coordinate> = self
            .tiles
            .iter()
            .filter(|t| t.is_passable())
            .map(|t| t.coord)
            .collect();
        if candidates.is_empty() {
            return Err(GenerationError::NoPassableTile(self.coord));
        }
        let pick = self.rng.gen_range(0..candidates.len());
        Ok(candidates[pick])
    }

    /// Random passable tile with no monster and no staircase on it
    pub fn random_unoccupied_tile(&mut self) -> Option<Coordinate> {
        let candidates: Vec<Coordinate> = self
            .tiles
            .iter()
            .filter(|t| t.is_passable() && !t.kind.is_staircase())
            .map(|t| t.coord)
            .filter(|c| self.monster_at(*c).is_none())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..candidates.len());
        Some(candidates[pick])
    }

    /// Random position at least `margin` tiles away from every edge
    pub(crate) fn random_interior(&mut self, margin: i32) -> Coordinate {
        let x = self.rng.gen_range(margin..=CHUNK_WIDTH - 1 - margin);
        let y = self.rng.gen_range(margin..=CHUNK_HEIGHT - 1 - margin);
        Coordinate::tile(x, y)
    }

    /// Check whether a tile has a passable, non-staircase 4-neighbor
    pub fn has_accessible_neighbor(&self, coord: Coordinate) -> bool {
        coord
            .adjacent()
            .iter()
            .filter_map(|c| self.get(*c))
            .any(|t| t.is_passable() && !t.kind.is_staircase())
    }

    /// Passable tiles reachable from `from` (4-connectivity)
    pub fn flood_fill(&self, from: Coordinate) -> HashSet<Coordinate> {
        let mut seen = HashSet::new();
        if !self.is_passable(from) {
            return seen;
        }

        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for next in current.adjacent() {
                if self.is_passable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }

    /// Connected components of passable tiles (4-connectivity), in
    /// row-major order of their first tile.
    pub fn passable_regions(&self) -> Vec<Vec<Coordinate>> {
        let mut labels: Vec<Option<usize>> = vec![None; CHUNK_AREA];
        let mut regions: Vec<Vec<Coordinate>> = Vec::new();

        for start in Self::positions() {
            let Some(start_idx) = Self::index(start) else { continue };
            if labels[start_idx].is_some() || !self.tiles[start_idx].is_passable() {
                continue;
            }

            let label = regions.len();
            let mut region = Vec::new();
            let mut queue = VecDeque::new();
            labels[start_idx] = Some(label);
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                region.push(current);
                for next in current.adjacent() {
                    if let Some(idx) = Self::index(next) {
                        if labels[idx].is_none() && self.tiles[idx].is_passable() {
                            labels[idx] = Some(label);
                            queue.push_back(next);
                        }
                    }
                }
            }

            regions.push(region);
        }

        regions
    }

    pub fn passable_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_passable()).count()
    }

    // =========================================================================
    // Structures
    // =========================================================================

    /// Positions of this chunk's down-staircases
    pub fn down_staircases(&self) -> Vec<Coordinate> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::StairsDown)
            .map(|s| s.location)
            .collect()
    }

    /// Positions of this chunk's up-staircases
    pub fn up_staircases(&self) -> Vec<Coordinate> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::StairsUp)
            .map(|s| s.location)
            .collect()
    }

    pub(crate) fn add_structure(&mut self, location: Coordinate, kind: StructureKind) {
        let structure = Structure { location, kind };
        if !self.structures.contains(&structure) {
            self.structures.push(structure);
        }
    }
}
