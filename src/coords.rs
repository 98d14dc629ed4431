//! Coordinate system for chunked, multi-level maps.
//!
//! One coordinate type serves two spaces:
//! - chunk space, where (x, y) picks a chunk and z picks the level
//!   (z = 0 is the surface, z > 0 are dungeon levels);
//! - local tile space, where (x, y) is a position inside one chunk.

use serde::{Deserialize, Serialize};

use crate::chunk::{CHUNK_HEIGHT, CHUNK_WIDTH};

/// Immutable (x, y, z) triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// A local tile position (z is unused for tiles).
    pub const fn tile(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Neighboring coordinate one step in a lateral direction
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy, self.z)
    }

    /// Coordinate of the level directly below (deeper)
    pub fn below(&self) -> Self {
        Self::new(self.x, self.y, self.z + 1)
    }

    /// Coordinate of the level directly above, if there is one
    pub fn above(&self) -> Option<Self> {
        (self.z > 0).then(|| Self::new(self.x, self.y, self.z - 1))
    }

    pub fn is_surface(&self) -> bool {
        self.z == 0
    }

    /// Manhattan distance ignoring z
    pub fn manhattan(&self, other: &Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four lateral neighbors of a tile position, in `Direction::ALL` order
    pub fn adjacent(&self) -> [Coordinate; 4] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    /// Global tile position of a local tile inside this chunk coordinate.
    ///
    /// Noise sampled at the global position is continuous across chunk borders.
    pub fn global_tile(&self, local: Coordinate) -> (i64, i64) {
        (
            self.x as i64 * CHUNK_WIDTH as i64 + local.x as i64,
            self.y as i64 * CHUNK_HEIGHT as i64 + local.y as i64,
        )
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Lateral directions; each names a chunk edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Row 0 (toward y - 1)
    Up,
    /// Last row (toward y + 1)
    Down,
    /// Column 0 (toward x - 1)
    Left,
    /// Last column (toward x + 1)
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Length of the edge this direction names, in tiles
    pub fn edge_len(&self) -> i32 {
        match self {
            Direction::Up | Direction::Down => CHUNK_WIDTH,
            Direction::Left | Direction::Right => CHUNK_HEIGHT,
        }
    }

    /// Local tile on this edge at `offset` along it
    pub fn edge_tile(&self, offset: i32) -> Coordinate {
        match self {
            Direction::Up => Coordinate::tile(offset, 0),
            Direction::Down => Coordinate::tile(offset, CHUNK_HEIGHT - 1),
            Direction::Left => Coordinate::tile(0, offset),
            Direction::Right => Coordinate::tile(CHUNK_WIDTH - 1, offset),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Deterministic seed for a chunk's random source.
///
/// The world seed is mixed with every coordinate component, splitmix64 style,
/// so the same world seed and coordinate always give the same stream no
/// matter which chunks were generated before.
pub fn chunk_seed(world_seed: u64, coord: &Coordinate) -> u64 {
    let mut hash = world_seed;

    hash = hash.wrapping_add(coord.x as i64 as u64);
    hash ^= hash >> 30;
    hash = hash.wrapping_mul(0xbf58476d1ce4e5b9);

    hash = hash.wrapping_add(coord.y as i64 as u64);
    hash ^= hash >> 27;
    hash = hash.wrapping_mul(0x94d049bb133111eb);

    hash = hash.wrapping_add(coord.z as i64 as u64);
    hash ^= hash >> 31;
    hash = hash.wrapping_mul(0xbf58476d1ce4e5b9);

    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_seed_determinism() {
        let coord = Coordinate::new(10, -20, 3);
        assert_eq!(chunk_seed(12345, &coord), chunk_seed(12345, &coord));
    }

    #[test]
    fn test_chunk_seed_uniqueness() {
        let seed = 12345u64;
        let a = chunk_seed(seed, &Coordinate::new(1, 2, 0));
        let b = chunk_seed(seed, &Coordinate::new(1, 2, 1)); // Different z
        let c = chunk_seed(seed, &Coordinate::new(2, 1, 0)); // Swapped x/y
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, chunk_seed(seed + 1, &Coordinate::new(1, 2, 0)));
    }

    #[test]
    fn test_neighbors() {
        let c = Coordinate::new(0, 0, 2);
        assert_eq!(c.neighbor(Direction::Left), Coordinate::new(-1, 0, 2));
        assert_eq!(c.neighbor(Direction::Down), Coordinate::new(0, 1, 2));
        assert_eq!(c.below(), Coordinate::new(0, 0, 3));
        assert_eq!(c.above(), Some(Coordinate::new(0, 0, 1)));
        assert_eq!(Coordinate::new(4, 4, 0).above(), None);
    }

    #[test]
    fn test_opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (dx, dy) = d.offset();
            let (ox, oy) = d.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_edge_tiles() {
        assert_eq!(Direction::Right.edge_tile(5), Coordinate::tile(CHUNK_WIDTH - 1, 5));
        assert_eq!(Direction::Down.edge_tile(7), Coordinate::tile(7, CHUNK_HEIGHT - 1));
    }

    #[test]
    fn test_global_tile_is_continuous() {
        let left = Coordinate::new(0, 0, 0);
        let right = Coordinate::new(1, 0, 0);
        let (lx, _) = left.global_tile(Coordinate::tile(CHUNK_WIDTH - 1, 0));
        let (rx, _) = right.global_tile(Coordinate::tile(0, 0));
        assert_eq!(lx + 1, rx);
        assert_eq!(Coordinate::new(-1, 0, 0).global_tile(Coordinate::tile(0, 0)).0, -(CHUNK_WIDTH as i64));
    }
}
