//! Error types for configuration and chunk generation.
//!
//! Configuration errors are rejected before any tile is written. Generation
//! errors abort the chunk being generated and surface to the caller of
//! `WorldManager::load_chunk`; nothing is retried, since a deterministic
//! generator would fail the same way again.

use thiserror::Error;

use crate::coords::Coordinate;

/// Invalid world configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Minimum room width or height is zero or negative.
    #[error("minimum room size must be positive, got {width}x{height}")]
    NonPositiveRoomSize { width: i32, height: i32 },

    /// Minimum room size does not fit inside a chunk.
    #[error("minimum room size {width}x{height} does not fit in a chunk")]
    RoomLargerThanChunk { width: i32, height: i32 },

    /// BSP leaf budget of zero.
    #[error("max leaves must be at least 1")]
    ZeroMaxLeaves,

    /// A structure template is larger than the minimum room.
    #[error("structure template '{name}' ({width}x{height}) exceeds minimum room {min_width}x{min_height}")]
    TemplateTooLarge {
        name: String,
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    /// Spawn range with min above max.
    #[error("invalid {what} spawn range: {min}..={max}")]
    InvalidSpawnRange { what: &'static str, min: u32, max: u32 },

    /// Probability outside [0, 1].
    #[error("{what} must be within [0, 1], got {value}")]
    InvalidChance { what: &'static str, value: f64 },

    /// Staircase margin leaves no interior tile.
    #[error("staircase margin {0} leaves no interior tiles")]
    InvalidStairMargin(i32),

    /// World size limit of zero chunks.
    #[error("world size must be at least 1 chunk")]
    ZeroWorldSize,

    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `WorldConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while loading or generating a chunk.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Requested coordinate lies outside the configured world.
    #[error("chunk {0} is outside the world bounds")]
    OutOfBounds(Coordinate),

    /// A chunk ended up without a single passable tile.
    #[error("chunk {0} has no passable tile")]
    NoPassableTile(Coordinate),

    /// A nearest-floor query ran against a chunk with no floor.
    #[error("chunk {0} has no floor tile")]
    NoFloorTile(Coordinate),

    /// A BSP subtree being connected has no floor tile in its rooms.
    #[error("no floor tile in room space while connecting chunk {0}")]
    EmptyRoomSpace(Coordinate),

    /// Full generation was attempted before a neighbor committed its boundary.
    #[error("chunk {chunk} needs neighbor {neighbor} soft-generated first")]
    NeighborNotSoftGenerated { chunk: Coordinate, neighbor: Coordinate },

    /// Terrain of a fully generated chunk is immutable.
    #[error("chunk {0} is already fully generated")]
    AlreadyGenerated(Coordinate),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
