//! Chunked world generation for a multi-level dungeon crawler
//!
//! The surface (z = 0) and every dungeon level below it are split into
//! 80×24 chunks that are generated lazily and deterministically from the
//! world seed. Start with [`WorldManager::load_chunk`].

pub mod ascii;
pub mod biome;
pub mod chunk;
pub mod config;
pub mod coords;
pub mod dungeon;
pub mod error;
pub mod manager;
pub mod noise_field;
pub mod populate;
pub mod surface;
pub mod templates;
pub mod tile;
pub mod world;

pub use chunk::{Chunk, ChunkState, CHUNK_HEIGHT, CHUNK_WIDTH};
pub use config::WorldConfig;
pub use coords::{Coordinate, Direction};
pub use error::{ConfigError, GenerationError, Result};
pub use manager::WorldManager;
pub use tile::{Tile, TileType};
pub use world::World;
