//! World generation configuration.
//!
//! Parsed once at world creation, from JSON or built in code, and validated
//! before any tile is written.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::{CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::coords::Coordinate;
use crate::error::ConfigError;
use crate::templates;

/// Inclusive range of how many entities to spawn per chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: u32,
    pub max: u32,
}

impl SpawnRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Spawn counts handed to the population collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub items: SpawnRange,
    pub monsters: SpawnRange,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            items: SpawnRange::new(2, 6),
            monsters: SpawnRange::new(1, 4),
        }
    }
}

/// Dungeon level parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Deepest dungeon level; `None` for unbounded
    pub max_depth: Option<u32>,
    /// Minimum BSP leaf width
    pub min_room_width: i32,
    /// Minimum BSP leaf height
    pub min_room_height: i32,
    /// Maximum number of BSP leaves (rooms) per chunk
    pub max_leaves: usize,
    /// Staircases keep this many tiles away from every chunk edge
    pub stair_margin: i32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_room_width: 6,
            min_room_height: 6,
            max_leaves: 8,
            stair_margin: 2,
        }
    }
}

/// Surface parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Enclosed passable pockets smaller than this are filled in
    pub min_cluster_size: usize,
    /// Chance a surface chunk gets a structure template
    pub structure_chance: f64,
    /// Chance a surface chunk gets a dungeon entrance
    pub entrance_chance: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 12,
            structure_chance: 0.35,
            entrance_chance: 0.5,
        }
    }
}

/// Complete world configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    /// Lateral limit in chunks: a chunk is inside when |x| and |y| are below
    /// it. `None` for an unbounded surface.
    pub world_size: Option<u32>,
    pub dungeon: DungeonConfig,
    pub surface: SurfaceConfig,
    pub spawns: SpawnConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_size: None,
            dungeon: DungeonConfig::default(),
            surface: SurfaceConfig::default(),
            spawns: SpawnConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Write this configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Reject configurations generation cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dungeon = &self.dungeon;
        if dungeon.min_room_width <= 0 || dungeon.min_room_height <= 0 {
            return Err(ConfigError::NonPositiveRoomSize {
                width: dungeon.min_room_width,
                height: dungeon.min_room_height,
            });
        }
        if dungeon.min_room_width > CHUNK_WIDTH || dungeon.min_room_height > CHUNK_HEIGHT {
            return Err(ConfigError::RoomLargerThanChunk {
                width: dungeon.min_room_width,
                height: dungeon.min_room_height,
            });
        }
        if dungeon.max_leaves == 0 {
            return Err(ConfigError::ZeroMaxLeaves);
        }
        if dungeon.stair_margin < 1 || dungeon.stair_margin * 2 >= CHUNK_HEIGHT {
            return Err(ConfigError::InvalidStairMargin(dungeon.stair_margin));
        }

        for template in templates::catalogue() {
            if template.width > dungeon.min_room_width || template.height > dungeon.min_room_height {
                return Err(ConfigError::TemplateTooLarge {
                    name: template.name.to_string(),
                    width: template.width,
                    height: template.height,
                    min_width: dungeon.min_room_width,
                    min_height: dungeon.min_room_height,
                });
            }
        }

        for (what, range) in [("item", self.spawns.items), ("monster", self.spawns.monsters)] {
            if range.min > range.max {
                return Err(ConfigError::InvalidSpawnRange {
                    what,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for (what, value) in [
            ("structure_chance", self.surface.structure_chance),
            ("entrance_chance", self.surface.entrance_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { what, value });
            }
        }

        if self.world_size == Some(0) {
            return Err(ConfigError::ZeroWorldSize);
        }

        Ok(())
    }

    /// Check whether a chunk coordinate lies inside the configured world.
    ///
    /// Coordinates on the `i32` limits are never inside, so every chunk in
    /// the world has addressable neighbors on all sides.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        if coord.z < 0 || coord.z == i32::MAX {
            return false;
        }
        if [coord.x, coord.y].iter().any(|&v| v == i32::MIN || v == i32::MAX) {
            return false;
        }
        if let Some(size) = self.world_size {
            if coord.x.unsigned_abs() >= size || coord.y.unsigned_abs() >= size {
                return false;
            }
        }
        match self.dungeon.max_depth {
            Some(depth) => coord.z as u32 <= depth,
            None => true,
        }
    }

    /// Whether dungeon level `z` gets a down-staircase
    pub fn has_level_below(&self, z: i32) -> bool {
        match self.dungeon.max_depth {
            Some(depth) => (z as u32) < depth,
            None => z < i32::MAX - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_positive_room() {
        let mut config = WorldConfig::default();
        config.dungeon.min_room_width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveRoomSize { .. })));

        config.dungeon.min_room_width = 6;
        config.dungeon.min_room_height = -3;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveRoomSize { .. })));
    }

    #[test]
    fn test_rejects_zero_leaves() {
        let mut config = WorldConfig::default();
        config.dungeon.max_leaves = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMaxLeaves)));
    }

    #[test]
    fn test_rejects_template_larger_than_min_room() {
        let mut config = WorldConfig::default();
        config.dungeon.min_room_width = 4;
        config.dungeon.min_room_height = 4;
        assert!(matches!(config.validate(), Err(ConfigError::TemplateTooLarge { .. })));
    }

    #[test]
    fn test_rejects_bad_spawns_and_chances() {
        let mut config = WorldConfig::default();
        config.spawns.monsters = SpawnRange::new(5, 2);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpawnRange { what: "monster", .. })));

        let mut config = WorldConfig::default();
        config.surface.entrance_chance = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidChance { .. })));

        let mut config = WorldConfig::default();
        config.world_size = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWorldSize)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "seed": 7, "dungeon": { "max_depth": 3 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.dungeon.max_depth, Some(3));
        assert_eq!(config.dungeon.min_room_width, 6);
        assert_eq!(config.spawns, SpawnConfig::default());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(WorldConfig::from_json_str("{ seed: "), Err(ConfigError::Parse(_))));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "dungeon": { "max_leaves": 0 } }"#),
            Err(ConfigError::ZeroMaxLeaves)
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");

        let mut config = WorldConfig::with_seed(99);
        config.world_size = Some(8);
        config.save(&path).unwrap();

        let loaded = WorldConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bounds() {
        let mut config = WorldConfig::default();
        assert!(config.contains(&Coordinate::new(-1000, 5000, 30)));
        assert!(!config.contains(&Coordinate::new(0, 0, -1)));
        assert!(config.contains(&Coordinate::new(i32::MAX - 1, i32::MIN + 1, i32::MAX - 1)));
        assert!(!config.contains(&Coordinate::new(i32::MAX, 0, 0)));
        assert!(!config.contains(&Coordinate::new(0, i32::MIN, 0)));
        assert!(!config.contains(&Coordinate::new(0, 0, i32::MAX)));

        config.world_size = Some(2);
        config.dungeon.max_depth = Some(3);
        assert!(config.contains(&Coordinate::new(-1, 1, 3)));
        assert!(!config.contains(&Coordinate::new(2, 0, 0)));
        assert!(!config.contains(&Coordinate::new(0, 0, 4)));
        assert!(config.has_level_below(2));
        assert!(!config.has_level_below(3));
    }
}
