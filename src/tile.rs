//! Tile types for surface and dungeon chunks.
//!
//! A tile type carries everything the rest of the game needs to know about
//! terrain: whether it can be walked on, what it costs to cross, and how it
//! is drawn.

use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;

/// Terrain type of a single tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    // Surface ground
    #[default]
    Grass,
    TallGrass,
    Flowers,
    Dirt,
    Sand,
    Mud,
    Snow,

    // Surface water
    ShallowWater,
    DeepWater,

    // Surface obstacles
    Tree,
    Rock,

    // Surface structures
    Cobblestone,
    RuinWall,

    // Dungeon
    Floor,
    Wall,

    // Level transitions
    StairsDown,
    StairsUp,
}

impl TileType {
    /// Check if this tile can be walked on
    pub fn is_passable(&self) -> bool {
        !matches!(
            self,
            TileType::DeepWater | TileType::Tree | TileType::Rock | TileType::RuinWall | TileType::Wall
        )
    }

    /// Movement cost (1 = normal); `None` for impassable tiles
    pub fn movement_cost(&self) -> Option<u32> {
        let cost = match self {
            TileType::Grass
            | TileType::Flowers
            | TileType::Dirt
            | TileType::Cobblestone
            | TileType::Floor
            | TileType::StairsDown
            | TileType::StairsUp => 1,
            TileType::TallGrass | TileType::Sand | TileType::Snow => 2,
            TileType::Mud | TileType::ShallowWater => 3,
            TileType::DeepWater | TileType::Tree | TileType::Rock | TileType::RuinWall | TileType::Wall => {
                return None
            }
        };
        Some(cost)
    }

    pub fn is_staircase(&self) -> bool {
        matches!(self, TileType::StairsDown | TileType::StairsUp)
    }

    /// ASCII character for terminal display
    pub fn glyph(&self) -> char {
        match self {
            TileType::Grass => '.',
            TileType::TallGrass => '"',
            TileType::Flowers => '*',
            TileType::Dirt => ',',
            TileType::Sand => ':',
            TileType::Mud => ';',
            TileType::Snow => '_',
            TileType::ShallowWater => '~',
            TileType::DeepWater => '=',
            TileType::Tree => 'T',
            TileType::Rock => '^',
            TileType::Cobblestone => '+',
            TileType::RuinWall => '&',
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::StairsDown => '>',
            TileType::StairsUp => '<',
        }
    }

    /// RGB color for rendering
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TileType::Grass => (90, 140, 60),
            TileType::TallGrass => (70, 120, 50),
            TileType::Flowers => (200, 120, 160),
            TileType::Dirt => (130, 100, 70),
            TileType::Sand => (210, 190, 140),
            TileType::Mud => (80, 65, 45),
            TileType::Snow => (245, 250, 255),
            TileType::ShallowWater => (80, 130, 180),
            TileType::DeepWater => (40, 80, 140),
            TileType::Tree => (40, 90, 35),
            TileType::Rock => (120, 115, 110),
            TileType::Cobblestone => (150, 145, 135),
            TileType::RuinWall => (100, 90, 80),
            TileType::Floor => (160, 150, 130),
            TileType::Wall => (60, 55, 50),
            TileType::StairsDown => (230, 200, 80),
            TileType::StairsUp => (230, 200, 80),
        }
    }
}

/// An item lying on a tile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single tile, owned by its chunk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileType,
    /// Local position inside the owning chunk
    pub coord: Coordinate,
    pub items: Vec<Item>,
}

impl Tile {
    pub fn new(kind: TileType, coord: Coordinate) -> Self {
        Self {
            kind,
            coord,
            items: Vec::new(),
        }
    }

    pub fn is_passable(&self) -> bool {
        self.kind.is_passable()
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_matches_passability() {
        let all = [
            TileType::Grass,
            TileType::TallGrass,
            TileType::Flowers,
            TileType::Dirt,
            TileType::Sand,
            TileType::Mud,
            TileType::Snow,
            TileType::ShallowWater,
            TileType::DeepWater,
            TileType::Tree,
            TileType::Rock,
            TileType::Cobblestone,
            TileType::RuinWall,
            TileType::Floor,
            TileType::Wall,
            TileType::StairsDown,
            TileType::StairsUp,
        ];
        for kind in all {
            assert_eq!(kind.is_passable(), kind.movement_cost().is_some(), "{:?}", kind);
        }
    }

    #[test]
    fn test_staircases_are_passable() {
        assert!(TileType::StairsDown.is_passable());
        assert!(TileType::StairsUp.is_passable());
        assert!(TileType::StairsUp.is_staircase());
        assert!(!TileType::Floor.is_staircase());
    }
}
