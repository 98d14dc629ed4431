//! Biome classification and per-biome tile palettes.
//!
//! A surface chunk gets one biome from 1-octave noise sampled at its chunk
//! coordinate. The biome's palette is a cumulative-weight lottery: each tile
//! draws a key in [0, 100] from terrain noise, and the first palette entry
//! whose running weight reaches the key wins. Blocking tiles sit at the low
//! and high ends of every palette so mid-range noise stays walkable.

use serde::{Deserialize, Serialize};

use crate::tile::TileType;

/// Terrain classification of a chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Marsh,
    Plains,
    Forest,
    Hills,
    Mountains,
    /// Every dungeon chunk
    Underground,
}

/// Upper bounds (exclusive) of the grayscale bands for the surface biomes.
///
/// One-octave noise clusters around the middle of the range, so the middle
/// bands are narrower than the outer ones.
const BIOME_BANDS: [(u8, Biome); 4] = [
    (90, Biome::Marsh),
    (115, Biome::Plains),
    (140, Biome::Forest),
    (165, Biome::Hills),
];

impl Biome {
    /// Map a grayscale noise value into one of the five surface biomes
    pub fn classify(gray: u8) -> Biome {
        BIOME_BANDS
            .iter()
            .find(|(upper, _)| gray < *upper)
            .map_or(Biome::Mountains, |(_, biome)| *biome)
    }

    pub fn surface_biomes() -> &'static [Biome] {
        &[Biome::Marsh, Biome::Plains, Biome::Forest, Biome::Hills, Biome::Mountains]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Marsh => "Marsh",
            Biome::Plains => "Plains",
            Biome::Forest => "Forest",
            Biome::Hills => "Hills",
            Biome::Mountains => "Mountains",
            Biome::Underground => "Underground",
        }
    }

    /// Weighted tile palette (weights sum to 100)
    pub fn palette(&self) -> &'static [(TileType, u32)] {
        match self {
            Biome::Marsh => &[
                (TileType::DeepWater, 24),
                (TileType::ShallowWater, 12),
                (TileType::Mud, 20),
                (TileType::TallGrass, 18),
                (TileType::Grass, 12),
                (TileType::Tree, 14),
            ],
            Biome::Plains => &[
                (TileType::ShallowWater, 22),
                (TileType::Sand, 6),
                (TileType::Grass, 32),
                (TileType::Flowers, 8),
                (TileType::TallGrass, 12),
                (TileType::Tree, 20),
            ],
            Biome::Forest => &[
                (TileType::ShallowWater, 20),
                (TileType::Dirt, 8),
                (TileType::Grass, 24),
                (TileType::Tree, 6),
                (TileType::TallGrass, 18),
                (TileType::Tree, 24),
            ],
            Biome::Hills => &[
                (TileType::Dirt, 24),
                (TileType::Grass, 28),
                (TileType::Rock, 6),
                (TileType::TallGrass, 16),
                (TileType::Dirt, 6),
                (TileType::Rock, 20),
            ],
            Biome::Mountains => &[
                (TileType::Rock, 26),
                (TileType::Dirt, 14),
                (TileType::Snow, 24),
                (TileType::Rock, 6),
                (TileType::Snow, 10),
                (TileType::Rock, 20),
            ],
            Biome::Underground => &[(TileType::Wall, 100)],
        }
    }

    /// Draw a tile type from the palette using `key` in [0, 100]
    pub fn draw(&self, key: u32) -> TileType {
        let palette = self.palette();
        let mut cumulative = 0;
        for (tile, weight) in palette {
            cumulative += weight;
            if key <= cumulative {
                return *tile;
            }
        }
        palette.last().map_or(TileType::Grass, |(tile, _)| *tile)
    }

    /// Blocking tile used to fill in unreachable pockets
    pub fn filler(&self) -> TileType {
        match self {
            Biome::Marsh => TileType::DeepWater,
            Biome::Plains | Biome::Forest => TileType::Tree,
            Biome::Hills | Biome::Mountains => TileType::Rock,
            Biome::Underground => TileType::Wall,
        }
    }

    /// Walkable ground used for carved paths
    pub fn path(&self) -> TileType {
        match self {
            Biome::Marsh | Biome::Hills | Biome::Mountains => TileType::Dirt,
            Biome::Plains | Biome::Forest => TileType::Grass,
            Biome::Underground => TileType::Floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_sum_to_100() {
        for biome in Biome::surface_biomes() {
            let total: u32 = biome.palette().iter().map(|(_, w)| w).sum();
            assert_eq!(total, 100, "{:?}", biome);
        }
    }

    #[test]
    fn test_classify_bands_are_contiguous() {
        assert_eq!(Biome::classify(0), Biome::Marsh);
        assert_eq!(Biome::classify(89), Biome::Marsh);
        assert_eq!(Biome::classify(90), Biome::Plains);
        assert_eq!(Biome::classify(120), Biome::Forest);
        assert_eq!(Biome::classify(150), Biome::Hills);
        assert_eq!(Biome::classify(255), Biome::Mountains);

        let mut seen = std::collections::HashSet::new();
        for gray in 0..=255u8 {
            seen.insert(Biome::classify(gray));
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_draw_follows_cumulative_weights() {
        assert_eq!(Biome::Plains.draw(0), TileType::ShallowWater);
        assert_eq!(Biome::Plains.draw(22), TileType::ShallowWater);
        assert_eq!(Biome::Plains.draw(23), TileType::Sand);
        assert_eq!(Biome::Plains.draw(50), TileType::Grass);
        assert_eq!(Biome::Plains.draw(100), TileType::Tree);
    }

    #[test]
    fn test_mid_range_is_walkable() {
        for biome in Biome::surface_biomes() {
            assert!(biome.draw(50).is_passable(), "{:?}", biome);
            assert!(!biome.filler().is_passable());
            assert!(biome.path().is_passable());
        }
    }
}
