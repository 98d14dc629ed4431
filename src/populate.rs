//! Item and monster placement on finished chunks.
//!
//! Populators run after full generation and only touch the overlays, never
//! terrain. They draw from the chunk's own random source, so a chunk
//! populates the same way every time it is generated.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::chunk::{Chunk, Monster};
use crate::config::{SpawnConfig, SpawnRange};
use crate::error::Result;
use crate::tile::Item;

/// Places entities on a fully generated chunk
pub trait Populator {
    fn name(&self) -> &'static str;

    fn populate(&self, chunk: &mut Chunk, spawns: &SpawnConfig) -> Result<()>;
}

const SURFACE_ITEMS: &[&str] = &["herb", "flint", "berries", "feather"];
const DUNGEON_ITEMS: &[&str] = &["torch", "gold coins", "rusty key", "potion", "scroll"];

const SURFACE_MONSTERS: &[&str] = &["wolf", "boar", "bandit"];
const DUNGEON_MONSTERS: &[&str] = &["rat", "goblin", "skeleton", "cave spider"];

fn draw_count(chunk: &mut Chunk, range: SpawnRange) -> u32 {
    chunk.rng().gen_range(range.min..=range.max)
}

fn draw_name(chunk: &mut Chunk, names: &[&'static str]) -> &'static str {
    names.choose(chunk.rng()).copied().unwrap_or("curio")
}

/// Drops items on random passable tiles
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemScatter;

impl Populator for ItemScatter {
    fn name(&self) -> &'static str {
        "items"
    }

    fn populate(&self, chunk: &mut Chunk, spawns: &SpawnConfig) -> Result<()> {
        let names = if chunk.coord().is_surface() { SURFACE_ITEMS } else { DUNGEON_ITEMS };
        let count = draw_count(chunk, spawns.items);
        for _ in 0..count {
            let at = chunk.random_passable_tile()?;
            let name = draw_name(chunk, names);
            chunk.add_item(at, Item::new(name));
        }
        debug!("Dropped {} items in chunk {}", count, chunk.coord());
        Ok(())
    }
}

/// Places monsters on passable tiles that are free of monsters and stairs
#[derive(Clone, Copy, Debug, Default)]
pub struct MonsterScatter;

impl Populator for MonsterScatter {
    fn name(&self) -> &'static str {
        "monsters"
    }

    fn populate(&self, chunk: &mut Chunk, spawns: &SpawnConfig) -> Result<()> {
        let names = if chunk.coord().is_surface() { SURFACE_MONSTERS } else { DUNGEON_MONSTERS };
        let count = draw_count(chunk, spawns.monsters);
        let mut placed = 0;
        for _ in 0..count {
            // A crowded chunk just gets fewer monsters
            let Some(position) = chunk.random_unoccupied_tile() else { break };
            let name = draw_name(chunk, names);
            chunk.monsters.push(Monster {
                name: name.to_string(),
                position,
            });
            placed += 1;
        }
        debug!("Placed {} monsters in chunk {}", placed, chunk.coord());
        Ok(())
    }
}

/// Item scatter followed by monster scatter
pub fn default_populators() -> Vec<Box<dyn Populator>> {
    vec![Box::new(ItemScatter), Box::new(MonsterScatter)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Coordinate;
    use crate::tile::TileType;

    fn floor_chunk(z: i32) -> Chunk {
        let mut chunk = Chunk::new(9, 0, Coordinate::new(0, 0, z), TileType::Wall);
        for x in 10..20 {
            chunk.put(Coordinate::tile(x, 5), TileType::Floor);
        }
        chunk
    }

    #[test]
    fn test_items_land_on_passable_tiles() {
        let mut chunk = floor_chunk(1);
        let spawns = SpawnConfig {
            items: SpawnRange::new(3, 3),
            monsters: SpawnRange::new(0, 0),
        };
        ItemScatter.populate(&mut chunk, &spawns).unwrap();

        let total: usize = chunk.tiles().iter().map(|t| t.items.len()).sum();
        assert_eq!(total, 3);
        for tile in chunk.tiles().iter().filter(|t| t.has_items()) {
            assert!(tile.is_passable());
            assert!(DUNGEON_ITEMS.contains(&tile.items[0].name.as_str()));
        }
    }

    #[test]
    fn test_items_need_a_passable_tile() {
        let mut chunk = Chunk::new(9, 0, Coordinate::new(0, 0, 1), TileType::Wall);
        let spawns = SpawnConfig {
            items: SpawnRange::new(1, 1),
            monsters: SpawnRange::new(0, 0),
        };
        assert!(ItemScatter.populate(&mut chunk, &spawns).is_err());
    }

    #[test]
    fn test_monsters_never_share_a_tile() {
        let mut chunk = floor_chunk(1);
        chunk.put(Coordinate::tile(10, 5), TileType::StairsDown);
        let spawns = SpawnConfig {
            items: SpawnRange::new(0, 0),
            monsters: SpawnRange::new(20, 20),
        };
        MonsterScatter.populate(&mut chunk, &spawns).unwrap();

        // Nine free floor tiles, the staircase excluded
        assert_eq!(chunk.monsters.len(), 9);
        let mut positions: Vec<Coordinate> = chunk.monsters.iter().map(|m| m.position).collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 9);
        assert!(chunk.monster_at(Coordinate::tile(10, 5)).is_none());
    }

    #[test]
    fn test_population_is_deterministic() {
        let spawns = SpawnConfig::default();
        let mut a = floor_chunk(0);
        let mut b = floor_chunk(0);
        for populator in default_populators() {
            populator.populate(&mut a, &spawns).unwrap();
            populator.populate(&mut b, &spawns).unwrap();
        }
        assert_eq!(a.monsters, b.monsters);
        assert_eq!(a.tiles(), b.tiles());
    }
}
