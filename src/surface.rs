//! Surface generation (z = 0).
//!
//! Soft phase: classify the chunk's biome from 1-octave noise at the chunk
//! coordinate and decide whether it holds a dungeon entrance.
//!
//! Full phase:
//! 1. Draw every tile from the biome palette, keyed by 6-octave noise at the
//!    global tile position so terrain flows across chunk borders.
//! 2. Optionally stamp a structure template.
//! 3. Fill enclosed passable pockets below the minimum cluster size.
//! 4. Re-stamp the entrance and carve a path to it if it is boxed in.

use log::{debug, info, trace};
use rand::Rng;

use crate::biome::Biome;
use crate::chunk::{Chunk, ChunkState, StructureKind};
use crate::coords::Coordinate;
use crate::dungeon::corridor::carve_l;
use crate::error::{GenerationError, Result};
use crate::templates;
use crate::tile::TileType;
use crate::world::World;

/// Octaves used for biome classification
const BIOME_OCTAVES: u32 = 1;
/// Octaves used for per-tile terrain
const TERRAIN_OCTAVES: u32 = 6;

/// Commit the surface chunk's boundary-relevant facts
pub fn soft_generate(chunk: &mut Chunk, world: &World) -> Result<()> {
    if chunk.state() != ChunkState::Empty {
        return Ok(());
    }

    let coord = chunk.coord();
    let gray = world.biome_noise().sample(coord.x as i64, coord.y as i64, BIOME_OCTAVES);
    chunk.biome = Biome::classify(gray);

    let config = world.config();
    let has_dungeon = world.in_bounds(&coord.below());
    if has_dungeon && chunk.rng().gen_bool(config.surface.entrance_chance) {
        let entrance = chunk.random_interior(config.dungeon.stair_margin);
        chunk.put(entrance, TileType::StairsDown);
        chunk.add_structure(entrance, StructureKind::StairsDown);
    }

    debug!(
        "Soft-generated surface chunk {} ({}, {} entrance(s))",
        coord,
        chunk.biome.display_name(),
        chunk.down_staircases().len()
    );
    chunk.mark_soft_generated();
    Ok(())
}

/// Produce the final surface tile grid
pub fn generate(chunk: &mut Chunk, world: &World) -> Result<()> {
    if chunk.is_fully_generated() {
        return Err(GenerationError::AlreadyGenerated(chunk.coord()));
    }
    soft_generate(chunk, world)?;

    let coord = chunk.coord();
    let biome = chunk.biome;
    let config = world.config();

    fill_terrain(chunk, world);

    if chunk.rng().gen_bool(config.surface.structure_chance) {
        let template = templates::choose(chunk.rng());
        if let Some(origin) = template.stamp_random(chunk) {
            debug!("Stamped '{}' at {} in chunk {}", template.name, origin, coord);
        }
    }

    let filled = repair_clusters(chunk, config.surface.min_cluster_size);
    if filled > 0 {
        trace!("Filled {} isolated tiles in chunk {}", filled, coord);
    }

    if chunk.passable_count() == 0 {
        return Err(GenerationError::NoPassableTile(coord));
    }

    for entrance in chunk.down_staircases() {
        chunk.put(entrance, TileType::StairsDown);
        ensure_access(chunk, entrance, biome.path())?;
    }

    chunk.mark_fully_generated();
    info!("Generated surface chunk {} ({})", coord, biome.display_name());
    Ok(())
}

/// Draw every tile from the biome palette
fn fill_terrain(chunk: &mut Chunk, world: &World) {
    let coord = chunk.coord();
    let biome = chunk.biome;
    let noise = world.terrain_noise();

    for p in Chunk::positions() {
        let (gx, gy) = coord.global_tile(p);
        let key = noise.sample_percent(gx, gy, TERRAIN_OCTAVES);
        chunk.put(p, biome.draw(key));
    }
}

/// Fill passable clusters that are too small to matter and cannot lead
/// anywhere.
///
/// Clusters touching the chunk border may continue into the neighbor, and
/// the largest cluster is the chunk's main area; both are always kept.
/// Returns the number of tiles filled.
pub fn repair_clusters(chunk: &mut Chunk, min_cluster_size: usize) -> usize {
    let regions = chunk.passable_regions();
    let Some(largest) = regions
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
        .map(|(i, _)| i)
    else {
        return 0;
    };

    let filler = chunk.biome.filler();
    let mut filled = 0;
    for (i, region) in regions.iter().enumerate() {
        if i == largest || region.len() >= min_cluster_size {
            continue;
        }
        if region.iter().any(|p| Chunk::on_border(*p)) {
            continue;
        }
        for p in region {
            chunk.put(*p, filler);
            filled += 1;
        }
    }
    filled
}

/// Make sure a staircase has a walkable, non-staircase neighbor by carving
/// a path to the nearest one.
fn ensure_access(chunk: &mut Chunk, stairs: Coordinate, path: TileType) -> Result<()> {
    if chunk.has_accessible_neighbor(stairs) {
        return Ok(());
    }
    let target = chunk
        .find_nearest(stairs, |t| t.is_passable() && !t.kind.is_staircase())
        .ok_or(GenerationError::NoPassableTile(chunk.coord()))?;
    let carved = carve_l(chunk, stairs, target, path);
    trace!("Carved {} path tiles from entrance {} to {}", carved, stairs, target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn world(config: WorldConfig) -> World {
        World::new(config).unwrap()
    }

    #[test]
    fn test_soft_generation_is_idempotent() {
        let world = world(WorldConfig::with_seed(42));
        let mut chunk = world.new_chunk(Coordinate::new(3, -2, 0));
        soft_generate(&mut chunk, &world).unwrap();
        let biome = chunk.biome;
        let stairs = chunk.down_staircases();
        soft_generate(&mut chunk, &world).unwrap();
        assert_eq!(chunk.biome, biome);
        assert_eq!(chunk.down_staircases(), stairs);
        assert_eq!(chunk.state(), ChunkState::SoftGenerated);
    }

    #[test]
    fn test_full_generation_is_deterministic() {
        let world = world(WorldConfig::with_seed(42));
        let mut a = world.new_chunk(Coordinate::new(0, 0, 0));
        let mut b = world.new_chunk(Coordinate::new(0, 0, 0));
        generate(&mut a, &world).unwrap();
        generate(&mut b, &world).unwrap();
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.structures, b.structures);
        assert!(a.is_fully_generated());
    }

    #[test]
    fn test_generated_chunk_is_walkable() {
        let world = world(WorldConfig::with_seed(7));
        for x in -3..3 {
            let mut chunk = world.new_chunk(Coordinate::new(x, x * 2, 0));
            generate(&mut chunk, &world).unwrap();
            assert!(chunk.passable_count() > 0);
        }
    }

    #[test]
    fn test_entrance_is_accessible() {
        let mut config = WorldConfig::with_seed(11);
        config.surface.entrance_chance = 1.0;
        let world = world(config);
        for y in 0..6 {
            let mut chunk = world.new_chunk(Coordinate::new(1, y, 0));
            generate(&mut chunk, &world).unwrap();
            let entrances = chunk.down_staircases();
            assert_eq!(entrances.len(), 1);
            let p = entrances[0];
            assert_eq!(chunk.kind(p), Some(TileType::StairsDown));
            assert!(chunk.has_accessible_neighbor(p));
        }
    }

    #[test]
    fn test_no_entrance_without_dungeon() {
        let mut config = WorldConfig::with_seed(11);
        config.surface.entrance_chance = 1.0;
        config.dungeon.max_depth = Some(0);
        let world = world(config);
        let mut chunk = world.new_chunk(Coordinate::new(0, 0, 0));
        generate(&mut chunk, &world).unwrap();
        assert!(chunk.down_staircases().is_empty());
    }

    #[test]
    fn test_repair_fills_enclosed_pockets_only() {
        let world = world(WorldConfig::default());
        let mut chunk = world.new_chunk(Coordinate::new(0, 0, 0));
        chunk.biome = Biome::Hills;
        for p in Chunk::positions() {
            chunk.put(p, TileType::Rock);
        }
        // Main area
        for x in 10..40 {
            chunk.put(Coordinate::tile(x, 10), TileType::Grass);
        }
        // Enclosed pocket of 2
        chunk.put(Coordinate::tile(60, 10), TileType::Grass);
        chunk.put(Coordinate::tile(61, 10), TileType::Grass);
        // Small pocket touching the border
        chunk.put(Coordinate::tile(0, 5), TileType::Grass);

        let filled = repair_clusters(&mut chunk, 12);
        assert_eq!(filled, 2);
        assert_eq!(chunk.kind(Coordinate::tile(60, 10)), Some(TileType::Rock));
        assert_eq!(chunk.kind(Coordinate::tile(0, 5)), Some(TileType::Grass));
        assert_eq!(chunk.kind(Coordinate::tile(20, 10)), Some(TileType::Grass));
    }

    #[test]
    fn test_repair_keeps_largest_cluster() {
        let world = world(WorldConfig::default());
        let mut chunk = world.new_chunk(Coordinate::new(0, 0, 0));
        chunk.biome = Biome::Plains;
        for p in Chunk::positions() {
            chunk.put(p, TileType::Tree);
        }
        chunk.put(Coordinate::tile(30, 10), TileType::Grass);
        assert_eq!(repair_clusters(&mut chunk, 12), 0);
        assert_eq!(chunk.passable_count(), 1);
    }

    #[test]
    fn test_regenerating_full_chunk_is_rejected() {
        let world = world(WorldConfig::default());
        let mut chunk = world.new_chunk(Coordinate::new(0, 0, 0));
        generate(&mut chunk, &world).unwrap();
        assert!(matches!(generate(&mut chunk, &world), Err(GenerationError::AlreadyGenerated(_))));
    }
}
