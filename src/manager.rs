//! Lazy chunk loading.
//!
//! `WorldManager::load_chunk` is the only way chunks get generated. It runs
//! the two phases in a fixed order:
//!
//! 1. Soft-generate every absent neighbor whose boundary facts the requested
//!    chunk reads: the four lateral neighbors and the level below, plus the
//!    level above for dungeon chunks.
//! 2. Fully generate the requested chunk and hand it to the populators.
//!
//! Phase 2 runs on a copy of the soft-generated chunk that is stored only
//! once everything succeeded, so a failed load leaves the world as it was.

use log::{debug, trace};

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::coords::{Coordinate, Direction};
use crate::dungeon;
use crate::error::{GenerationError, Result};
use crate::populate::{default_populators, Populator};
use crate::surface;
use crate::world::World;

/// Owns the world and drives generation
pub struct WorldManager {
    world: World,
    populators: Vec<Box<dyn Populator>>,
}

impl WorldManager {
    /// Validate the configuration and create an empty world
    pub fn new(config: WorldConfig) -> Result<Self> {
        Ok(Self::from_world(World::new(config)?))
    }

    pub fn from_world(world: World) -> Self {
        Self {
            world,
            populators: default_populators(),
        }
    }

    /// Replace the populators run after full generation
    pub fn with_populators(mut self, populators: Vec<Box<dyn Populator>>) -> Self {
        self.populators = populators;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Chunk at `coord` in whatever state it is in, if it exists
    pub fn get_chunk(&self, coord: Coordinate) -> Option<&Chunk> {
        self.world.get(&coord)
    }

    /// Return the fully generated chunk at `coord`, generating it first if
    /// needed. Loading a finished chunk again changes nothing.
    pub fn load_chunk(&mut self, coord: Coordinate) -> Result<&Chunk> {
        if !self.world.in_bounds(&coord) {
            return Err(GenerationError::OutOfBounds(coord));
        }

        if self.world.get(&coord).is_some_and(Chunk::is_fully_generated) {
            trace!("Chunk {} already generated", coord);
            // Present: checked just above. The second lookup ends the borrow
            // taken by the check before the mutating path below.
            return self.world.get(&coord).ok_or(GenerationError::OutOfBounds(coord));
        }

        for neighbor in Self::dependencies(coord) {
            self.soft_generate(neighbor)?;
        }
        self.soft_generate(coord)?;

        let mut chunk = self
            .world
            .get(&coord)
            .cloned()
            .ok_or(GenerationError::OutOfBounds(coord))?;

        if coord.is_surface() {
            surface::generate(&mut chunk, &self.world)?;
        } else {
            dungeon::generate(&mut chunk, &self.world)?;
        }

        let spawns = &self.world.config().spawns;
        for populator in &self.populators {
            populator.populate(&mut chunk, spawns)?;
            trace!("Ran {} populator on chunk {}", populator.name(), coord);
        }

        Ok(self.world.insert(chunk))
    }

    /// Load every chunk in a square of `radius` around `center` on one level,
    /// row by row. Chunks outside the world are skipped.
    pub fn load_area(&mut self, center: Coordinate, radius: i32) -> Result<Vec<Coordinate>> {
        let mut loaded = Vec::new();
        for y in center.y.saturating_sub(radius)..=center.y.saturating_add(radius) {
            for x in center.x.saturating_sub(radius)..=center.x.saturating_add(radius) {
                let coord = Coordinate::new(x, y, center.z);
                if !self.world.in_bounds(&coord) {
                    continue;
                }
                self.load_chunk(coord)?;
                loaded.push(coord);
            }
        }
        Ok(loaded)
    }

    /// Chunks whose committed facts full generation of `coord` reads.
    ///
    /// The level below is always included, the level above only for dungeon
    /// chunks.
    fn dependencies(coord: Coordinate) -> Vec<Coordinate> {
        let mut deps: Vec<Coordinate> = Direction::ALL.iter().map(|d| coord.neighbor(*d)).collect();
        deps.push(coord.below());
        deps.extend(coord.above());
        deps
    }

    /// Create and soft-generate the chunk at `coord` unless it exists or
    /// lies outside the world
    fn soft_generate(&mut self, coord: Coordinate) -> Result<()> {
        if self.world.contains(&coord) || !self.world.in_bounds(&coord) {
            return Ok(());
        }

        let mut chunk = self.world.new_chunk(coord);
        if coord.is_surface() {
            surface::soft_generate(&mut chunk, &self.world)?;
        } else {
            dungeon::soft_generate(&mut chunk, &self.world)?;
        }
        debug!("Committed boundary of chunk {}", coord);
        self.world.insert(chunk);
        Ok(())
    }
}
