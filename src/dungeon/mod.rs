//! Dungeon generation (z > 0).
//!
//! Soft phase: commit the down-staircase (unless this is the bottom level)
//! and one crossing offset per edge.
//!
//! Full phase, which needs every in-bounds neighbor soft-generated:
//! 1. BSP the chunk rectangle and carve one room per leaf
//! 2. Connect siblings bottom-up with L-shaped corridors
//! 3. Stitch each edge to the crossing both sides agree on
//! 4. Copy the level above's down-staircases as up-staircases and make sure
//!    every staircase touches a floor tile

pub mod bsp;
pub mod corridor;

use log::{debug, info, trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::chunk::{Chunk, ChunkState, EdgeConnections, StructureKind, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::coords::{Coordinate, Direction};
use crate::error::{GenerationError, Result};
use crate::tile::TileType;
use crate::world::{BoundaryCommitments, World};

use bsp::{Node, Room};
use corridor::carve_l;

/// Tiles of a leaf box kept free around its room
const ROOM_MARGIN: i32 = 1;

/// Commit the dungeon chunk's boundary-relevant facts
pub fn soft_generate(chunk: &mut Chunk, world: &World) -> Result<()> {
    if chunk.state() != ChunkState::Empty {
        return Ok(());
    }

    let coord = chunk.coord();
    let config = world.config();
    let margin = config.dungeon.stair_margin;

    if config.has_level_below(coord.z) {
        let stairs = chunk.random_interior(margin);
        chunk.put(stairs, TileType::StairsDown);
        chunk.add_structure(stairs, StructureKind::StairsDown);
        trace!("Chunk {} descends at {}", coord, stairs);
    }

    let rng = chunk.rng();
    let edges = EdgeConnections {
        up: rng.gen_range(margin..=CHUNK_WIDTH - 1 - margin),
        down: rng.gen_range(margin..=CHUNK_WIDTH - 1 - margin),
        left: rng.gen_range(margin..=CHUNK_HEIGHT - 1 - margin),
        right: rng.gen_range(margin..=CHUNK_HEIGHT - 1 - margin),
    };
    chunk.edges = Some(edges);

    debug!("Soft-generated dungeon chunk {} (edges {:?})", coord, edges);
    chunk.mark_soft_generated();
    Ok(())
}

/// Produce the final dungeon tile grid
pub fn generate(chunk: &mut Chunk, world: &World) -> Result<()> {
    if chunk.is_fully_generated() {
        return Err(GenerationError::AlreadyGenerated(chunk.coord()));
    }
    soft_generate(chunk, world)?;

    let coord = chunk.coord();
    let commitments = world.boundary_commitments(coord)?;
    let dungeon = &world.config().dungeon;

    for p in Chunk::positions() {
        chunk.put(p, TileType::Wall);
    }

    // Rooms
    let bounds = Room::new(0, 0, CHUNK_WIDTH, CHUNK_HEIGHT);
    let mut tree = bsp::split(
        bounds,
        dungeon.min_room_width,
        dungeon.min_room_height,
        dungeon.max_leaves,
        chunk.rng(),
    )?;
    bsp::place_rooms(&mut tree, ROOM_MARGIN, chunk.rng());
    for room in tree.rooms() {
        for p in room.cells() {
            chunk.put(p, TileType::Floor);
        }
    }
    debug!("Chunk {} has {} rooms", coord, tree.leaf_count());

    connect(chunk, &tree)?;
    stitch(chunk, &commitments)?;
    place_staircases(chunk, &commitments)?;

    chunk.mark_fully_generated();
    info!(
        "Generated dungeon chunk {} ({} floor tiles)",
        coord,
        chunk.passable_count()
    );
    Ok(())
}

// =============================================================================
// Room connection
// =============================================================================

/// Join the two halves of every parent node, children first
fn connect(chunk: &mut Chunk, node: &Node) -> Result<()> {
    let Node::Parent { left, right, .. } = node else {
        return Ok(());
    };
    connect(chunk, left)?;
    connect(chunk, right)?;

    let a = random_floor_in(chunk, &left.rooms())?;
    let b = random_floor_in(chunk, &right.rooms())?;
    let carved = carve_l(chunk, a, b, TileType::Floor);
    trace!("Corridor {} -> {} ({} tiles)", a, b, carved);
    Ok(())
}

/// Random floor tile inside any of `rooms`
fn random_floor_in(chunk: &mut Chunk, rooms: &[Room]) -> Result<Coordinate> {
    let floors: Vec<Coordinate> = rooms
        .iter()
        .flat_map(|r| r.cells())
        .filter(|p| chunk.kind(*p) == Some(TileType::Floor))
        .collect();
    floors
        .choose(chunk.rng())
        .copied()
        .ok_or(GenerationError::EmptyRoomSpace(chunk.coord()))
}

// =============================================================================
// Cross-chunk stitching
// =============================================================================

/// Crossing offset both sides of an edge compute identically.
///
/// Symmetric in its arguments and kept off the corner tiles.
pub fn crossing_offset(mine: i32, theirs: i32, edge_len: i32) -> i32 {
    (mine - theirs).abs().clamp(1, edge_len - 2)
}

/// Carve from each committed crossing to the nearest interior floor
fn stitch(chunk: &mut Chunk, commitments: &BoundaryCommitments) -> Result<()> {
    let coord = chunk.coord();
    let Some(edges) = chunk.edges else {
        return Err(GenerationError::NeighborNotSoftGenerated {
            chunk: coord,
            neighbor: coord,
        });
    };

    for direction in Direction::ALL {
        let Some(theirs) = commitments.get(direction) else {
            debug!("Chunk {} has no {} neighbor; edge stays closed", coord, direction.name());
            continue;
        };

        let offset = crossing_offset(edges.get(direction), theirs, direction.edge_len());
        let crossing = direction.edge_tile(offset);
        let inward = inward_of(crossing, direction);

        chunk.put(crossing, TileType::Floor);
        let target = nearest_interior_floor(chunk, inward)?;
        let carved = carve_l(chunk, inward, target, TileType::Floor);
        trace!(
            "Stitched {} edge of {} at {} ({} tiles)",
            direction.name(),
            coord,
            crossing,
            carved
        );
    }
    Ok(())
}

/// One step from an edge tile into the chunk
fn inward_of(edge: Coordinate, direction: Direction) -> Coordinate {
    let (dx, dy) = direction.offset();
    Coordinate::tile(edge.x - dx, edge.y - dy)
}

/// Nearest floor tile not on the chunk border.
///
/// Border tiles are reserved for crossings, so paths routed to an interior
/// target never run along an edge.
fn nearest_interior_floor(chunk: &Chunk, from: Coordinate) -> Result<Coordinate> {
    chunk
        .find_nearest(from, |t| t.kind == TileType::Floor && !Chunk::on_border(t.coord))
        .ok_or(GenerationError::NoFloorTile(chunk.coord()))
}

// =============================================================================
// Staircases
// =============================================================================

/// Stamp up-staircases below the level above's down-staircases, restore our
/// own down-staircases, and connect any staircase that is boxed in.
fn place_staircases(chunk: &mut Chunk, commitments: &BoundaryCommitments) -> Result<()> {
    let own = chunk.down_staircases();

    for p in &commitments.stairs_above {
        if own.contains(p) {
            warn!("Chunk {} has up and down staircases at {}", chunk.coord(), p);
        } else {
            chunk.put(*p, TileType::StairsUp);
        }
        chunk.add_structure(*p, StructureKind::StairsUp);
    }
    for p in &own {
        chunk.put(*p, TileType::StairsDown);
    }

    let mut stairs = own;
    stairs.extend(commitments.stairs_above.iter().copied());
    stairs.sort();
    stairs.dedup();

    for p in stairs {
        if chunk.has_accessible_neighbor(p) {
            continue;
        }
        let target = nearest_interior_floor(chunk, p)?;
        let carved = carve_l(chunk, p, target, TileType::Floor);
        trace!("Connected staircase {} to {} ({} tiles)", p, target, carved);
    }
    Ok(())
}
