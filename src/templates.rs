//! Structure templates stamped onto surface chunks.
//!
//! Templates are small ASCII patterns. A blank cell leaves whatever tile was
//! already there.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::chunk::{Chunk, StructureKind, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::coords::Coordinate;
use crate::tile::TileType;

/// A pre-defined pattern of tiles
#[derive(Clone, Debug)]
pub struct StructureTemplate {
    pub name: &'static str,
    pub width: i32,
    pub height: i32,
    /// Row-major cells; `None` means "leave the existing tile"
    cells: Vec<Option<TileType>>,
}

impl StructureTemplate {
    /// Build a template from ASCII rows.
    ///
    /// `#` ruin wall, `+` cobblestone, `~` shallow water, `T` tree,
    /// `^` rock, `,` dirt, blank is empty.
    pub fn from_rows(name: &'static str, rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut cells = Vec::with_capacity((width * height) as usize);

        for row in rows {
            let mut chars = row.chars();
            for _ in 0..width {
                cells.push(chars.next().and_then(template_tile));
            }
        }

        Self {
            name,
            width,
            height,
            cells,
        }
    }

    /// Cell at template-local (x, y)
    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.cells[(y * self.width + x) as usize]
    }

    /// Stamp this template with its top-left corner at `origin`.
    ///
    /// Cells falling outside the chunk are dropped. Returns the number of
    /// tiles written.
    pub fn stamp(&self, chunk: &mut Chunk, origin: Coordinate) -> usize {
        let mut written = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(kind) = self.get(x, y) {
                    if chunk.put(Coordinate::tile(origin.x + x, origin.y + y), kind) {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Stamp at a random offset where the whole template fits, and record it
    pub fn stamp_random(&self, chunk: &mut Chunk) -> Option<Coordinate> {
        if self.width > CHUNK_WIDTH || self.height > CHUNK_HEIGHT {
            return None;
        }
        let x = chunk.rng().gen_range(0..=CHUNK_WIDTH - self.width);
        let y = chunk.rng().gen_range(0..=CHUNK_HEIGHT - self.height);
        let origin = Coordinate::tile(x, y);
        self.stamp(chunk, origin);
        chunk.add_structure(origin, StructureKind::Landmark(self.name.to_string()));
        Some(origin)
    }
}

fn template_tile(c: char) -> Option<TileType> {
    match c {
        '#' => Some(TileType::RuinWall),
        '+' => Some(TileType::Cobblestone),
        '~' => Some(TileType::ShallowWater),
        'T' => Some(TileType::Tree),
        '^' => Some(TileType::Rock),
        ',' => Some(TileType::Dirt),
        _ => None,
    }
}

/// All surface templates
pub fn catalogue() -> Vec<StructureTemplate> {
    vec![well(), shrine(), ruin(), camp()]
}

/// Pick a template from the catalogue using the chunk's random source
pub fn choose(rng: &mut ChaCha8Rng) -> StructureTemplate {
    let mut all = catalogue();
    let idx = rng.gen_range(0..all.len());
    all.swap_remove(idx)
}

pub fn well() -> StructureTemplate {
    StructureTemplate::from_rows("well", &[
        " +++ ",
        "++~++",
        " +++ ",
    ])
}

pub fn shrine() -> StructureTemplate {
    StructureTemplate::from_rows("shrine", &[
        "#+#",
        "+++",
        "#+#",
    ])
}

pub fn ruin() -> StructureTemplate {
    StructureTemplate::from_rows("ruin", &[
        "## ##",
        "#+++ ",
        " +++#",
        "## ##",
    ])
}

pub fn camp() -> StructureTemplate {
    StructureTemplate::from_rows("camp", &[
        " ,,, ",
        ",,^,,",
        " ,,, ",
    ])
}
