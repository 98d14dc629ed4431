//! ASCII rendering and export of chunks
//!
//! Renders tile grids as text, optionally with the item and monster overlay
//! or with ANSI colors, and writes them to files.

use std::fs::File;
use std::io::{self, Write};

use crate::chunk::{Chunk, StructureKind, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::coords::Coordinate;
use crate::tile::TileType;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Terrain glyphs only
    Terrain,
    /// Terrain with monsters and items drawn on top
    Overlay,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Overlay => "Overlay",
        }
    }
}

/// Glyph for a monster, by the first letter of its name
fn monster_char(name: &str) -> char {
    name.chars().next().map_or('M', |c| c.to_ascii_uppercase())
}

const ITEM_CHAR: char = '$';

/// Glyph at one position for the given mode
pub fn glyph_at(chunk: &Chunk, p: Coordinate, mode: AsciiMode) -> char {
    let Some(tile) = chunk.get(p) else { return ' ' };
    if mode == AsciiMode::Overlay {
        if let Some(monster) = chunk.monster_at(p) {
            return monster_char(&monster.name);
        }
        if tile.has_items() {
            return ITEM_CHAR;
        }
    }
    tile.kind.glyph()
}

/// One line of glyphs
fn render_row(chunk: &Chunk, y: i32, mode: AsciiMode) -> String {
    (0..CHUNK_WIDTH).map(|x| glyph_at(chunk, Coordinate::tile(x, y), mode)).collect()
}

/// Render a chunk as 24 lines of 80 glyphs joined by newlines
pub fn render_chunk(chunk: &Chunk, mode: AsciiMode) -> String {
    (0..CHUNK_HEIGHT)
        .map(|y| render_row(chunk, y, mode))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terrain-only tile string; equal strings mean equal terrain
pub fn tile_string(chunk: &Chunk) -> String {
    render_chunk(chunk, AsciiMode::Terrain)
}

/// Render a rectangle of chunks side by side, row by row.
///
/// `rows` holds chunk rows top to bottom; a missing chunk renders blank.
pub fn render_area(rows: &[Vec<Option<&Chunk>>], mode: AsciiMode, color: bool) -> String {
    let mut result = String::new();
    for row in rows {
        for y in 0..CHUNK_HEIGHT {
            for chunk in row {
                match chunk {
                    Some(chunk) if color => result.push_str(&render_colored_row(chunk, y, mode)),
                    Some(chunk) => result.push_str(&render_row(chunk, y, mode)),
                    None => result.extend(std::iter::repeat(' ').take(CHUNK_WIDTH as usize)),
                }
            }
            result.push('\n');
        }
    }
    result
}

/// Format a string with ANSI true color (24-bit), foreground only
pub fn ansi_fg_colored(text: &str, fg: (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", fg.0, fg.1, fg.2, text)
}

/// One line of glyphs, each in its tile color. Overlay glyphs are white.
fn render_colored_row(chunk: &Chunk, y: i32, mode: AsciiMode) -> String {
    let mut result = String::new();
    for x in 0..CHUNK_WIDTH {
        let p = Coordinate::tile(x, y);
        let Some(tile) = chunk.get(p) else { continue };
        let ch = glyph_at(chunk, p, mode);
        let color = if ch == tile.kind.glyph() { tile.kind.color() } else { (255, 255, 255) };
        result.push_str(&ansi_fg_colored(&ch.to_string(), color));
    }
    result
}

/// Render a chunk with each glyph in its tile color
pub fn render_colored_chunk(chunk: &Chunk, mode: AsciiMode) -> String {
    let mut result = String::new();
    for y in 0..CHUNK_HEIGHT {
        result.push_str(&render_colored_row(chunk, y, mode));
        result.push('\n');
    }
    result
}

/// Legend for tile glyphs
pub fn legend() -> String {
    const SHOWN: &[(TileType, &str)] = &[
        (TileType::Grass, "Grass"),
        (TileType::TallGrass, "Tall grass"),
        (TileType::Flowers, "Flowers"),
        (TileType::Dirt, "Dirt"),
        (TileType::Sand, "Sand"),
        (TileType::Mud, "Mud"),
        (TileType::Snow, "Snow"),
        (TileType::ShallowWater, "Shallow water"),
        (TileType::DeepWater, "Deep water"),
        (TileType::Tree, "Tree"),
        (TileType::Rock, "Rock"),
        (TileType::Cobblestone, "Cobblestone"),
        (TileType::RuinWall, "Ruin wall"),
        (TileType::Floor, "Floor"),
        (TileType::Wall, "Wall"),
        (TileType::StairsDown, "Stairs down"),
        (TileType::StairsUp, "Stairs up"),
    ];

    let mut legend = String::from("=== LEGEND ===\n");
    for (kind, name) in SHOWN {
        legend.push_str(&format!("  {} {}\n", kind.glyph(), name));
    }
    legend.push_str(&format!("  {} Item\n", ITEM_CHAR));
    legend
}

/// One-line description of a chunk
pub fn summary(chunk: &Chunk) -> String {
    let landmarks: Vec<&str> = chunk
        .structures
        .iter()
        .filter_map(|s| match &s.kind {
            StructureKind::Landmark(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let mut line = format!(
        "Chunk {} [{}] {} passable, {} down, {} up, {} monsters",
        chunk.coord(),
        chunk.biome.display_name(),
        chunk.passable_count(),
        chunk.down_staircases().len(),
        chunk.up_staircases().len(),
        chunk.monsters.len()
    );
    if !landmarks.is_empty() {
        line.push_str(&format!(", landmarks: {}", landmarks.join(", ")));
    }
    line
}

/// Write chunks, each with its summary, to a text file
pub fn export_chunks(chunks: &[&Chunk], seed: u64, path: &str, mode: AsciiMode) -> io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "=== DELVE WORLD EXPORT ===")?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Chunks: {}", chunks.len())?;
    writeln!(file, "Mode: {}", mode.name())?;
    writeln!(file)?;

    for chunk in chunks {
        writeln!(file, "{}", summary(chunk))?;
        writeln!(file, "{}", render_chunk(chunk, mode))?;
        writeln!(file)?;
    }

    write!(file, "{}", legend())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Monster;
    use crate::tile::Item;

    fn chunk() -> Chunk {
        let mut chunk = Chunk::new(1, 0, Coordinate::new(0, 0, 1), TileType::Wall);
        chunk.put(Coordinate::tile(1, 1), TileType::Floor);
        chunk.put(Coordinate::tile(2, 1), TileType::StairsDown);
        chunk
    }

    #[test]
    fn test_tile_string_shape() {
        let s = tile_string(&chunk());
        let lines: Vec<&str> = s.split('\n').collect();
        assert_eq!(lines.len(), 24);
        assert!(lines.iter().all(|l| l.chars().count() == 80));
        assert_eq!(&lines[1][..3], "#.>");
    }

    #[test]
    fn test_overlay_draws_monsters_then_items() {
        let mut chunk = chunk();
        chunk.add_item(Coordinate::tile(1, 1), Item::new("torch"));
        assert_eq!(glyph_at(&chunk, Coordinate::tile(1, 1), AsciiMode::Overlay), '$');
        assert_eq!(glyph_at(&chunk, Coordinate::tile(1, 1), AsciiMode::Terrain), '.');

        chunk.monsters.push(Monster {
            name: "goblin".to_string(),
            position: Coordinate::tile(1, 1),
        });
        assert_eq!(glyph_at(&chunk, Coordinate::tile(1, 1), AsciiMode::Overlay), 'G');
    }

    #[test]
    fn test_area_places_chunks_side_by_side() {
        let a = chunk();
        let rows = vec![vec![Some(&a), None]];
        let s = render_area(&rows, AsciiMode::Terrain, false);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 24);
        assert_eq!(lines[0].chars().count(), 160);
        assert!(lines[0].ends_with(' '));
    }

    #[test]
    fn test_colored_area_matches_colored_chunk() {
        let a = chunk();
        let rows = vec![vec![Some(&a)]];
        let s = render_area(&rows, AsciiMode::Terrain, true);
        assert!(s.contains("\x1b[38;2;"));
        assert_eq!(s, render_colored_chunk(&a, AsciiMode::Terrain));

        let floor = ansi_fg_colored(".", TileType::Floor.color());
        assert!(s.lines().nth(1).unwrap().contains(&floor));
    }

    #[test]
    fn test_export_writes_summary_and_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.txt");
        let c = chunk();
        export_chunks(&[&c], 42, path.to_str().unwrap(), AsciiMode::Terrain).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Seed: 42"));
        assert!(text.contains("Chunk (0,0,1)"));
        assert!(text.contains("=== LEGEND ==="));
    }
}
