//! L-shaped corridors.
//!
//! A corridor walks the axis with the larger delta first, then the other,
//! turning exactly once. Staircase tiles on the path are left untouched.

use crate::chunk::Chunk;
use crate::coords::Coordinate;
use crate::tile::TileType;

/// Carve an L-shaped corridor from `from` to `to` (both inclusive).
///
/// Returns the number of tiles written.
pub fn carve_l(chunk: &mut Chunk, from: Coordinate, to: Coordinate, kind: TileType) -> usize {
    let mut written = 0;
    for p in l_path(from, to) {
        if chunk.kind(p).is_some_and(|k| k.is_staircase()) {
            continue;
        }
        if chunk.put(p, kind) {
            written += 1;
        }
    }
    written
}

/// Positions of the L-shaped path from `from` to `to`, in walking order
pub fn l_path(from: Coordinate, to: Coordinate) -> Vec<Coordinate> {
    let dx = to.x.abs_diff(from.x);
    let dy = to.y.abs_diff(from.y);
    let mut path = Vec::with_capacity((dx + dy + 1) as usize);

    let corner = if dx >= dy {
        Coordinate::tile(to.x, from.y)
    } else {
        Coordinate::tile(from.x, to.y)
    };

    push_line(&mut path, from, corner);
    push_line(&mut path, corner, to);
    path.push(to);
    path
}

/// Straight line from `a` up to but excluding `b`
fn push_line(path: &mut Vec<Coordinate>, a: Coordinate, b: Coordinate) {
    let step_x = (b.x - a.x).signum();
    let step_y = (b.y - a.y).signum();
    let mut p = a;
    while p.x != b.x || p.y != b.y {
        path.push(p);
        p = Coordinate::tile(p.x + step_x, p.y + step_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_turns_once_along_larger_axis_first() {
        let path = l_path(Coordinate::tile(2, 2), Coordinate::tile(8, 4));
        assert_eq!(path.len(), 6 + 2 + 1);
        assert_eq!(path[0], Coordinate::tile(2, 2));
        // x first: the row stays at y = 2 up to the corner
        assert!(path[..7].iter().all(|p| p.y == 2));
        assert_eq!(path[6], Coordinate::tile(8, 2));
        assert_eq!(*path.last().unwrap(), Coordinate::tile(8, 4));

        let path = l_path(Coordinate::tile(5, 1), Coordinate::tile(3, 9));
        // y first
        assert!(path[..9].iter().all(|p| p.x == 5));
        assert_eq!(*path.last().unwrap(), Coordinate::tile(3, 9));
    }

    #[test]
    fn test_path_is_contiguous() {
        let path = l_path(Coordinate::tile(70, 20), Coordinate::tile(3, 1));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(&pair[1]), 1);
        }
        assert_eq!(l_path(Coordinate::tile(4, 4), Coordinate::tile(4, 4)), vec![Coordinate::tile(4, 4)]);
    }

    #[test]
    fn test_carve_skips_staircases() {
        let mut chunk = Chunk::new(1, 0, Coordinate::new(0, 0, 1), TileType::Wall);
        chunk.put(Coordinate::tile(5, 5), TileType::StairsUp);
        let written = carve_l(&mut chunk, Coordinate::tile(1, 5), Coordinate::tile(9, 5), TileType::Floor);
        assert_eq!(written, 8);
        assert_eq!(chunk.kind(Coordinate::tile(5, 5)), Some(TileType::StairsUp));
        assert_eq!(chunk.kind(Coordinate::tile(9, 5)), Some(TileType::Floor));
    }
}
