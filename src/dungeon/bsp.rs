//! Binary Space Partitioning (BSP) for room layout.
//!
//! Generic over rectangles: nothing here knows about tiles. A tree is built
//! and consumed inside one dungeon-chunk generation call.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::coords::Coordinate;
use crate::error::ConfigError;

/// Axis-aligned rectangle, used both as a BSP box and as a carved room
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub origin: Coordinate,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Coordinate::tile(x, y),
            width,
            height,
        }
    }

    pub fn contains(&self, p: Coordinate) -> bool {
        p.x >= self.origin.x
            && p.x < self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y < self.origin.y + self.height
    }

    /// Every position inside, row-major
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (self.origin.y..self.origin.y + self.height)
            .flat_map(move |y| (self.origin.x..self.origin.x + self.width).map(move |x| Coordinate::tile(x, y)))
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// Check if `inner` lies entirely inside this rectangle
    pub fn encloses(&self, inner: &Room) -> bool {
        inner.origin.x >= self.origin.x
            && inner.origin.y >= self.origin.y
            && inner.origin.x + inner.width <= self.origin.x + self.width
            && inner.origin.y + inner.height <= self.origin.y + self.height
    }
}

/// BSP tree node
#[derive(Clone, Debug)]
pub enum Node {
    /// Unsplit box, with the room carved inside it once placed
    Leaf { bounds: Room, room: Option<Room> },
    /// Box split into two children
    Parent { bounds: Room, left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Parent { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Leaf boxes, left to right
    pub fn leaves(&self) -> Vec<Room> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Room>) {
        match self {
            Node::Leaf { bounds, .. } => out.push(*bounds),
            Node::Parent { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    /// Rooms placed in this subtree, left to right
    pub fn rooms(&self) -> Vec<Room> {
        let mut out = Vec::new();
        self.collect_rooms(&mut out);
        out
    }

    fn collect_rooms(&self, out: &mut Vec<Room>) {
        match self {
            Node::Leaf { room, .. } => out.extend(room.iter().copied()),
            Node::Parent { left, right, .. } => {
                left.collect_rooms(out);
                right.collect_rooms(out);
            }
        }
    }
}

/// Direction of a cut
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cut {
    /// Horizontal line: top and bottom halves
    Horizontal,
    /// Vertical line: left and right halves
    Vertical,
}

/// Recursively split `bounds` into at most `max_leaves` leaves, none smaller
/// than `min_width` × `min_height`.
///
/// Each box picks a random cut direction and falls back to the other one
/// when the first cannot keep both halves at minimum size. A box where
/// neither works, or where the leaf budget is spent, stays a leaf.
pub fn split(
    bounds: Room,
    min_width: i32,
    min_height: i32,
    max_leaves: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Node, ConfigError> {
    if min_width <= 0 || min_height <= 0 {
        return Err(ConfigError::NonPositiveRoomSize {
            width: min_width,
            height: min_height,
        });
    }
    if max_leaves == 0 {
        return Err(ConfigError::ZeroMaxLeaves);
    }

    let mut leaves = 1;
    Ok(split_node(bounds, min_width, min_height, max_leaves, &mut leaves, rng))
}

fn split_node(
    bounds: Room,
    min_width: i32,
    min_height: i32,
    max_leaves: usize,
    leaves: &mut usize,
    rng: &mut ChaCha8Rng,
) -> Node {
    if *leaves >= max_leaves {
        return Node::Leaf { bounds, room: None };
    }

    let first = if rng.gen_bool(0.5) { Cut::Horizontal } else { Cut::Vertical };
    let second = match first {
        Cut::Horizontal => Cut::Vertical,
        Cut::Vertical => Cut::Horizontal,
    };

    for cut in [first, second] {
        if let Some((a, b)) = try_cut(&bounds, cut, min_width, min_height, rng) {
            // One box becomes two
            *leaves += 1;
            let left = split_node(a, min_width, min_height, max_leaves, leaves, rng);
            let right = split_node(b, min_width, min_height, max_leaves, leaves, rng);
            return Node::Parent {
                bounds,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    Node::Leaf { bounds, room: None }
}

fn try_cut(bounds: &Room, cut: Cut, min_width: i32, min_height: i32, rng: &mut ChaCha8Rng) -> Option<(Room, Room)> {
    let Room { origin, width, height } = *bounds;
    match cut {
        Cut::Vertical => {
            if width < min_width * 2 {
                return None;
            }
            let at = rng.gen_range(min_width..=width - min_width);
            Some((
                Room::new(origin.x, origin.y, at, height),
                Room::new(origin.x + at, origin.y, width - at, height),
            ))
        }
        Cut::Horizontal => {
            if height < min_height * 2 {
                return None;
            }
            let at = rng.gen_range(min_height..=height - min_height);
            Some((
                Room::new(origin.x, origin.y, width, at),
                Room::new(origin.x, origin.y + at, width, height - at),
            ))
        }
    }
}

/// Place one room inside every leaf, keeping `margin` tiles of the leaf
/// box free on each side when the box is large enough.
pub fn place_rooms(node: &mut Node, margin: i32, rng: &mut ChaCha8Rng) {
    match node {
        Node::Leaf { bounds, room } => {
            *room = Some(room_in(bounds, margin, rng));
        }
        Node::Parent { left, right, .. } => {
            place_rooms(left, margin, rng);
            place_rooms(right, margin, rng);
        }
    }
}

fn room_in(bounds: &Room, margin: i32, rng: &mut ChaCha8Rng) -> Room {
    let (x, width) = span_in(bounds.origin.x, bounds.width, margin, rng);
    let (y, height) = span_in(bounds.origin.y, bounds.height, margin, rng);
    Room::new(x, y, width, height)
}

/// Random sub-span of [start, start + len) of at least half the usable length
fn span_in(start: i32, len: i32, margin: i32, rng: &mut ChaCha8Rng) -> (i32, i32) {
    let usable = (len - margin * 2).max(1);
    let size = rng.gen_range((usable + 1) / 2..=usable);
    let slack = len - size;
    let offset = if slack >= margin * 2 {
        rng.gen_range(margin..=slack - margin)
    } else {
        slack / 2
    };
    (start + offset, size)
}
