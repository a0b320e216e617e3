//! Grid coordinates and continuous world positions.
//!
//! The park is a rectangular grid of unit tiles.  `GridPos` addresses a tile;
//! `WorldPoint` is a continuous position in the same units (tile `(x, y)` is
//! centred at world `(x, y)`), used for lane nodes and visitor interpolation.

use std::fmt;

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four orthogonal neighbours of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed scan order used everywhere neighbours are enumerated.  Keeping a
    /// single order makes BFS results reproducible.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    /// `(dx, dy)` offset of this direction.  North is `y - 1`.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East  => (1, 0),
            Direction::South => (0, 1),
            Direction::West  => (-1, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East  => Direction::West,
            Direction::South => Direction::North,
            Direction::West  => Direction::East,
        }
    }

    /// Position in a `[T; 4]` side table.
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East  => 1,
            Direction::South => 2,
            Direction::West  => 3,
        }
    }

    /// Bit in a 4-bit neighbour mask (same numbering as [`slot`](Self::slot)).
    #[inline]
    pub fn bit(self) -> u8 {
        1 << self.slot()
    }
}

// ── GridPos ───────────────────────────────────────────────────────────────────

/// Integer tile coordinate.  Signed so that neighbour arithmetic at the grid
/// border produces an out-of-bounds coordinate instead of wrapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance — the metric used to bound tile searches.
    #[inline]
    pub fn distance_to(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The tile one step in `dir` (may be outside the grid).
    #[inline]
    pub fn step(self, dir: Direction) -> GridPos {
        let (dx, dy) = dir.offset();
        GridPos::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours in [`Direction::ALL`] order, unclipped.
    pub fn neighbors(self) -> [GridPos; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// `true` if `other` is exactly one orthogonal step away.
    #[inline]
    pub fn is_adjacent(self, other: GridPos) -> bool {
        self.distance_to(other) == 1
    }

    /// Centre of this tile in world space.
    #[inline]
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(self.x as f32, self.y as f32)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── WorldPoint ────────────────────────────────────────────────────────────────

/// Continuous 2-D position in tile units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in tile units.
    #[inline]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: WorldPoint, t: f32) -> WorldPoint {
        let t = t.clamp(0.0, 1.0);
        WorldPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Offset by `dist` tile units towards `dir`.
    #[inline]
    pub fn toward(self, dir: Direction, dist: f32) -> WorldPoint {
        let (dx, dy) = dir.offset();
        WorldPoint::new(self.x + dx as f32 * dist, self.y + dy as f32 * dist)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
