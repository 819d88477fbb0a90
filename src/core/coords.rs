//! Grid coordinates and wall addressing.
//!
//! ## Coordinates
//!
//! Cells are addressed 1-based, exactly as the event log records them:
//! `row ∈ 1..=rows`, `col ∈ 1..=cols`. North decreases the row, West
//! decreases the column.
//!
//! ## Wall keys
//!
//! A physical wall is shared by two cells. It can be named from either side:
//! `(2, 3, North)` and `(1, 3, South)` are the same wall. `WallKey::opposite`
//! converts between the two names.
//!
//! ```
//! use rescue_replay::core::{CellPos, Direction, WallKey};
//!
//! let key = WallKey::new(CellPos::new(2, 3), Direction::North);
//! assert_eq!(key.opposite(), WallKey::new(CellPos::new(1, 3), Direction::South));
//! assert_eq!(key.opposite().opposite(), key);
//! ```

use serde::{Deserialize, Serialize};

/// One of the four cardinal directions.
///
/// Declaration order matches the wall mask encoding (`NWSE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    West,
    South,
    East,
}

impl Direction {
    /// All directions in mask order.
    pub const ALL: [Direction; 4] = [Direction::North, Direction::West, Direction::South, Direction::East];

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Row/column delta of one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    /// Bit used for this direction in a `WallMask`.
    #[must_use]
    pub const fn mask_bit(self) -> u8 {
        match self {
            Direction::North => 0b1000,
            Direction::West => 0b0100,
            Direction::South => 0b0010,
            Direction::East => 0b0001,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::West => "west",
            Direction::South => "south",
            Direction::East => "east",
        };
        f.write_str(name)
    }
}

/// A cell position on the board (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: i32,
    pub col: i32,
}

impl CellPos {
    /// Create a new cell position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring position in `direction`. May lie outside the grid.
    /// Saturates at the `i32` limits.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row.saturating_add(dr), self.col.saturating_add(dc))
    }

    /// Direction from `self` to an orthogonally adjacent `other`.
    ///
    /// Returns `None` when the cells are not adjacent.
    ///
    /// ```
    /// use rescue_replay::core::{CellPos, Direction};
    ///
    /// let a = CellPos::new(2, 2);
    /// assert_eq!(a.direction_to(CellPos::new(2, 3)), Some(Direction::East));
    /// assert_eq!(a.direction_to(CellPos::new(3, 3)), None);
    /// assert_eq!(a.direction_to(a), None);
    /// ```
    #[must_use]
    pub fn direction_to(self, other: CellPos) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&d| self.step(d) == other)
    }

    /// All four neighbours with the direction leading to each.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, CellPos)> {
        Direction::ALL.into_iter().map(move |d| (d, self.step(d)))
    }

    /// Row-major index for a grid of `cols` columns. Caller checks bounds.
    #[must_use]
    pub(crate) fn index(self, cols: i32) -> usize {
        ((i64::from(self.row) - 1) * i64::from(cols) + (i64::from(self.col) - 1)) as usize
    }
}

impl std::fmt::Display for CellPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Addresses one side of a wall: the cell and the direction of the wall
/// as seen from that cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallKey {
    pub row: i32,
    pub col: i32,
    pub direction: Direction,
}

impl WallKey {
    /// Create a wall key from a cell and direction.
    #[must_use]
    pub const fn new(pos: CellPos, direction: Direction) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
            direction,
        }
    }

    /// The cell this key is expressed from.
    #[must_use]
    pub const fn cell(self) -> CellPos {
        CellPos::new(self.row, self.col)
    }

    /// The same wall, named from the adjacent cell.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::new(self.cell().step(self.direction), self.direction.opposite())
    }

    /// Canonical name for the physical wall: the smaller of the two keys.
    #[must_use]
    pub fn canonical(self) -> Self {
        self.min(self.opposite())
    }
}

impl std::fmt::Display for WallKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.row, self.col, self.direction)
    }
}

/// Pure coordinate transform used to address a wall from its other side.
#[must_use]
pub const fn opposite(row: i32, col: i32, direction: Direction) -> (i32, i32, Direction) {
    let key = WallKey::new(CellPos::new(row, col), direction).opposite();
    (key.row, key.col, key.direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }

    #[test]
    fn test_opposite_transform() {
        assert_eq!(opposite(2, 8, Direction::South), (3, 8, Direction::North));
        assert_eq!(opposite(2, 8, Direction::North), (1, 8, Direction::South));
        assert_eq!(opposite(4, 1, Direction::West), (4, 0, Direction::East));
        assert_eq!(opposite(4, 1, Direction::East), (4, 2, Direction::West));
    }

    #[test]
    fn test_canonical_is_shared() {
        let a = WallKey::new(CellPos::new(3, 3), Direction::East);
        let b = WallKey::new(CellPos::new(3, 4), Direction::West);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_step_saturates_at_limits() {
        let edge = CellPos::new(i32::MAX, i32::MIN);
        assert_eq!(edge.step(Direction::South), edge);
        assert_eq!(edge.step(Direction::West), edge);
        let key = WallKey::new(edge, Direction::South);
        assert_eq!(key.opposite().cell(), edge);
    }

    #[test]
    fn test_mask_bits_distinct() {
        let all = Direction::ALL.iter().fold(0u8, |acc, d| acc | d.mask_bit());
        assert_eq!(all, 0b1111);
    }

    #[test]
    fn test_index_row_major() {
        assert_eq!(CellPos::new(1, 1).index(8), 0);
        assert_eq!(CellPos::new(1, 8).index(8), 7);
        assert_eq!(CellPos::new(2, 1).index(8), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CellPos::new(4, 5)), "(4,5)");
        assert_eq!(
            format!("{}", WallKey::new(CellPos::new(2, 3), Direction::North)),
            "(2,3,north)"
        );
    }

    #[test]
    fn test_serialization() {
        let key = WallKey::new(CellPos::new(2, 3), Direction::West);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"row":2,"col":3,"direction":"west"}"#);
        let back: WallKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
