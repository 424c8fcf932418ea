//! Lattice points and the small direction tags used by transforms
//!
//! Corridor cells sit on odd coordinates and wall endpoints on even
//! coordinates, so one grid step is always two units long. `+y` is north.

use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Length of a single grid step in lattice units
pub const STEP: i32 = 2;

/// One grid step towards south or west; patterns cannot negate a constant
const NEG_STEP: i32 = -STEP;

/// A point on the doubled lattice, serialized as `[x, y]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// An ordered corridor segment
pub type Route = Vec<Point>;

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Taxicab distance between two points
    pub fn dist_l1(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when `other` is exactly one grid step away
    pub fn is_neighbour(self, other: Point) -> bool {
        self.dist_l1(other) == STEP
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Taxicab distance between two points
pub fn dist_l1(p1: Point, p2: Point) -> i32 {
    p1.dist_l1(p2)
}

/// Turn side used by the bend transform
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chirality {
    Left,
    Right,
}

/// 8-way compass heading
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// The four headings a corridor can step in, in compass order
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Heading of the single step or diagonal jog from `from` to `to`.
    ///
    /// Returns `None` unless `to - from` is one grid step along an axis or one
    /// step along both axes at once.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        let d = to - from;
        let dir = match (d.x, d.y) {
            (0, STEP) => Direction::North,
            (STEP, STEP) => Direction::NorthEast,
            (STEP, 0) => Direction::East,
            (STEP, NEG_STEP) => Direction::SouthEast,
            (0, NEG_STEP) => Direction::South,
            (NEG_STEP, NEG_STEP) => Direction::SouthWest,
            (NEG_STEP, 0) => Direction::West,
            (NEG_STEP, STEP) => Direction::NorthWest,
            _ => return None,
        };
        Some(dir)
    }

    /// Lattice offset of one step in this heading
    pub fn offset(self) -> Point {
        let (dx, dy) = match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        };
        Point::new(dx * STEP, dy * STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3, 5);
        let b = Point::new(1, 1);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(a - b, Point::new(2, 4));
        assert_eq!(dist_l1(a, b), 6);
    }

    #[test]
    fn test_direction_round_trip() {
        let origin = Point::new(5, 5);
        for dir in [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ] {
            assert_eq!(Direction::between(origin, origin + dir.offset()), Some(dir));
        }
    }

    #[test]
    fn test_direction_of_southward_and_westward_steps() {
        let origin = Point::new(5, 5);
        assert_eq!(Direction::between(origin, Point::new(7, 3)), Some(Direction::SouthEast));
        assert_eq!(Direction::between(origin, Point::new(5, 3)), Some(Direction::South));
        assert_eq!(Direction::between(origin, Point::new(3, 3)), Some(Direction::SouthWest));
        assert_eq!(Direction::between(origin, Point::new(3, 5)), Some(Direction::West));
        assert_eq!(Direction::between(origin, Point::new(3, 7)), Some(Direction::NorthWest));
    }

    #[test]
    fn test_neighbours_are_one_step_apart() {
        let p = Point::new(3, 3);
        assert!(p.is_neighbour(Point::new(3, 5)));
        assert!(p.is_neighbour(Point::new(1, 3)));
        assert!(!p.is_neighbour(Point::new(5, 5)));
        assert!(!p.is_neighbour(p));
    }

    #[test]
    fn test_direction_rejects_far_points() {
        let origin = Point::new(1, 1);
        assert_eq!(Direction::between(origin, Point::new(5, 1)), None);
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, Point::new(2, 1)), None);
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Point::new(3, 7));
    }
}
