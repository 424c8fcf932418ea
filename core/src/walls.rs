//! Wall synthesis
//!
//! Walls live on the even lattice, between corridor cells. A wall "intersects"
//! a route when the two cells on either side of it are consecutive in that
//! route, i.e. the wall would block the corridor.
//!
//! [`walls_from_trails`] derives every legal wall for a finished tree in one go.
//! [`add_outer_walls_to_maze`] and [`add_random_wall_to_maze`] build walls
//! around a single route incrementally instead.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{MazeError, Result};
use crate::geometry::{Direction, Point, Route, STEP};
use crate::rng::RandomSource;
use crate::trails::Trails;

/// A unit wall segment between two even lattice points
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[Point; 2]", into = "[Point; 2]")]
pub struct Wall {
    a: Point,
    b: Point,
}

pub type Walls = Vec<Wall>;

impl Wall {
    /// A wall from `a` to `b`; both must be even lattice points one step apart
    pub fn new(a: Point, b: Point) -> Result<Self> {
        let even = |p: Point| p.x % 2 == 0 && p.y % 2 == 0;
        if !even(a) || !even(b) || a.dist_l1(b) != STEP {
            return Err(MazeError::InvalidGeometry(format!(
                "{a}-{b} is not a unit wall on the even lattice"
            )));
        }
        Ok(Self { a, b })
    }

    /// Caller guarantees `a` and `b` are adjacent even points
    fn raw(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.a, self.b)
    }

    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// The orientation with the smaller endpoint first
    pub fn normalized(&self) -> Self {
        if self.a <= self.b {
            *self
        } else {
            self.reversed()
        }
    }

    /// Same segment regardless of orientation
    pub fn same_segment(&self, other: &Wall) -> bool {
        self.normalized() == other.normalized()
    }

    pub fn touches(&self, p: Point) -> bool {
        self.a == p || self.b == p
    }

    /// The two corridor cells this wall stands between
    fn separated_cells(&self) -> (Point, Point) {
        let d = self.a - self.b;
        let (o0, o1) = match (d.x, d.y) {
            (-2, 0) => ((1, 1), (1, -1)),
            (0, -2) => ((1, 1), (-1, 1)),
            (2, 0) => ((-1, 1), (-1, -1)),
            _ => ((1, -1), (-1, -1)), // (0, 2)
        };
        (self.a + Point::from(o0), self.a + Point::from(o1))
    }
}

impl TryFrom<[Point; 2]> for Wall {
    type Error = MazeError;

    fn try_from([a, b]: [Point; 2]) -> Result<Self> {
        Wall::new(a, b)
    }
}

impl From<Wall> for [Point; 2] {
    fn from(wall: Wall) -> Self {
        [wall.a, wall.b]
    }
}

/// A single route with the walls built around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    pub route: Route,
    pub walls: Walls,
}

impl Maze {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            walls: Vec::new(),
        }
    }
}

/// Whether `wall` blocks the corridor `route`, in the wall's given orientation.
///
/// The wall's first endpoint picks the two cells on either side of it; the
/// wall intersects when both are in the route and next to each other there.
pub fn wall_intersects_route(route: &[Point], wall: Wall) -> bool {
    let (p0, p1) = wall.separated_cells();
    let Some(i) = route.iter().position(|&p| p == p0) else {
        return false;
    };
    let before = i.checked_sub(1).and_then(|j| route.get(j));
    let after = route.get(i + 1);
    before == Some(&p1) || after == Some(&p1)
}

/// Whether `wall` in either orientation blocks any corridor of the tree
pub fn wall_intersects_trails(trails: &Trails, wall: Wall) -> bool {
    let reversed = wall.reversed();
    trails
        .all_routes()
        .into_iter()
        .any(|r| wall_intersects_route(r, wall) || wall_intersects_route(r, reversed))
}

/// Every unit wall in the rectangle spanned by the ends of the tree's main corridor,
/// all horizontal walls first, then all vertical ones
pub fn candidate_walls(trails: &Trails) -> Walls {
    let main = trails.main();
    let (Some(first), Some(last)) = (main.first(), main.last()) else {
        return Vec::new();
    };
    let x0 = first.x.min(last.x) - 1;
    let x1 = first.x.max(last.x) + 1;
    let y0 = first.y.min(last.y) - 1;
    let y1 = first.y.max(last.y) + 1;
    let step = STEP as usize;

    let horizontal = (x0..x1).step_by(step).flat_map(|x| {
        (y0..=y1)
            .step_by(step)
            .map(move |y| Wall::raw((x, y), (x + STEP, y)))
    });
    let vertical = (x0..=x1).step_by(step).flat_map(|x| {
        (y0..y1)
            .step_by(step)
            .map(move |y| Wall::raw((x, y), (x, y + STEP)))
    });
    horizontal.chain(vertical).collect()
}

/// All candidate walls that do not block any corridor of the tree.
///
/// The full outer border is included; see [`open_start_and_finish`].
pub fn walls_from_trails(trails: &Trails) -> Walls {
    let corridors: HashSet<(Point, Point)> = trails
        .all_routes()
        .into_iter()
        .flat_map(|r| r.windows(2).map(|w| ordered(w[0], w[1])))
        .collect();

    let candidates = candidate_walls(trails);
    let total = candidates.len();
    let legal: Walls = candidates
        .into_iter()
        .filter(|w| {
            let (p0, p1) = w.separated_cells();
            !corridors.contains(&ordered(p0, p1))
        })
        .collect();

    info!(
        "Wall synthesis kept {} of {} candidate walls",
        legal.len(),
        total
    );
    legal
}

fn ordered(p: Point, q: Point) -> (Point, Point) {
    if p <= q {
        (p, q)
    } else {
        (q, p)
    }
}

/// Remove the border segments at the start cell's bottom-left corner and the
/// end cell's top-right corner
pub fn open_start_and_finish(walls: &mut Walls, start: Point, end: Point) {
    let gaps = [
        Wall::raw((start.x - 1, start.y - 1), (start.x + 1, start.y - 1)),
        Wall::raw((start.x - 1, start.y - 1), (start.x - 1, start.y + 1)),
        Wall::raw((end.x + 1, end.y - 1), (end.x + 1, end.y + 1)),
        Wall::raw((end.x - 1, end.y + 1), (end.x + 1, end.y + 1)),
    ];
    walls.retain(|w| !gaps.iter().any(|g| g.same_segment(w)));
}

/// Add the border around the maze's route, leaving gaps at start and finish
pub fn add_outer_walls_to_maze(maze: Maze) -> Maze {
    let (Some(&first), Some(&last)) = (maze.route.first(), maze.route.last()) else {
        return maze;
    };
    let (x0, y0) = (first.x - 1, first.y - 1);
    let (x1, y1) = (last.x + 1, last.y + 1);
    let along_x = (x0..x1).step_by(STEP as usize);
    let along_y = (y0..y1).step_by(STEP as usize);

    let mut bottom: Walls = along_x.clone().map(|x| Wall::raw((x, y0), (x + STEP, y0))).collect();
    let mut left: Walls = along_y.clone().map(|y| Wall::raw((x0, y), (x0, y + STEP))).collect();
    let mut right: Walls = along_y.map(|y| Wall::raw((x1, y), (x1, y + STEP))).collect();
    let mut top: Walls = along_x.map(|x| Wall::raw((x, y1), (x + STEP, y1))).collect();

    // start gap in the bottom-left corner, finish gap in the top-right one
    if !bottom.is_empty() {
        bottom.remove(0);
    }
    if !left.is_empty() {
        left.remove(0);
    }
    right.pop();
    top.pop();

    let Maze { route, mut walls } = maze;
    walls.extend(bottom);
    walls.extend(left);
    walls.extend(right);
    walls.extend(top);
    Maze { route, walls }
}

/// Whether both ends of `new_wall` already touch an existing wall.
///
/// This is stricter than a real loop test: it also refuses walls that merely
/// join two separate wall fragments.
pub fn wall_forms_loop(new_wall: Wall, old_walls: &[Wall]) -> bool {
    let (p1, p2) = new_wall.endpoints();
    old_walls.iter().any(|w| w.touches(p1)) && old_walls.iter().any(|w| w.touches(p2))
}

/// Add one random inner wall that is new, does not close a loop, and does not
/// block the route.
///
/// Gives up with `IterationLimit` after `config.wall_attempts` rejected samples.
pub fn add_random_wall_to_maze<R: RandomSource>(
    maze: &Maze,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Maze> {
    let attempts = config.wall_attempts;
    let no_interior =
        || MazeError::InvalidGeometry("route spans no interior lattice points".to_string());
    let (Some(&first), Some(&last)) = (maze.route.first(), maze.route.last()) else {
        return Err(no_interior());
    };
    let (x0, y0) = (first.x + 1, first.y + 1);
    let (x1, y1) = (last.x - 1, last.y - 1);
    if x0 > x1 || y0 > y1 {
        return Err(no_interior());
    }
    let columns = ((x1 - x0) / STEP) as usize;
    let rows = ((y1 - y0) / STEP) as usize;

    for attempt in 0..attempts {
        let from = Point::new(
            x0 + STEP * rng.randint(0, columns) as i32,
            y0 + STEP * rng.randint(0, rows) as i32,
        );
        let step = Direction::CARDINALS[rng.choice_index(Direction::CARDINALS.len())].offset();
        let wall = Wall {
            a: from,
            b: from + step,
        };

        let duplicate = maze.walls.iter().any(|w| w.same_segment(&wall));
        let rejected = duplicate
            || wall_forms_loop(wall, &maze.walls)
            || wall_intersects_route(&maze.route, wall)
            || wall_intersects_route(&maze.route, wall.reversed());
        if !rejected {
            debug!("Placed wall {:?} after {} rejections", wall, attempt);
            let mut walls = maze.walls.clone();
            walls.push(wall);
            return Ok(Maze {
                route: maze.route.clone(),
                walls,
            });
        }
    }

    Err(MazeError::IterationLimit {
        what: "random wall placement",
        limit: attempts as u64,
    })
}
