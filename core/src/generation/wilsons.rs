//! Maze generation by Wilson's algorithm
//!
//! Algorithm described e.g. at
//! https://en.wikipedia.org/wiki/Maze_generation_algorithm#Wilson's_algorithm
//!
//! The tree starts as the end cell alone. The first loop-erased walk runs from
//! the start cell into it and becomes the solution path (the tree's `main`).
//! Afterwards walks start from random uncovered cells; each one is reversed so
//! it begins at the tree cell where it stopped, and grafted there.

use std::collections::HashMap;

use tracing::debug;

use super::{FreePoints, Grid};
use crate::config::GeneratorConfig;
use crate::error::{MazeError, Result};
use crate::geometry::{Point, Route};
use crate::rng::RandomSource;
use crate::trails::Trails;

/// Random walk from `start` until it reaches a cell where `in_tree` holds.
///
/// Each step goes to a uniformly chosen neighbour. Whenever the walk steps onto
/// a cell it already visited, the loop since that first visit is erased; an
/// immediate step back erases a loop of length one. The returned route ends at
/// the tree cell that stopped the walk.
pub fn loop_erased_random_walk<R, F>(
    grid: Grid,
    start: Point,
    in_tree: F,
    rng: &mut R,
    limit: u64,
) -> Result<Route>
where
    R: RandomSource,
    F: Fn(Point) -> bool,
{
    let mut route = vec![start];
    let mut index = HashMap::from([(start, 0usize)]);
    let mut steps = 0u64;

    let mut tip = start;
    while !in_tree(tip) {
        steps += 1;
        if steps > limit {
            return Err(MazeError::IterationLimit {
                what: "loop-erased random walk",
                limit,
            });
        }

        let options: Vec<Point> = grid.neighbours(tip).collect();
        let Some(&next) = rng.choose(&options) else {
            return Err(MazeError::InvalidGeometry(format!(
                "walk from {start} has nowhere to go"
            )));
        };

        if let Some(&first_visit) = index.get(&next) {
            for erased in route.drain(first_visit + 1..) {
                index.remove(&erased);
            }
        } else {
            index.insert(next, route.len());
            route.push(next);
        }
        tip = next;
    }

    Ok(route)
}

pub(crate) fn generate<R: RandomSource>(
    grid: Grid,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Trails> {
    let limit = config.walk_budget(grid.cells());
    let end = grid.end();

    let main = loop_erased_random_walk(grid, grid.start(), |p| p == end, rng, limit)?;
    debug!("Solution path has {} points", main.len());

    let mut free = FreePoints::new(grid);
    for &p in &main {
        free.remove(p);
    }
    let mut trails = Trails::new(main);

    let mut walks = 0usize;
    while let Some(from) = free.pick(rng) {
        let mut walk = loop_erased_random_walk(grid, from, |p| !free.contains(p), rng, limit)?;
        walk.reverse();
        for &p in &walk[1..] {
            free.remove(p);
        }
        trails.graft(walk)?;
        walks += 1;
    }

    debug_assert!(free.is_empty());
    debug!("Grafted {} loop-erased walks", walks);
    Ok(trails)
}
