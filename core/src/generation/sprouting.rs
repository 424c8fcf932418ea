//! Branch sprouting generation
//!
//! 1. Lay a staircase from the start corner to the end corner
//! 2. Shake it with random transforms so the solution path is not trivial
//! 3. While cells remain uncovered:
//!    - pick one at random
//!    - find the closest covered cell by searching outward in L1 rings
//!    - grow a self-avoiding random branch from there until it gets stuck
//!
//! The closest covered cell always has an uncovered neighbour facing the
//! picked cell, so every branch grows at least one step.

use tracing::{debug, warn};

use super::{FreePoints, Grid};
use crate::config::GeneratorConfig;
use crate::error::{MazeError, Result};
use crate::geometry::{Point, Route, STEP};
use crate::rng::RandomSource;
use crate::transforms::randomly_transform_once;
use crate::trails::Trails;

/// Staircase from `start` to `end`: all east along the bottom row, then all north
pub fn base_route(grid: Grid) -> Route {
    let start = grid.start();
    let end = grid.end();
    let east = (start.x..=end.x)
        .step_by(STEP as usize)
        .map(|x| Point::new(x, start.y));
    let north = (start.y + STEP..=end.y)
        .step_by(STEP as usize)
        .map(|y| Point::new(end.x, y));
    east.chain(north).collect()
}

/// The staircase after `perturbation_factor * cells` random transforms.
///
/// Transforms keep the route inside the rectangle spanned by its endpoints,
/// which is the whole grid. If no transform applies any more the current
/// route is kept.
pub fn random_base_route<R: RandomSource>(
    grid: Grid,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Route> {
    let mut route = base_route(grid);
    if route.len() < 2 {
        return Ok(route);
    }

    let passes = config.perturbation_factor.saturating_mul(grid.cells());
    for pass in 0..passes {
        match randomly_transform_once(&route, rng, config.transform_retries) {
            Ok(next) => route = next,
            Err(MazeError::RetryExhausted(attempts)) => {
                warn!(
                    "Base path perturbation stopped after {} of {} passes ({} failed attempts)",
                    pass, passes, attempts
                );
                break;
            }
            Err(e) => return Err(e),
        }
    }

    debug!("Base path has {} points", route.len());
    Ok(route)
}

/// Closest covered cell to `from`, searching rings of growing L1 radius
pub(crate) fn nearest_covered(grid: Grid, from: Point, free: &FreePoints) -> Result<Point> {
    let end = grid.end();
    let max_radius = (end.x - 1) + (end.y - 1);
    let covered = |p: Point| grid.contains(p) && !free.contains(p);

    for radius in (STEP..=max_radius).step_by(STEP as usize) {
        for dx in (-radius..=radius).step_by(STEP as usize) {
            let dy = radius - dx.abs();
            let candidates = [Point::new(dx, dy), Point::new(dx, -dy)];
            let ring = if dy == 0 { &candidates[..1] } else { &candidates[..] };
            if let Some(&offset) = ring.iter().find(|&&o| covered(from + o)) {
                return Ok(from + offset);
            }
        }
    }

    Err(MazeError::IterationLimit {
        what: "nearest covered cell search",
        limit: max_radius as u64,
    })
}

/// Random self-avoiding walk from `anchor` through free cells until stuck.
///
/// Cells taken by the walk are removed from `free`.
pub(crate) fn grow_branch<R: RandomSource>(
    grid: Grid,
    anchor: Point,
    free: &mut FreePoints,
    rng: &mut R,
) -> Route {
    let mut branch = vec![anchor];
    let mut tip = anchor;
    loop {
        let options: Vec<Point> = grid.neighbours(tip).filter(|&q| free.contains(q)).collect();
        let Some(&next) = rng.choose(&options) else {
            break;
        };
        free.remove(next);
        branch.push(next);
        tip = next;
    }
    branch
}

pub(crate) fn generate<R: RandomSource>(
    grid: Grid,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Trails> {
    let main = random_base_route(grid, rng, config)?;
    let mut free = FreePoints::new(grid);
    for &p in &main {
        free.remove(p);
    }
    let mut trails = Trails::new(main);

    let limit = config.walk_budget(grid.cells());
    let mut attempts = 0u64;
    let mut grafted = 0usize;
    while let Some(target) = free.pick(rng) {
        attempts += 1;
        if attempts > limit {
            return Err(MazeError::IterationLimit {
                what: "branch sprouting",
                limit,
            });
        }

        let anchor = nearest_covered(grid, target, &free)?;
        let branch = grow_branch(grid, anchor, &mut free, rng);
        if branch.len() > 1 {
            trails.graft(branch)?;
            grafted += 1;
        }
    }

    debug!(
        "Sprouted {} branches in {} attempts, {} cells left",
        grafted,
        attempts,
        free.len()
    );
    Ok(trails)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleLCG;
    use crate::validation::is_valid_route;
    use std::collections::HashSet;

    #[test]
    fn test_base_route_is_staircase() {
        let grid = Grid::new(3, 2).unwrap();
        let route = base_route(grid);
        let expected: Vec<Point> = [(1, 1), (3, 1), (5, 1), (5, 3)]
            .iter()
            .map(|&p| Point::from(p))
            .collect();
        assert_eq!(route, expected);
        assert!(is_valid_route(&route));
    }

    #[test]
    fn test_base_route_single_column() {
        let grid = Grid::new(1, 3).unwrap();
        assert_eq!(
            base_route(grid),
            vec![Point::new(1, 1), Point::new(1, 3), Point::new(1, 5)]
        );
    }

    #[test]
    fn test_random_base_route_stays_valid() {
        let grid = Grid::new(6, 5).unwrap();
        let mut rng = SimpleLCG::new(31337);
        let route = random_base_route(grid, &mut rng, &GeneratorConfig::default()).unwrap();

        assert!(is_valid_route(&route));
        assert_eq!(route.first(), Some(&grid.start()));
        assert_eq!(route.last(), Some(&grid.end()));
        assert!(route.iter().all(|&p| grid.contains(p)));
        assert_ne!(route, base_route(grid));
    }

    #[test]
    fn test_random_base_route_on_a_line() {
        // nothing can be bent inside a single row
        let grid = Grid::new(5, 1).unwrap();
        let mut rng = SimpleLCG::new(8);
        let route = random_base_route(grid, &mut rng, &GeneratorConfig::default()).unwrap();
        assert_eq!(route, base_route(grid));
    }

    #[test]
    fn test_nearest_covered() {
        let grid = Grid::new(5, 5).unwrap();
        let mut free = FreePoints::new(grid);
        free.remove(Point::new(1, 1));
        free.remove(Point::new(9, 9));

        assert_eq!(
            nearest_covered(grid, Point::new(3, 3), &free).unwrap(),
            Point::new(1, 1)
        );
        assert_eq!(
            nearest_covered(grid, Point::new(7, 9), &free).unwrap(),
            Point::new(9, 9)
        );
    }

    #[test]
    fn test_nearest_covered_fails_on_empty_tree() {
        let grid = Grid::new(2, 2).unwrap();
        let free = FreePoints::new(grid);
        assert!(matches!(
            nearest_covered(grid, Point::new(1, 1), &free),
            Err(MazeError::IterationLimit { .. })
        ));
    }

    #[test]
    fn test_grow_branch_only_takes_free_cells() {
        let grid = Grid::new(4, 4).unwrap();
        let mut free = FreePoints::new(grid);
        for p in base_route(grid) {
            free.remove(p);
        }
        let mut rng = SimpleLCG::new(99);
        let branch = grow_branch(grid, Point::new(3, 1), &mut free, &mut rng);

        assert!(branch.len() > 1);
        assert!(is_valid_route(&branch[..2]));
        let unique: HashSet<Point> = branch.iter().copied().collect();
        assert_eq!(unique.len(), branch.len());
        assert!(branch[1..].iter().all(|&p| !free.contains(p) && p.y > 1));
    }

    #[test]
    fn test_generate_covers_grid() {
        let grid = Grid::new(7, 4).unwrap();
        let mut rng = SimpleLCG::new(2024);
        let trails = generate(grid, &mut rng, &GeneratorConfig::default()).unwrap();

        let covered: HashSet<Point> = trails.points().into_iter().collect();
        let expected: HashSet<Point> = grid.points().collect();
        assert_eq!(covered, expected);
        assert_eq!(trails.point_count(), grid.cells());
    }
}
