//! Corridor tree generation
//!
//! Two engines build a [`Trails`] tree covering every cell of a
//! `width x height` grid exactly once:
//!
//! - [`Algorithm::BranchSprouting`]: randomise a staircase path from corner to
//!   corner, then sprout random branches until nothing is left uncovered. Fast,
//!   but branch shapes are biased by the search order.
//! - [`Algorithm::Wilsons`]: Wilson's algorithm. Loop-erased random walks are
//!   grafted onto the tree until it spans the grid; every spanning tree is
//!   equally likely.
//!
//! Cells have odd coordinates, from `(1, 1)` to `(2 * width - 1, 2 * height - 1)`.

pub mod sprouting;
pub mod wilsons;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::{MazeError, Result};
use crate::geometry::{Direction, Point};
use crate::rng::{RandomSource, SimpleLCG};
use crate::trails::Trails;

/// Which engine builds the tree
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Randomised base path plus sprouted branches
    #[serde(alias = "branch-sprouting")]
    #[serde(rename = "sprouting")]
    BranchSprouting,
    /// Loop-erased random walks; uniform over all spanning trees
    Wilsons,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Wilsons
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sprouting" | "branch-sprouting" => Ok(Algorithm::BranchSprouting),
            "wilsons" | "wilson" => Ok(Algorithm::Wilsons),
            _ => Err(format!(
                "Invalid algorithm: '{}'. Must be 'sprouting' or 'wilsons'",
                s
            )),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::BranchSprouting => write!(f, "sprouting"),
            Algorithm::Wilsons => write!(f, "wilsons"),
        }
    }
}

/// A `width x height` grid of corridor cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let max = (i32::MAX / 2) as usize;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Bottom-left cell, where the solution path begins
    pub fn start(&self) -> Point {
        Point::new(1, 1)
    }

    /// Top-right cell, where the solution path ends
    pub fn end(&self) -> Point {
        Point::new(2 * self.width as i32 - 1, 2 * self.height as i32 - 1)
    }

    pub fn contains(&self, p: Point) -> bool {
        let end = self.end();
        p.x % 2 != 0 && p.y % 2 != 0 && (1..=end.x).contains(&p.x) && (1..=end.y).contains(&p.y)
    }

    /// In-bounds neighbours of `p`, in compass order N, E, S, W
    pub fn neighbours(self, p: Point) -> impl Iterator<Item = Point> {
        Direction::CARDINALS
            .into_iter()
            .map(move |d| p + d.offset())
            .filter(move |&q| self.contains(q))
    }

    /// Every cell, column by column
    pub fn points(self) -> impl Iterator<Item = Point> {
        let end = self.end();
        (1..=end.x)
            .step_by(2)
            .flat_map(move |x| (1..=end.y).step_by(2).map(move |y| Point::new(x, y)))
    }
}

/// Cells not yet covered by the tree, with O(1) removal and uniform sampling.
///
/// Order only depends on the removal sequence, never on hashing, so sampling is
/// reproducible from the seed.
#[derive(Debug, Clone)]
pub(crate) struct FreePoints {
    points: Vec<Point>,
    index: HashMap<Point, usize>,
}

impl FreePoints {
    pub(crate) fn new(grid: Grid) -> Self {
        let points: Vec<Point> = grid.points().collect();
        let index = points.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        Self { points, index }
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn contains(&self, p: Point) -> bool {
        self.index.contains_key(&p)
    }

    pub(crate) fn remove(&mut self, p: Point) -> bool {
        let Some(i) = self.index.remove(&p) else {
            return false;
        };
        self.points.swap_remove(i);
        if let Some(&moved) = self.points.get(i) {
            self.index.insert(moved, i);
        }
        true
    }

    pub(crate) fn pick<R: RandomSource>(&self, rng: &mut R) -> Option<Point> {
        rng.choose(&self.points).copied()
    }
}

/// Generate a corridor tree over a `width x height` grid from a seed
pub fn generate_trails(
    width: usize,
    height: usize,
    algorithm: Algorithm,
    seed: u32,
) -> Result<Trails> {
    let grid = Grid::new(width, height)?;
    let mut rng = SimpleLCG::new(seed);
    generate_trails_with(grid, algorithm, &mut rng, &GeneratorConfig::default())
}

/// Generate a corridor tree with an injected random source and tunables
pub fn generate_trails_with<R: RandomSource>(
    grid: Grid,
    algorithm: Algorithm,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Trails> {
    info!(
        "Generating {}x{} trails with {}",
        grid.width(),
        grid.height(),
        algorithm
    );

    let trails = match algorithm {
        Algorithm::BranchSprouting => sprouting::generate(grid, rng, config)?,
        Algorithm::Wilsons => wilsons::generate(grid, rng, config)?,
    };

    info!(
        "Trails generated: {} routes covering {} cells",
        trails.route_count(),
        trails.point_count()
    );
    Ok(trails)
}
