//! Procedural maze topology generation
//!
//! A maze is a spanning tree of corridors ([`Trails`]) over a rectangular grid,
//! plus the walls that fit around it without blocking any corridor.
//!
//! - [`generate_trails`] grows the tree with one of two engines
//!   ([`Algorithm::BranchSprouting`] or [`Algorithm::Wilsons`])
//! - [`walls_from_trails`] derives the legal wall set from a finished tree
//! - [`transforms`] holds the bend / flip / flatten route algebra
//! - [`codec`] is the versioned persistent encoding of a tree
//!
//! Corridor cells use odd coordinates and wall endpoints even coordinates, so
//! one grid step is two lattice units.

pub mod codec;
pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod rng;
pub mod trails;
pub mod transforms;
pub mod validation;
pub mod walls;

// Re-export commonly used types for convenience
pub use config::GeneratorConfig;
pub use error::{MazeError, Result};
pub use generation::{generate_trails, generate_trails_with, Algorithm, Grid};
pub use geometry::{Chirality, Direction, Point, Route};
pub use rng::{RandomSource, SimpleLCG};
pub use trails::Trails;
pub use walls::{
    add_outer_walls_to_maze, add_random_wall_to_maze, wall_intersects_route, walls_from_trails,
    Maze, Wall, Walls,
};
