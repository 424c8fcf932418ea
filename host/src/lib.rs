use std::collections::HashMap;
use std::fs;

use limnos_core::walls::{open_start_and_finish, wall_intersects_trails};
use limnos_core::validation::{all_points_consecutive, all_points_unique};
use limnos_core::{
    generate_trails_with, walls_from_trails, Algorithm, GeneratorConfig, Grid, Point, SimpleLCG,
    Trails, Walls,
};
use serde::{Deserialize, Serialize};

/// A finished maze: the corridor tree, its walls, and how it was made
///
/// Everything needed to regenerate the maze is stored next to the result, so
/// an artifact can be re-derived and checked from its seed alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeArtifact {
    /// The seed used to generate this maze
    pub seed: u32,

    /// The engine that grew the corridor tree
    pub algorithm: Algorithm,

    /// Grid size in cells
    pub width: usize,
    pub height: usize,

    /// Corridor spanning tree; `trails.main()` runs from start to finish
    pub trails: Trails,

    /// Legal walls, with openings at the start and finish corners
    pub walls: Walls,
}

impl MazeArtifact {
    /// Number of cells on the solution path
    pub fn solution_length(&self) -> usize {
        self.trails.main().len()
    }
}

/// Generate a complete maze from a seed.
///
/// # Arguments
/// * `width`, `height` - Grid size in cells
/// * `algorithm` - Which engine grows the corridor tree
/// * `seed` - RNG seed; the same inputs always give the same maze
/// * `config` - Generation tunables
///
/// # Example
/// ```no_run
/// use limnos_core::{Algorithm, GeneratorConfig};
/// use limnos_host::generate_maze;
///
/// let maze = generate_maze(20, 20, Algorithm::Wilsons, 2918957128, &GeneratorConfig::default()).unwrap();
/// println!("Solution path: {} cells, {} walls", maze.solution_length(), maze.walls.len());
/// ```
pub fn generate_maze(
    width: usize,
    height: usize,
    algorithm: Algorithm,
    seed: u32,
    config: &GeneratorConfig,
) -> Result<MazeArtifact, Box<dyn std::error::Error>> {
    tracing::info!(
        "Generating {}x{} maze for seed {} with algorithm: {}",
        width,
        height,
        seed,
        algorithm
    );

    let grid = Grid::new(width, height)?;
    let mut rng = SimpleLCG::new(seed);
    let trails = generate_trails_with(grid, algorithm, &mut rng, config)?;

    let mut walls = walls_from_trails(&trails);
    open_start_and_finish(&mut walls, grid.start(), grid.end());

    tracing::info!(
        "Maze generated ({} routes, {} walls)",
        trails.route_count(),
        walls.len()
    );

    Ok(MazeArtifact {
        seed,
        algorithm,
        width,
        height,
        trails,
        walls,
    })
}

/// Check a maze artifact for consistency.
///
/// This verifies that:
/// 1. Every grid cell is covered by exactly one corridor
/// 2. Every corridor is a simple walk of grid steps, and the solution path
///    runs from the start corner to the finish corner
/// 3. No wall blocks a corridor
/// 4. Regenerating from the stored seed reproduces the same maze
pub fn verify_maze(
    artifact: &MazeArtifact,
    config: &GeneratorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Verifying maze for seed {}", artifact.seed);

    let grid = Grid::new(artifact.width, artifact.height)?;
    let trails = &artifact.trails;

    let mut owners: HashMap<Point, usize> = HashMap::new();
    for (i, route) in trails.all_routes().into_iter().enumerate() {
        if !all_points_unique(route) || !all_points_consecutive(route) {
            return Err(format!("Corridor {} is not a simple walk", i).into());
        }
        // a branch's first cell belongs to its parent
        let owned = if i == 0 { &route[..] } else { &route[1..] };
        for &p in owned {
            if !grid.contains(p) {
                return Err(format!("Corridor cell {} lies outside the grid", p).into());
            }
            *owners.entry(p).or_insert(0) += 1;
        }
    }
    if let Some((p, _)) = owners.iter().find(|(_, &count)| count > 1) {
        return Err(format!("Cell {} is covered more than once", p).into());
    }
    if owners.len() != grid.cells() {
        return Err(format!(
            "Corridors cover {} of {} cells",
            owners.len(),
            grid.cells()
        )
        .into());
    }

    let main = trails.main();
    if main.first() != Some(&grid.start()) || main.last() != Some(&grid.end()) {
        return Err("Solution path does not run from start to finish".into());
    }

    if let Some(wall) = artifact
        .walls
        .iter()
        .find(|w| wall_intersects_trails(trails, **w))
    {
        return Err(format!("Wall {:?} blocks a corridor", wall).into());
    }

    tracing::info!("Regenerating maze to compare against the stored seed...");
    let regenerated = generate_maze(
        artifact.width,
        artifact.height,
        artifact.algorithm,
        artifact.seed,
        config,
    )?;
    if regenerated.trails != artifact.trails || regenerated.walls != artifact.walls {
        return Err(format!("Maze does not match seed {}", artifact.seed).into());
    }

    tracing::info!("Maze verification successful");
    Ok(())
}

pub fn save_maze(artifact: &MazeArtifact, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(artifact)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_maze(path: &str) -> Result<MazeArtifact, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;

    // Validate file size (prevent loading gigabytes into memory)
    if json.len() > 100_000_000 {
        return Err("Maze file is too large (max 100MB)".into());
    }

    let artifact: MazeArtifact = serde_json::from_str(&json)?;
    Ok(artifact)
}

pub fn load_config(path: &str) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(GeneratorConfig::from_json_str(&json)?)
}
