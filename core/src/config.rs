//! Generation tunables
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for the generation engines and wall placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Attempts per call to `randomly_transform_once`
    pub transform_retries: usize,
    /// Random transforms applied to the base path, per grid cell
    pub perturbation_factor: usize,
    /// Scales the loop caps of walks and searches: `factor * cells^2 + 10_000`
    pub walk_budget_factor: u64,
    /// Rejected samples allowed when placing a single random wall
    pub wall_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            transform_retries: 50,
            perturbation_factor: 1,
            walk_budget_factor: 64,
            wall_attempts: 10_000,
        }
    }
}

impl GeneratorConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Iteration cap for a single walk or search over `cells` grid cells
    pub fn walk_budget(&self, cells: usize) -> u64 {
        let cells = cells as u64;
        self.walk_budget_factor
            .saturating_mul(cells.saturating_mul(cells))
            .saturating_add(10_000)
    }
}
