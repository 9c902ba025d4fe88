//! # Generation Module
//!
//! Procedural map generation: grid construction, constrained random entity
//! placement, and single-/multi-level map assembly.
//!
//! All randomness flows through an explicit [`StdRng`] seeded from
//! [`GenerationConfig::seed`], so a generation run is reproducible from its
//! seed alone.

pub mod map;
pub mod maze;
pub mod sampler;

pub use map::{generate_level, MapGenerator, MapKind};
pub use maze::build_maze;
pub use sampler::sample_positions;

use crate::{GemmazeError, GemmazeResult, MapConfig};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural map generation.
///
/// Bounds are drawn uniformly per map (or per level, for dimensions and
/// wall density). Dimension and count ranges are inclusive on both ends;
/// the wall-density range is half-open, matching the uniform draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Minimum grid width
    pub min_width: u32,
    /// Maximum grid width
    pub max_width: u32,
    /// Minimum grid height
    pub min_height: u32,
    /// Maximum grid height
    pub max_height: u32,
    /// Lower bound of the wall-density draw
    pub min_wall_density: f64,
    /// Upper bound of the wall-density draw (exclusive)
    pub max_wall_density: f64,
    /// Minimum number of levels per map
    pub min_levels: u32,
    /// Maximum number of levels per map
    pub max_levels: u32,
    /// Minimum gems placed per color per level
    pub min_gems_per_color: u32,
    /// Maximum gems placed per color per level
    pub max_gems_per_color: u32,
    /// Minimum monsters placed per level
    pub min_monsters: u32,
    /// Maximum monsters placed per level
    pub max_monsters: u32,
}

impl GenerationConfig {
    /// Configuration for multi-level maps: 2-3 linked levels with sparser
    /// per-level entity counts.
    pub fn multi_level(seed: u64) -> Self {
        Self {
            seed,
            min_width: 6,
            max_width: 8,
            min_height: 6,
            max_height: 8,
            min_wall_density: 0.15,
            max_wall_density: 0.25,
            min_levels: 2,
            max_levels: 3,
            min_gems_per_color: 2,
            max_gems_per_color: 3,
            min_monsters: 1,
            max_monsters: 2,
        }
    }

    /// Configuration for single-level maps, with richer per-level counts.
    pub fn single_level(seed: u64) -> Self {
        Self {
            seed,
            min_width: 6,
            max_width: 8,
            min_height: 6,
            max_height: 8,
            min_wall_density: 0.15,
            max_wall_density: 0.25,
            min_levels: 1,
            max_levels: 1,
            min_gems_per_color: 3,
            max_gems_per_color: 5,
            min_monsters: 2,
            max_monsters: 4,
        }
    }

    /// Configuration for tests: fixed 6×6 grids, two levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            min_width: 6,
            max_width: 6,
            min_height: 6,
            max_height: 6,
            min_wall_density: 0.15,
            max_wall_density: 0.25,
            min_levels: 2,
            max_levels: 2,
            min_gems_per_color: 2,
            max_gems_per_color: 2,
            min_monsters: 1,
            max_monsters: 1,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::multi_level(42)
    }
}

/// Trait for procedural generators.
///
/// All generation in gemmaze goes through this interface so callers can
/// swap generators and tests can thread a seeded rng.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> GemmazeResult<T>;

    /// Validates that the generated content meets its invariants.
    fn validate(&self, content: &T, config: &GenerationConfig) -> GemmazeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates the structural invariants of a generated map.
    ///
    /// Checks the forced walkable pocket of every level grid, disjointness
    /// and walkability of entity placements, teleport-gate pairing, the
    /// aggregate gem requirements, and start/exit level assignment. The
    /// exit and gate positions may legally coincide with entities.
    pub fn validate_map(map: &MapConfig) -> GemmazeResult<()> {
        if map.levels.is_empty() {
            return Err(GemmazeError::GenerationFailed(
                "map has no levels".to_string(),
            ));
        }

        for (index, level) in map.levels.iter().enumerate() {
            for (x, y) in [(0, 0), (1, 0), (0, 1)] {
                if !level.maze.is_walkable(x, y) {
                    return Err(GemmazeError::GenerationFailed(format!(
                        "level {index} start pocket cell ({x}, {y}) is not walkable"
                    )));
                }
            }

            let mut seen = HashSet::new();
            for pos in level.placements() {
                if !level.maze.is_walkable(pos.x, pos.y) {
                    return Err(GemmazeError::GenerationFailed(format!(
                        "level {index} entity at ({}, {}) is not walkable",
                        pos.x, pos.y
                    )));
                }
                if !seen.insert(pos.cell()) {
                    return Err(GemmazeError::GenerationFailed(format!(
                        "level {index} has overlapping entities at ({}, {})",
                        pos.x, pos.y
                    )));
                }
            }
        }

        if map.teleport_gates.len() != map.levels.len() - 1 {
            return Err(GemmazeError::GenerationFailed(format!(
                "expected {} teleport gates, found {}",
                map.levels.len() - 1,
                map.teleport_gates.len()
            )));
        }
        for (i, gate) in map.teleport_gates.iter().enumerate() {
            let (entry, exit) = (gate.entry(), gate.exit());
            if entry.level_index() != i as u32 || exit.level_index() != i as u32 + 1 {
                return Err(GemmazeError::GenerationFailed(format!(
                    "teleport gate {i} does not link level {i} to level {}",
                    i + 1
                )));
            }
            if !map.levels[i].maze.is_walkable(entry.x, entry.y)
                || !map.levels[i + 1].maze.is_walkable(exit.x, exit.y)
            {
                return Err(GemmazeError::GenerationFailed(format!(
                    "teleport gate {i} placed on a wall"
                )));
            }
        }

        let blue_total: u32 = map.levels.iter().map(|l| l.blue_gems.len() as u32).sum();
        let red_total: u32 = map.levels.iter().map(|l| l.red_gems.len() as u32).sum();
        if map.required_blue_gems != blue_total || map.required_red_gems != red_total {
            return Err(GemmazeError::GenerationFailed(format!(
                "gem requirements ({}, {}) do not match placed counts ({blue_total}, {red_total})",
                map.required_blue_gems, map.required_red_gems
            )));
        }

        if map.start.level_index() != 0 {
            return Err(GemmazeError::GenerationFailed(
                "start is not on level 0".to_string(),
            ));
        }
        if map.exit.level_index() != map.levels.len() as u32 - 1 {
            return Err(GemmazeError::GenerationFailed(
                "exit is not on the last level".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_ranges() {
        let multi = GenerationConfig::multi_level(12345);
        assert_eq!(multi.seed, 12345);
        assert!(multi.min_levels >= 2);
        assert!(multi.min_gems_per_color <= multi.max_gems_per_color);
        assert!(multi.min_wall_density < multi.max_wall_density);

        let single = GenerationConfig::single_level(12345);
        assert_eq!(single.min_levels, 1);
        assert_eq!(single.max_levels, 1);
        assert!(single.min_gems_per_color >= multi.min_gems_per_color);
    }

    #[test]
    fn test_create_rng_is_deterministic() {
        use rand::Rng;

        let config = GenerationConfig::for_testing(7);
        let mut a = utils::create_rng(&config);
        let mut b = utils::create_rng(&config);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
