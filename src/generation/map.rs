//! Single-level and multi-level map assembly.
//!
//! A level is generated bottom-up: grid first, then blue gems, red gems and
//! monsters, each sampling round excluding everything placed before it.
//! Multi-level maps thread the accumulated exclusion set forward across
//! levels. Each level has its own coordinate space, so the carried set only
//! affects the random draw sequence, but the threading is kept to stay
//! replay-compatible with existing map documents.

use crate::generation::{build_maze, sample_positions, utils, GenerationConfig, Generator};
use crate::model::{GridPosition, LevelConfig, MapConfig, MazeGrid, TeleportGate};
use crate::{GemmazeError, GemmazeResult};
use rand::{rngs::StdRng, Rng};
use std::collections::HashSet;

/// Which document shape a [`MapGenerator`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    /// One flattened level, richer entity counts, no teleport gates.
    SingleLevel,
    /// 2-3 levels linked by teleport gates.
    MultiLevel,
}

/// Generates one titled map configuration per call.
///
/// # Examples
///
/// ```
/// use gemmaze::generation::{utils, GenerationConfig, Generator, MapGenerator};
///
/// let config = GenerationConfig::multi_level(7);
/// let mut rng = utils::create_rng(&config);
/// let map = MapGenerator::multi_level(1).generate(&config, &mut rng)?;
/// assert_eq!(map.teleport_gates.len(), map.level_count() - 1);
/// # Ok::<(), gemmaze::GemmazeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MapGenerator {
    /// Document shape to produce
    pub kind: MapKind,
    /// Map index, used for the document title
    pub index: u32,
}

impl MapGenerator {
    /// Creates a generator for a single-level map.
    pub fn single_level(index: u32) -> Self {
        Self {
            kind: MapKind::SingleLevel,
            index,
        }
    }

    /// Creates a generator for a multi-level map.
    pub fn multi_level(index: u32) -> Self {
        Self {
            kind: MapKind::MultiLevel,
            index,
        }
    }

    fn generate_single(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> GemmazeResult<MapConfig> {
        let width = rng.gen_range(config.min_width..=config.max_width);
        let height = rng.gen_range(config.min_height..=config.max_height);
        let wall_density = rng.gen_range(config.min_wall_density..config.max_wall_density);

        // The start cell is reserved before any placement.
        let mut seed_exclusions = HashSet::new();
        seed_exclusions.insert((0, 0));

        let (level, used) =
            generate_level(config, width, height, wall_density, &seed_exclusions, rng)?;

        // Unlike multi-level maps, the exit avoids every used cell here.
        let exit = sample_required(&level.maze, &used, rng, "exit")?;

        Ok(MapConfig {
            title: format!("Maze map {:03}", self.index),
            start: GridPosition::origin(),
            exit,
            required_blue_gems: level.blue_gems.len() as u32,
            required_red_gems: level.red_gems.len() as u32,
            levels: vec![level],
            teleport_gates: Vec::new(),
        })
    }

    fn generate_multi(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> GemmazeResult<MapConfig> {
        let level_count = rng.gen_range(config.min_levels..=config.max_levels);
        if level_count == 0 {
            return Err(GemmazeError::GenerationFailed(
                "level count range produced zero levels".to_string(),
            ));
        }

        let mut levels = Vec::with_capacity(level_count as usize);
        let mut carried_exclusions: HashSet<(u32, u32)> = HashSet::new();
        for _ in 0..level_count {
            let width = rng.gen_range(config.min_width..=config.max_width);
            let height = rng.gen_range(config.min_height..=config.max_height);
            let wall_density = rng.gen_range(config.min_wall_density..config.max_wall_density);

            let (level, used) =
                generate_level(config, width, height, wall_density, &carried_exclusions, rng)?;
            levels.push(level);
            carried_exclusions.extend(used);
        }

        let start = GridPosition::on_level(0, 0, 0);

        // The exit may coincide with an entity; only walkability constrains it.
        let last_index = level_count - 1;
        let exit_cell = sample_required(&levels[last_index as usize].maze, &HashSet::new(), rng, "exit")?;
        let exit = GridPosition::on_level(exit_cell.x, exit_cell.y, last_index);

        let mut teleport_gates = Vec::with_capacity(last_index as usize);
        for i in 0..last_index as usize {
            let here = sample_required(&levels[i].maze, &HashSet::new(), rng, "teleport gate")?;
            let there = sample_required(&levels[i + 1].maze, &HashSet::new(), rng, "teleport gate")?;
            teleport_gates.push(TeleportGate(
                GridPosition::on_level(here.x, here.y, i as u32),
                GridPosition::on_level(there.x, there.y, i as u32 + 1),
            ));
        }

        let required_blue_gems = levels.iter().map(|l| l.blue_gems.len() as u32).sum();
        let required_red_gems = levels.iter().map(|l| l.red_gems.len() as u32).sum();

        Ok(MapConfig {
            title: format!("Multi-level maze {:03}", self.index),
            start,
            exit,
            levels,
            teleport_gates,
            required_blue_gems,
            required_red_gems,
        })
    }
}

impl Generator<MapConfig> for MapGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> GemmazeResult<MapConfig> {
        match self.kind {
            MapKind::SingleLevel => self.generate_single(config, rng),
            MapKind::MultiLevel => self.generate_multi(config, rng),
        }
    }

    fn validate(&self, content: &MapConfig, _config: &GenerationConfig) -> GemmazeResult<()> {
        utils::validate_map(content)
    }

    fn generator_type(&self) -> &'static str {
        match self.kind {
            MapKind::SingleLevel => "SingleLevelMapGenerator",
            MapKind::MultiLevel => "MultiLevelMapGenerator",
        }
    }
}

/// Generates one level's grid and entity placements.
///
/// Blue gems are placed first, then red gems, then monsters; every sampling
/// round excludes all placements made so far for this level plus the
/// `inherited` set. Returns the level together with the exclusion set
/// extended by this level's placements, for the caller to thread into
/// subsequent levels.
pub fn generate_level(
    config: &GenerationConfig,
    width: u32,
    height: u32,
    wall_density: f64,
    inherited: &HashSet<(u32, u32)>,
    rng: &mut StdRng,
) -> GemmazeResult<(LevelConfig, HashSet<(u32, u32)>)> {
    let maze = build_maze(width, height, wall_density, rng)?;
    let mut used = inherited.clone();

    let blue_count = rng.gen_range(config.min_gems_per_color..=config.max_gems_per_color);
    let blue_gems = sample_positions(&maze, blue_count as usize, &used, rng);
    used.extend(blue_gems.iter().map(|p| p.cell()));

    let red_count = rng.gen_range(config.min_gems_per_color..=config.max_gems_per_color);
    let red_gems = sample_positions(&maze, red_count as usize, &used, rng);
    used.extend(red_gems.iter().map(|p| p.cell()));

    let monster_count = rng.gen_range(config.min_monsters..=config.max_monsters);
    let monsters = sample_positions(&maze, monster_count as usize, &used, rng);
    used.extend(monsters.iter().map(|p| p.cell()));

    Ok((
        LevelConfig {
            maze,
            blue_gems,
            red_gems,
            monsters,
        },
        used,
    ))
}

/// Samples a single mandatory position, failing when no walkable candidate
/// remains.
fn sample_required(
    maze: &MazeGrid,
    exclude: &HashSet<(u32, u32)>,
    rng: &mut StdRng,
    what: &str,
) -> GemmazeResult<GridPosition> {
    sample_positions(maze, 1, exclude, rng)
        .into_iter()
        .next()
        .ok_or_else(|| {
            GemmazeError::GenerationFailed(format!("no walkable cell available for {what}"))
        })
}
