//! # Data Model
//!
//! Maze grids, entity placements, and the persisted map-configuration
//! document schema.
//!
//! A [`MapConfig`] is always uniform in memory (a list of levels plus
//! map-scoped start/exit/gate positions). On disk the document is flattened
//! for single-level maps (top-level `maze`, `blueGems`, ... fields) and
//! nested under `levels` for multi-level maps; the serde conversions below
//! hide that split from the rest of the crate.

use crate::{GemmazeError, GemmazeResult};
use serde::{Deserialize, Serialize};

/// A grid coordinate, optionally qualified by level for multi-level maps.
///
/// Per-level entity lists store bare `{x, y}` coordinates; map-scoped
/// positions (start, exit, teleport gates) carry the level they live on.
///
/// # Examples
///
/// ```
/// use gemmaze::GridPosition;
///
/// let pos = GridPosition::new(3, 1);
/// assert_eq!(pos.level_index(), 0);
///
/// let gate_side = GridPosition::on_level(3, 1, 2);
/// assert_eq!(gate_side.level_index(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
    /// Level qualifier; omitted from documents when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl GridPosition {
    /// Creates an unqualified position.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y, level: None }
    }

    /// Creates a level-qualified position.
    pub fn on_level(x: u32, y: u32, level: u32) -> Self {
        Self {
            x,
            y,
            level: Some(level),
        }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// The level this position lives on, defaulting to 0 when unqualified.
    pub fn level_index(&self) -> u32 {
        self.level.unwrap_or(0)
    }

    /// The bare grid cell, without the level qualifier.
    pub fn cell(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

/// Rectangular walkability grid, `height` rows of `width` cells.
///
/// `true` marks a walkable cell. Grids produced by the generator always
/// keep (0,0), (1,0) and (0,1) walkable so the start has a legal first move
/// in two directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct MazeGrid {
    rows: Vec<Vec<bool>>,
}

impl MazeGrid {
    /// Builds a grid from raw rows, validating that the grid is non-empty
    /// and rectangular.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> GemmazeResult<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(GemmazeError::InvalidState(
                "maze grid must have at least one row and one column".to_string(),
            ));
        }
        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(GemmazeError::InvalidState(
                "maze grid rows must all have the same length".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.rows[0].len() as u32
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.rows[0].len()
    }

    /// Whether the cell at (x, y) is walkable. Out-of-bounds cells are not.
    pub fn is_walkable(&self, x: u32, y: u32) -> bool {
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Iterates over all walkable cells in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, walkable)| **walkable)
                .map(move |(x, _)| (x as u32, y as u32))
        })
    }

    /// Raw row access for serialization and wire conversion.
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }
}

impl TryFrom<Vec<Vec<bool>>> for MazeGrid {
    type Error = GemmazeError;

    fn try_from(rows: Vec<Vec<bool>>) -> GemmazeResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<MazeGrid> for Vec<Vec<bool>> {
    fn from(grid: MazeGrid) -> Self {
        grid.rows
    }
}

/// One self-contained level: a grid plus its entity placements.
///
/// Invariant: the three placement lists are pairwise disjoint and every
/// position is walkable in `maze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub maze: MazeGrid,
    pub blue_gems: Vec<GridPosition>,
    pub red_gems: Vec<GridPosition>,
    pub monsters: Vec<GridPosition>,
}

impl LevelConfig {
    /// Iterates over every entity placement on this level.
    pub fn placements(&self) -> impl Iterator<Item = &GridPosition> {
        self.blue_gems
            .iter()
            .chain(self.red_gems.iter())
            .chain(self.monsters.iter())
    }
}

/// Paired coordinates permitting a cross-level transition: stepping on the
/// first position moves the actor to the second.
///
/// Serialized as a two-element array, one entry per adjacent level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportGate(pub GridPosition, pub GridPosition);

impl TeleportGate {
    /// Gate side on the lower level.
    pub fn entry(&self) -> GridPosition {
        self.0
    }

    /// Gate side on the upper level.
    pub fn exit(&self) -> GridPosition {
        self.1
    }
}

/// A complete, titled map configuration.
///
/// Invariants: `required_blue_gems`/`required_red_gems` equal the summed
/// gem counts across levels; `teleport_gates` holds exactly
/// `levels.len() - 1` pairs, pair *i* linking level *i* to level *i+1*;
/// `start` is on level 0 and `exit` on the last level.
///
/// The generator fully constructs a `MapConfig` before it is persisted or
/// transmitted; the session controller replaces its active config wholesale
/// on level advance, never mutating it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MapDocument", into = "MapDocument")]
pub struct MapConfig {
    pub title: String,
    pub start: GridPosition,
    pub exit: GridPosition,
    pub levels: Vec<LevelConfig>,
    pub teleport_gates: Vec<TeleportGate>,
    pub required_blue_gems: u32,
    pub required_red_gems: u32,
}

impl MapConfig {
    /// Number of levels in this map.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Whether this map uses the nested multi-level document shape.
    pub fn is_multi_level(&self) -> bool {
        self.levels.len() > 1
    }

    /// Decodes a persisted map document.
    pub fn from_toml(text: &str) -> GemmazeResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Encodes this map as a persisted document.
    pub fn to_toml(&self) -> GemmazeResult<String> {
        Ok(toml::to_string(self)?)
    }
}

/// On-disk document shapes: single-level maps flatten the lone level's
/// fields to the top, multi-level maps nest them under `levels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MapDocument {
    #[serde(rename_all = "camelCase")]
    MultiLevel {
        title: String,
        start: GridPosition,
        exit: GridPosition,
        levels: Vec<LevelConfig>,
        teleport_gates: Vec<TeleportGate>,
        required_blue_gems: u32,
        required_red_gems: u32,
    },
    #[serde(rename_all = "camelCase")]
    SingleLevel {
        title: String,
        maze: MazeGrid,
        start: GridPosition,
        blue_gems: Vec<GridPosition>,
        red_gems: Vec<GridPosition>,
        monsters: Vec<GridPosition>,
        exit: GridPosition,
        required_blue_gems: u32,
        required_red_gems: u32,
    },
}

impl From<MapDocument> for MapConfig {
    fn from(doc: MapDocument) -> Self {
        match doc {
            MapDocument::MultiLevel {
                title,
                start,
                exit,
                levels,
                teleport_gates,
                required_blue_gems,
                required_red_gems,
            } => Self {
                title,
                start,
                exit,
                levels,
                teleport_gates,
                required_blue_gems,
                required_red_gems,
            },
            MapDocument::SingleLevel {
                title,
                maze,
                start,
                blue_gems,
                red_gems,
                monsters,
                exit,
                required_blue_gems,
                required_red_gems,
            } => Self {
                title,
                start,
                exit,
                levels: vec![LevelConfig {
                    maze,
                    blue_gems,
                    red_gems,
                    monsters,
                }],
                teleport_gates: Vec::new(),
                required_blue_gems,
                required_red_gems,
            },
        }
    }
}

impl From<MapConfig> for MapDocument {
    fn from(config: MapConfig) -> Self {
        let MapConfig {
            title,
            start,
            exit,
            mut levels,
            teleport_gates,
            required_blue_gems,
            required_red_gems,
        } = config;

        if levels.len() == 1 && teleport_gates.is_empty() {
            let level = levels.remove(0);
            MapDocument::SingleLevel {
                title,
                maze: level.maze,
                start,
                blue_gems: level.blue_gems,
                red_gems: level.red_gems,
                monsters: level.monsters,
                exit,
                required_blue_gems,
                required_red_gems,
            }
        } else {
            MapDocument::MultiLevel {
                title,
                start,
                exit,
                levels,
                teleport_gates,
                required_blue_gems,
                required_red_gems,
            }
        }
    }
}
