//! Remote engine client.
//!
//! A thin, stateless request/response wrapper over the engine's three HTTP
//! endpoints. One method per verb, no retries, no timeout handling beyond
//! the transport default; every call blocks until the engine answers.
//! Failures propagate untouched as [`GemmazeError::Transport`].

use crate::model::{GridPosition, MapConfig, MazeGrid, TeleportGate};
use crate::GemmazeResult;
use serde::{Deserialize, Serialize};

/// The engine's fixed action verbs, with their exact wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineAction {
    #[serde(rename = "forward")]
    Forward,
    #[serde(rename = "turnLeft")]
    TurnLeft,
    #[serde(rename = "turnRight")]
    TurnRight,
    #[serde(rename = "collect_blue")]
    CollectBlue,
    #[serde(rename = "collect_red")]
    CollectRed,
}

/// Gem color reported by the engine's `onGemType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemKind {
    Blue,
    Red,
}

/// Game state as reported by the engine. Consumed read-only; fields this
/// client does not interpret are preserved in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteGameState {
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub on_gem_type: Option<GemKind>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RemoteGameState {
    /// Whether the engine reports the current level as completed
    /// successfully.
    pub fn is_completed(&self) -> bool {
        self.game_over && self.success
    }
}

/// Envelope returned by `GET /getGameState`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateResponse {
    game_state: RemoteGameState,
}

/// Envelope returned by `POST /move`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub game_state: RemoteGameState,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct MoveRequest {
    action: EngineAction,
}

#[derive(Serialize)]
struct ResetRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<EngineConfig<'a>>,
}

/// Maze cell in the engine's wire format.
#[derive(Serialize)]
struct EngineCell {
    walkable: bool,
}

fn engine_maze(maze: &MazeGrid) -> Vec<Vec<EngineCell>> {
    maze.rows()
        .iter()
        .map(|row| row.iter().map(|&walkable| EngineCell { walkable }).collect())
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineLevel<'a> {
    maze: Vec<Vec<EngineCell>>,
    blue_gems: &'a [GridPosition],
    red_gems: &'a [GridPosition],
    monsters: &'a [GridPosition],
}

/// Engine-side view of a map configuration: maze cells become
/// `{walkable}` objects, single-level maps are sent flattened and
/// multi-level maps nested, mirroring the persisted document shapes.
#[derive(Serialize)]
#[serde(untagged)]
enum EngineConfig<'a> {
    #[serde(rename_all = "camelCase")]
    Single {
        title: &'a str,
        maze: Vec<Vec<EngineCell>>,
        start: GridPosition,
        blue_gems: &'a [GridPosition],
        red_gems: &'a [GridPosition],
        monsters: &'a [GridPosition],
        exit: GridPosition,
        required_blue_gems: u32,
        required_red_gems: u32,
    },
    #[serde(rename_all = "camelCase")]
    Multi {
        title: &'a str,
        start: GridPosition,
        exit: GridPosition,
        levels: Vec<EngineLevel<'a>>,
        teleport_gates: &'a [TeleportGate],
        required_blue_gems: u32,
        required_red_gems: u32,
    },
}

impl<'a> EngineConfig<'a> {
    fn from_map(config: &'a MapConfig) -> Self {
        if config.is_multi_level() {
            EngineConfig::Multi {
                title: &config.title,
                start: config.start,
                exit: config.exit,
                levels: config
                    .levels
                    .iter()
                    .map(|level| EngineLevel {
                        maze: engine_maze(&level.maze),
                        blue_gems: &level.blue_gems,
                        red_gems: &level.red_gems,
                        monsters: &level.monsters,
                    })
                    .collect(),
                teleport_gates: &config.teleport_gates,
                required_blue_gems: config.required_blue_gems,
                required_red_gems: config.required_red_gems,
            }
        } else {
            let level = &config.levels[0];
            EngineConfig::Single {
                title: &config.title,
                maze: engine_maze(&level.maze),
                start: config.start,
                blue_gems: &level.blue_gems,
                red_gems: &level.red_gems,
                monsters: &level.monsters,
                exit: config.exit,
                required_blue_gems: config.required_blue_gems,
                required_red_gems: config.required_red_gems,
            }
        }
    }
}

/// Transport seam between the session controller and the engine.
///
/// The controller only ever talks to this trait; tests substitute a
/// recording implementation.
pub trait EngineApi {
    /// Fetches the current game state.
    fn fetch_state(&self) -> GemmazeResult<RemoteGameState>;

    /// Sends one action verb and returns the engine's response.
    fn send_action(&self, action: EngineAction) -> GemmazeResult<MoveResponse>;

    /// Resets the engine, with a configuration or to the server default.
    fn reset(&self, config: Option<&MapConfig>) -> GemmazeResult<serde_json::Value>;
}

/// Blocking HTTP implementation of [`EngineApi`].
pub struct GameClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl GameClient {
    /// Creates a client for an engine at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

impl EngineApi for GameClient {
    fn fetch_state(&self) -> GemmazeResult<RemoteGameState> {
        let response: StateResponse = self
            .http
            .get(self.endpoint("getGameState"))
            .send()?
            .json()?;
        Ok(response.game_state)
    }

    fn send_action(&self, action: EngineAction) -> GemmazeResult<MoveResponse> {
        Ok(self
            .http
            .post(self.endpoint("move"))
            .json(&MoveRequest { action })
            .send()?
            .json()?)
    }

    fn reset(&self, config: Option<&MapConfig>) -> GemmazeResult<serde_json::Value> {
        let request = ResetRequest {
            config: config.map(EngineConfig::from_map),
        };
        Ok(self
            .http
            .post(self.endpoint("resetGame"))
            .json(&request)
            .send()?
            .json()?)
    }
}
