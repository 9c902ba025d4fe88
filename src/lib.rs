//! # Gemmaze
//!
//! Client-side tooling for a remote gem-maze engine.
//!
//! ## Architecture Overview
//!
//! The engine itself (movement rules, collision, rendering) runs in an
//! external service; this crate provides everything around it:
//!
//! - **Data Model**: maze grids, gem/monster placements and the persisted
//!   map-configuration document schema
//! - **Generation System**: procedural single-level and multi-level map
//!   generation with seedable randomness
//! - **Session System**: a blocking HTTP client for the engine's action
//!   protocol, a persisted progression counter, and a controller that
//!   advances through the map library as levels are completed
//!
//! Generation flows one direction, from grid construction through entity
//! placement to a map document on disk. A session is a synchronous
//! request/response loop against the engine, consulting the progression
//! counter whenever the engine reports a completed level.

pub mod generation;
pub mod model;
pub mod session;

pub use generation::{
    build_maze, sample_positions, GenerationConfig, Generator, MapGenerator, MapKind,
};
pub use model::{GridPosition, LevelConfig, MapConfig, MazeGrid, TeleportGate};
pub use session::{
    EngineAction, EngineApi, GameClient, GemKind, MapLibrary, MoveResponse, ProgressStore,
    RemoteGameState, SessionController,
};

/// Core error type for the gemmaze crate.
#[derive(thiserror::Error, Debug)]
pub enum GemmazeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Map document could not be decoded
    #[error("Config decode error: {0}")]
    ConfigDecode(#[from] toml::de::Error),

    /// Map document could not be encoded
    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Persisted map configuration missing, unreadable, or malformed
    #[error("Config load failed: {0}")]
    ConfigLoad(String),

    /// No map configuration available for the requested operation
    #[error("No map configuration available")]
    MissingConfig,

    /// Failure contacting the remote engine
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Internal state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the gemmaze codebase.
pub type GemmazeResult<T> = Result<T, GemmazeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session and generation defaults.
pub mod config {
    /// Base URL of the remote maze engine
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

    /// Directory holding persisted map configuration documents
    pub const DEFAULT_CONFIG_DIR: &str = "configs";

    /// File holding the persisted progression counter
    pub const DEFAULT_PROGRESS_FILE: &str = "level.txt";

    /// Number of map documents produced by a full generation run
    pub const DEFAULT_MAP_COUNT: u32 = 21;
}
