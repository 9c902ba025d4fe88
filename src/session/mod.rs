//! # Session Module
//!
//! Everything needed to drive the remote engine through one session: the
//! blocking HTTP client for the engine's action protocol, the persisted
//! progression counter, the on-disk map library, and the controller that
//! ties them together.

pub mod client;
pub mod controller;
pub mod library;
pub mod progress;

pub use client::{EngineAction, EngineApi, GameClient, GemKind, MoveResponse, RemoteGameState};
pub use controller::SessionController;
pub use library::MapLibrary;
pub use progress::ProgressStore;
