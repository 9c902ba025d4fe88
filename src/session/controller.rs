//! Session controller.
//!
//! Composes the transport client, the persisted progression counter and the
//! map library into one session against the remote engine. Every call is
//! synchronous: no request is ever outstanding when a method returns.

use crate::model::MapConfig;
use crate::session::{
    EngineAction, EngineApi, GemKind, MapLibrary, MoveResponse, ProgressStore, RemoteGameState,
};
use crate::{GemmazeError, GemmazeResult};

/// Drives one session against the remote engine.
///
/// Constructing a controller loads the map configuration matching the
/// persisted progression index but sends nothing to the engine; the program
/// entry point decides when to issue the first
/// [`reset_game`](Self::reset_game). When a `move_forward` response reports
/// a completed level, the controller advances the persisted index, reloads
/// the next configuration (wrapping around the library) and resets the
/// engine with it.
pub struct SessionController<E: EngineApi> {
    client: E,
    progress: ProgressStore,
    library: MapLibrary,
    active: Option<MapConfig>,
}

impl<E: EngineApi> SessionController<E> {
    /// Creates a controller and loads the configuration for the current
    /// persisted index. No request is sent to the engine.
    pub fn new(client: E, progress: ProgressStore, library: MapLibrary) -> Self {
        let active = library.load_index(progress.read());
        Self {
            client,
            progress,
            library,
            active,
        }
    }

    /// The currently loaded map configuration, if any.
    pub fn active_config(&self) -> Option<&MapConfig> {
        self.active.as_ref()
    }

    /// Fetches the engine's current game state.
    pub fn game_state(&self) -> GemmazeResult<RemoteGameState> {
        self.client.fetch_state()
    }

    /// Moves the actor forward.
    ///
    /// When the embedded state reports `gameOver && success`, the level
    /// advance runs before the original move response is returned: one
    /// progression write, a reload at the new index, one engine reset with
    /// the newly loaded configuration.
    pub fn move_forward(&mut self) -> GemmazeResult<MoveResponse> {
        let response = self.client.send_action(EngineAction::Forward)?;
        if response.game_state.is_completed() {
            self.next_level()?;
        }
        Ok(response)
    }

    /// Turns the actor left. Pure pass-through.
    pub fn turn_left(&self) -> GemmazeResult<MoveResponse> {
        self.client.send_action(EngineAction::TurnLeft)
    }

    /// Turns the actor right. Pure pass-through.
    pub fn turn_right(&self) -> GemmazeResult<MoveResponse> {
        self.client.send_action(EngineAction::TurnRight)
    }

    /// Collects the blue gem under the actor.
    pub fn collect_blue_gem(&self) -> GemmazeResult<MoveResponse> {
        self.client.send_action(EngineAction::CollectBlue)
    }

    /// Collects the red gem under the actor.
    pub fn collect_red_gem(&self) -> GemmazeResult<MoveResponse> {
        self.client.send_action(EngineAction::CollectRed)
    }

    /// Whether the actor currently stands on a blue gem.
    pub fn is_on_blue_gem(&self) -> GemmazeResult<bool> {
        Ok(self.client.fetch_state()?.on_gem_type == Some(GemKind::Blue))
    }

    /// Whether the actor currently stands on a red gem.
    pub fn is_on_red_gem(&self) -> GemmazeResult<bool> {
        Ok(self.client.fetch_state()?.on_gem_type == Some(GemKind::Red))
    }

    /// Resets the engine with `custom`, or with the loaded configuration
    /// when no custom one is supplied.
    ///
    /// Fails with [`GemmazeError::MissingConfig`] when neither is
    /// available; the library has already logged why the load failed.
    pub fn reset_game(&self, custom: Option<&MapConfig>) -> GemmazeResult<serde_json::Value> {
        match custom.or(self.active.as_ref()) {
            Some(config) => self.client.reset(Some(config)),
            None => {
                log::error!("reset requested but no map configuration is available");
                Err(GemmazeError::MissingConfig)
            }
        }
    }

    /// Advances to the next map and resets the engine with it.
    fn next_level(&mut self) -> GemmazeResult<()> {
        let next = self.progress.advance()?;
        self.active = self.library.load_index(next);
        log::info!("level completed, advancing to map index {next}");
        self.reset_game(None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{utils, GenerationConfig, Generator, MapGenerator};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct EngineLog {
        actions: Vec<EngineAction>,
        resets: Vec<Option<String>>,
        state_fetches: usize,
    }

    /// Engine double that answers every request from a fixed state and
    /// records what it was asked.
    struct ScriptedEngine {
        state: RemoteGameState,
        log: Rc<RefCell<EngineLog>>,
    }

    impl ScriptedEngine {
        fn new(state: RemoteGameState) -> (Self, Rc<RefCell<EngineLog>>) {
            let log = Rc::new(RefCell::new(EngineLog::default()));
            (
                Self {
                    state,
                    log: Rc::clone(&log),
                },
                log,
            )
        }
    }

    impl EngineApi for ScriptedEngine {
        fn fetch_state(&self) -> GemmazeResult<RemoteGameState> {
            self.log.borrow_mut().state_fetches += 1;
            Ok(self.state.clone())
        }

        fn send_action(&self, action: EngineAction) -> GemmazeResult<MoveResponse> {
            self.log.borrow_mut().actions.push(action);
            Ok(MoveResponse {
                game_state: self.state.clone(),
                message: None,
            })
        }

        fn reset(&self, config: Option<&MapConfig>) -> GemmazeResult<serde_json::Value> {
            self.log
                .borrow_mut()
                .resets
                .push(config.map(|c| c.title.clone()));
            Ok(serde_json::json!({"status": "reset"}))
        }
    }

    fn completed_state() -> RemoteGameState {
        RemoteGameState {
            game_over: true,
            success: true,
            ..Default::default()
        }
    }

    /// Seeds a library with three maps and returns it with its titles.
    fn seeded_library(dir: &tempfile::TempDir) -> (MapLibrary, Vec<String>) {
        let library = MapLibrary::new(dir.path().join("configs"));
        let mut titles = Vec::new();
        for i in 1..=3u32 {
            let config = GenerationConfig::multi_level(i as u64);
            let mut rng = utils::create_rng(&config);
            let map = MapGenerator::multi_level(i)
                .generate(&config, &mut rng)
                .unwrap();
            titles.push(map.title.clone());
            library.save_new(i, &map).unwrap();
        }
        (library, titles)
    }

    fn controller_in(
        dir: &tempfile::TempDir,
        state: RemoteGameState,
    ) -> (SessionController<ScriptedEngine>, Rc<RefCell<EngineLog>>, Vec<String>) {
        let (engine, log) = ScriptedEngine::new(state);
        let (library, titles) = seeded_library(dir);
        let progress = ProgressStore::new(dir.path().join("level.txt"));
        (SessionController::new(engine, progress, library), log, titles)
    }

    #[test]
    fn test_construction_loads_config_without_remote_calls() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, log, titles) = controller_in(&dir, RemoteGameState::default());

        assert_eq!(controller.active_config().unwrap().title, titles[0]);
        let log = log.borrow();
        assert!(log.actions.is_empty());
        assert!(log.resets.is_empty());
        assert_eq!(log.state_fetches, 0);
    }

    #[test]
    fn test_move_forward_without_completion_does_not_advance() {
        let dir = tempfile::tempdir().unwrap();
        let (mut controller, log, titles) = controller_in(&dir, RemoteGameState::default());

        let response = controller.move_forward().unwrap();
        assert!(!response.game_state.is_completed());
        assert_eq!(log.borrow().actions, vec![EngineAction::Forward]);
        assert!(log.borrow().resets.is_empty());
        assert_eq!(ProgressStore::new(dir.path().join("level.txt")).read(), 0);
        assert_eq!(controller.active_config().unwrap().title, titles[0]);
    }

    #[test]
    fn test_completed_move_advances_once_and_resets_with_next_config() {
        let dir = tempfile::tempdir().unwrap();
        let (mut controller, log, titles) = controller_in(&dir, completed_state());

        let response = controller.move_forward().unwrap();
        assert!(response.game_state.is_completed());

        // Exactly one persisted write (0 -> 1) and one reset, carrying the
        // newly selected configuration.
        assert_eq!(ProgressStore::new(dir.path().join("level.txt")).read(), 1);
        let log = log.borrow();
        assert_eq!(log.resets.len(), 1);
        assert_eq!(log.resets[0].as_deref(), Some(titles[1].as_str()));
        assert_eq!(controller.active_config().unwrap().title, titles[1]);
    }

    #[test]
    fn test_pass_through_actions_never_advance() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, log, _) = controller_in(&dir, completed_state());

        controller.turn_left().unwrap();
        controller.turn_right().unwrap();
        controller.collect_blue_gem().unwrap();
        controller.collect_red_gem().unwrap();

        let log = log.borrow();
        assert_eq!(
            log.actions,
            vec![
                EngineAction::TurnLeft,
                EngineAction::TurnRight,
                EngineAction::CollectBlue,
                EngineAction::CollectRed,
            ]
        );
        assert!(log.resets.is_empty());
        assert_eq!(ProgressStore::new(dir.path().join("level.txt")).read(), 0);
    }

    #[test]
    fn test_gem_queries_read_on_gem_type() {
        let dir = tempfile::tempdir().unwrap();
        let state = RemoteGameState {
            on_gem_type: Some(GemKind::Blue),
            ..Default::default()
        };
        let (controller, log, _) = controller_in(&dir, state);

        assert!(controller.is_on_blue_gem().unwrap());
        assert!(!controller.is_on_red_gem().unwrap());
        assert_eq!(log.borrow().state_fetches, 2);
        assert!(log.borrow().actions.is_empty());
    }

    #[test]
    fn test_reset_prefers_custom_config() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, log, titles) = controller_in(&dir, RemoteGameState::default());

        let config = GenerationConfig::single_level(99);
        let mut rng = utils::create_rng(&config);
        let custom = MapGenerator::single_level(9)
            .generate(&config, &mut rng)
            .unwrap();

        controller.reset_game(Some(&custom)).unwrap();
        controller.reset_game(None).unwrap();

        let log = log.borrow();
        assert_eq!(log.resets[0].as_deref(), Some(custom.title.as_str()));
        assert_eq!(log.resets[1].as_deref(), Some(titles[0].as_str()));
    }

    #[test]
    fn test_reset_without_any_config_fails_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, log) = ScriptedEngine::new(RemoteGameState::default());
        let library = MapLibrary::new(dir.path().join("empty-configs"));
        let progress = ProgressStore::new(dir.path().join("level.txt"));
        let controller = SessionController::new(engine, progress, library);

        assert!(controller.active_config().is_none());
        assert!(matches!(
            controller.reset_game(None),
            Err(GemmazeError::MissingConfig)
        ));
        assert!(log.borrow().resets.is_empty());
    }
}
