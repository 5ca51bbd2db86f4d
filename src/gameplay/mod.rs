//=========================================================================
// Gameplay
//=========================================================================
//
// Scene states of the survival client: the main menu and the networked
// gameplay session.
//
//=========================================================================

//=== Module Declarations =================================================

mod gameplay_state;
mod menu;

//=== Public API ==========================================================

pub use gameplay_state::GameplayState;
pub use menu::MenuState;

//=== Internal Dependencies ===============================================

use std::rc::Rc;

use crate::core::lifecycle::{Destination, SceneState, StateFactory};
use crate::network::{InputRelay, SharedRunner};

//=== ClientStates ========================================================

/// Creates menu and gameplay states sharing one network runner.
pub struct ClientStates {
    runner: SharedRunner,
    relay: InputRelay,
}

impl ClientStates {
    pub fn new(runner: SharedRunner, relay: InputRelay) -> Self {
        Self { runner, relay }
    }
}

impl StateFactory for ClientStates {
    fn create(&mut self, destination: Destination) -> Box<dyn SceneState> {
        match destination {
            Destination::Menu => Box::new(MenuState::new()),
            Destination::Gameplay => Box::new(GameplayState::new(Rc::clone(&self.runner), self.relay)),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use glam::Vec3;

    use crate::config::{ClientConfig, Collaborators};
    use crate::core::curtain::HeadlessOverlay;
    use crate::core::input::{InputEvent, InputState, KeyCode};
    use crate::core::lifecycle::{Client, LoadGameplay};
    use crate::core::scene::HeadlessSceneBackend;
    use crate::network::{LoopbackRunner, NetworkRunner, PlayerRef};

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        client: Client,
        runner: LoopbackRunner,
        backend: HeadlessSceneBackend,
        input: RefCell<InputState>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut config = ClientConfig::default();
            config.curtain.duration = 0.25;

            let runner = LoopbackRunner::new();
            let backend = HeadlessSceneBackend::new(config.scene_names());
            let shared: SharedRunner = Rc::new(RefCell::new(runner.clone()));

            let collaborators = Collaborators {
                scene_backend: Box::new(backend.clone()),
                overlay: Box::new(HeadlessOverlay::new()),
                states: Box::new(ClientStates::new(shared, InputRelay::new(config.input_offset_angle))),
            };

            let fx = Self {
                client: Client::new(&config, collaborators),
                runner,
                backend,
                input: RefCell::new(InputState::new()),
            };
            fx.client.start();
            fx.settle();
            fx
        }

        fn tick(&self, events: &[InputEvent]) {
            let mut input = self.input.borrow_mut();
            input.begin_frame();
            input.process_events(events);
            self.client.tick(0.125, &input);
        }

        fn press(&self, key: KeyCode) {
            self.tick(&[InputEvent::KeyDown(key)]);
            self.tick(&[InputEvent::KeyUp(key)]);
        }

        fn settle(&self) {
            for _ in 0..64 {
                self.tick(&[]);
            }
        }

        fn destination(&self) -> Option<Destination> {
            self.client.controller().current_destination()
        }

        fn enter_gameplay(&self) {
            self.press(KeyCode::Enter);
            self.settle();
            assert_eq!(self.destination(), Some(Destination::Gameplay));
        }
    }

    //--- Menu -------------------------------------------------------------

    #[test]
    fn client_starts_in_menu() {
        let fx = Fixture::new();
        assert_eq!(fx.destination(), Some(Destination::Menu));
        assert_eq!(fx.backend.loaded_content(), vec!["Menu".to_string()]);
    }

    #[test]
    fn escape_in_menu_quits() {
        let fx = Fixture::new();
        fx.press(KeyCode::Escape);
        assert!(fx.client.quit_requested());
    }

    //--- Gameplay ---------------------------------------------------------

    #[test]
    fn start_game_hosts_session_and_spawns_local_avatar() {
        let fx = Fixture::new();
        fx.enter_gameplay();

        assert_eq!(fx.backend.active().as_deref(), Some("Gameplay"));
        assert!(fx.runner.is_running());
        assert!(fx.runner.is_server());

        let avatar = fx.runner.player_object(PlayerRef(0)).expect("local avatar");
        assert_eq!(fx.runner.avatar_position(avatar), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!fx.client.context().curtain().is_shown());
    }

    #[test]
    fn remote_player_gets_its_own_slot() {
        let fx = Fixture::new();
        fx.enter_gameplay();

        fx.runner.join_remote(PlayerRef(2));
        fx.tick(&[]);
        let avatar = fx.runner.player_object(PlayerRef(2)).expect("remote avatar");
        assert_eq!(fx.runner.avatar_position(avatar), Some(Vec3::new(6.0, 1.0, 0.0)));

        fx.runner.disconnect(PlayerRef(2));
        fx.tick(&[]);
        assert_eq!(fx.runner.player_object(PlayerRef(2)), None);
        assert_eq!(fx.runner.object_count(), 1);
    }

    #[test]
    fn movement_is_relayed_to_session() {
        let fx = Fixture::new();
        fx.enter_gameplay();

        fx.tick(&[InputEvent::KeyDown(KeyCode::KeyW)]);
        let input = fx.runner.last_input().expect("input submitted");
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!(input.direction.abs_diff_eq(Vec3::new(half, 0.0, half), 1e-5));
    }

    #[test]
    fn escape_leaves_session_and_returns_to_menu() {
        let fx = Fixture::new();
        fx.enter_gameplay();

        fx.press(KeyCode::Escape);
        assert!(!fx.runner.is_running());
        assert_eq!(fx.runner.object_count(), 0);

        fx.settle();
        assert_eq!(fx.destination(), Some(Destination::Menu));
        assert_eq!(fx.backend.loaded_content(), vec!["Menu".to_string()]);
        assert!(!fx.client.quit_requested());
    }

    #[test]
    fn load_gameplay_while_playing_keeps_session() {
        let fx = Fixture::new();
        fx.enter_gameplay();
        let avatar = fx.runner.player_object(PlayerRef(0));

        fx.client.context().bus().publish(&LoadGameplay);
        assert!(!fx.client.controller().is_loading());
        fx.settle();

        assert!(fx.runner.is_running());
        assert_eq!(fx.runner.player_object(PlayerRef(0)), avatar);
        assert_eq!(fx.destination(), Some(Destination::Gameplay));
    }

    #[test]
    fn failed_session_start_returns_to_menu() {
        let fx = Fixture::new();
        fx.runner.fail_next_start("no region available");

        fx.press(KeyCode::Enter);
        fx.settle();

        assert_eq!(fx.destination(), Some(Destination::Menu));
        assert!(!fx.runner.is_running());
    }

    #[test]
    fn quit_gameplay_is_ignored_before_initialization() {
        let fx = Fixture::new();
        let shared: SharedRunner = Rc::new(RefCell::new(fx.runner.clone()));
        let mut state = GameplayState::new(shared, InputRelay::default());

        assert!(!state.is_initialized());
        assert!(!state.quit_gameplay(fx.client.context()));
    }

    #[test]
    fn second_session_can_start_after_returning_to_menu() {
        let fx = Fixture::new();
        fx.enter_gameplay();
        fx.press(KeyCode::Escape);
        fx.settle();

        fx.enter_gameplay();
        assert!(fx.runner.is_running());
        assert!(fx.runner.player_object(PlayerRef(0)).is_some());
    }
}
