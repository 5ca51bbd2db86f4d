//=========================================================================
// Client Configuration
//=========================================================================
//
// Plain settings (`ClientConfig`) cross from the main thread to the core
// thread. Collaborators hold `Rc` state, so they are created on the core
// thread by a `CollaboratorFactory` that only captures `Send` data.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::curtain::{CurtainSettings, HeadlessOverlay, Overlay};
use crate::core::lifecycle::StateFactory;
use crate::core::scene::{GameScene, HeadlessSceneBackend, SceneBackend};
use crate::gameplay::ClientStates;
use crate::network::{InputRelay, LoopbackRunner, SharedRunner};

//=== ClientConfig ========================================================

/// Settings shared by the core loop and the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Core loop ticks per second.
    pub tps: f64,

    /// Capacity of the platform → core channel.
    pub channel_capacity: usize,

    pub curtain: CurtainSettings,
    pub menu_scenes: Vec<GameScene>,
    pub gameplay_scenes: Vec<GameScene>,

    /// Yaw applied to movement input, in degrees.
    pub input_offset_angle: f32,

    pub window_title: String,
}

impl ClientConfig {
    /// Every scene named by either set.
    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.menu_scenes
            .iter()
            .chain(&self.gameplay_scenes)
            .map(GameScene::name)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            curtain: CurtainSettings::default(),
            menu_scenes: vec![GameScene::new("Menu", 0)],
            gameplay_scenes: vec![GameScene::new("Gameplay", 1), GameScene::new("GameplayUI", 0)],
            input_offset_angle: 45.0,
            window_title: "Survival".to_string(),
        }
    }
}

//=== Collaborators =======================================================

/// External collaborators the client drives.
pub struct Collaborators {
    pub scene_backend: Box<dyn SceneBackend>,
    pub overlay: Box<dyn Overlay>,
    pub states: Box<dyn StateFactory>,
}

impl Collaborators {
    /// In-memory scene backend and overlay with a loopback network session.
    pub fn headless(config: &ClientConfig) -> Self {
        let runner: SharedRunner = Rc::new(RefCell::new(LoopbackRunner::new()));
        Self {
            scene_backend: Box::new(HeadlessSceneBackend::new(config.scene_names())),
            overlay: Box::new(HeadlessOverlay::new()),
            states: Box::new(ClientStates::new(runner, InputRelay::new(config.input_offset_angle))),
        }
    }
}

/// Builds the collaborators on the core thread.
pub type CollaboratorFactory = Box<dyn FnOnce(&ClientConfig) -> Collaborators + Send>;

//=========================================================================
// Unit Tests
//=========================================================================
