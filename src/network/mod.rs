//=========================================================================
// Networking
//=========================================================================
//
// Thin layer over the session SDK. Transport, replication and matchmaking
// belong to the `NetworkRunner` collaborator; this module supplies the
// glue the gameplay state needs around it.
//
// Architecture:
//   GameplayState
//     ├─ NetworkRunner::start_game()  → AsyncOperation (session start)
//     ├─ poll_events() → PlayerSpawner (spawn/despawn avatars)
//     └─ InputRelay → submit_input(NetworkInputData)
//
//=========================================================================

//=== Module Declarations =================================================

mod input;
mod loopback;
mod spawner;

//=== Public API ==========================================================

pub use input::{InputRelay, NetworkInputData};
pub use loopback::LoopbackRunner;
pub use spawner::PlayerSpawner;

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::task::AsyncOperation;

//=== Identifiers =========================================================

/// Connection identity assigned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerRef(pub u32);

impl PlayerRef {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Handle to a replicated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkObjectId(pub u64);

impl fmt::Display for NetworkObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

//=== Session Types =======================================================

/// How the runner joins or creates a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Offline session with a single local player.
    Single,
    Host,
    Client,

    /// Joins an existing session, or hosts one if none is found.
    #[default]
    AutoHostOrClient,
}

/// Session notifications drained once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEvent {
    PlayerJoined(PlayerRef),
    PlayerLeft(PlayerRef),
}

/// Networking errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("network session is not running")]
    NotRunning,

    #[error("network session is already running")]
    AlreadyRunning,

    #[error("unknown network object {0}")]
    UnknownObject(NetworkObjectId),
}

//=== NetworkRunner =======================================================

/// Session collaborator.
///
/// Implementations live on the core thread and are shared between the
/// gameplay states through [`SharedRunner`].
pub trait NetworkRunner {
    /// Starts or joins a session. The operation completes once the local
    /// player is connected, or fails with the SDK's reason.
    fn start_game(&mut self, mode: GameMode) -> Result<Box<dyn AsyncOperation>, NetworkError>;

    /// Leaves the session and releases everything it owned. No-op when idle.
    fn leave(&mut self);

    fn is_running(&self) -> bool;

    /// True if this peer has state authority (host or server).
    fn is_server(&self) -> bool;

    /// Player slots of the session.
    fn default_players(&self) -> u32;

    fn spawn_avatar(&mut self, position: Vec3, owner: PlayerRef) -> Result<NetworkObjectId, NetworkError>;

    fn despawn(&mut self, object: NetworkObjectId) -> Result<(), NetworkError>;

    /// Associates an avatar with its player.
    fn set_player_object(&mut self, player: PlayerRef, object: NetworkObjectId) -> Result<(), NetworkError>;

    /// Drains pending session events in arrival order.
    fn poll_events(&mut self) -> Vec<RunnerEvent>;

    /// Submits the local player's input for the current tick.
    fn submit_input(&mut self, input: NetworkInputData);
}

/// Runner handle shared by the states of one client.
pub type SharedRunner = Rc<RefCell<dyn NetworkRunner>>;
