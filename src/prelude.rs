//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use survival_client::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::config::{ClientConfig, Collaborators};
pub use crate::engine::{Application, ApplicationBuilder};

// Lifecycle
pub use crate::core::lifecycle::{
    ApplicationController, Client, ClientContext, Destination, LoadGameplay, LoadMenu,
    QuitApplication, RestartApplication, SceneState, StateFactory,
};

// Scenes and curtain
pub use crate::core::curtain::{CurtainSettings, Ease, Overlay, ScreenCurtain};
pub use crate::core::scene::{GameScene, SceneBackend, SceneError, SceneLoader};

// Tasks and messaging
pub use crate::core::pubsub::PubSub;
pub use crate::core::task::{AsyncOperation, OperationStatus, Scheduler};

// Input
pub use crate::core::input::{InputEvent, InputState, KeyCode};

// Network
pub use crate::network::{GameMode, NetworkRunner, PlayerRef};
