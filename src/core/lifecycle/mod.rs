//=========================================================================
// Application Lifecycle
//=========================================================================
//
// Architecture:
//   Client
//     ├─ ClientContext (bus, scheduler, curtain, scene loader)
//     └─ ApplicationController
//          ├─ listens: QuitApplication, LoadMenu, LoadGameplay,
//          │           RestartApplication
//          └─ current: Box<dyn SceneState> (from a StateFactory)
//
//=========================================================================

//=== Module Declarations =================================================

mod client;
mod context;
mod controller;
mod messages;
mod state;

//=== Public API ==========================================================

pub use client::Client;
pub use context::ClientContext;
pub use controller::ApplicationController;
pub use messages::{LoadGameplay, LoadMenu, QuitApplication, RestartApplication};
pub use state::{Destination, SceneState, StateFactory};
