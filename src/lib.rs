//=========================================================================
// Survival Client Library Root
//
// Game-client core: scene-set transitions behind a screen curtain, a
// typed pub/sub bus, a cooperative per-tick task scheduler, and the
// networked gameplay session (player spawning and movement relay).
//
// Typical usage:
// ```no_run
// use survival_client::ApplicationBuilder;
//
// fn main() -> Result<(), survival_client::PlatformError> {
//     ApplicationBuilder::new().build().run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the client systems (tasks, pub/sub, scenes, curtain, input,
// lifecycle). `gameplay` and `network` hold the two scene states and the
// session they drive.
//
pub mod config;
pub mod core;
pub mod gameplay;
pub mod network;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit window and event loop; `engine` wires it to
// the core thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Application, ApplicationBuilder};
