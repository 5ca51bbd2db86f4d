//=========================================================================
// Input System
//=========================================================================
//
// Keyboard input as seen by the core thread. The platform layer converts
// window events to `InputEvent`s; the core loop feeds each tick's batch
// into `InputState`, which scene states query.
//
//=========================================================================

//=== Module Declarations =================================================

mod event;
mod state;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode};
pub use state::InputState;
