//=========================================================================
// Scene States
//=========================================================================
//
// Per-scene-set behaviour entered by the application controller once a
// transition has finished, and exited when the next one starts.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::ClientContext;
use crate::core::input::InputState;

//=== Destination =========================================================

/// Scene sets the controller can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Menu,
    Gameplay,
}

//=== SceneState ==========================================================

/// Behaviour attached to a loaded scene set.
///
/// Only `update()` is required. Lifecycle hooks default to doing nothing.
pub trait SceneState {
    /// Called once the scene set is loaded and revealed.
    fn on_enter(&mut self, _ctx: &ClientContext) {}

    /// Called when a transition away from this scene set starts.
    fn on_exit(&mut self, _ctx: &ClientContext) {}

    /// Called every tick while the state is current.
    fn update(&mut self, ctx: &ClientContext, input: &InputState);
}

//=== StateFactory ========================================================

/// Creates a fresh state each time a destination is entered.
pub trait StateFactory {
    fn create(&mut self, destination: Destination) -> Box<dyn SceneState>;
}

impl<F> StateFactory for F
where
    F: FnMut(Destination) -> Box<dyn SceneState>,
{
    fn create(&mut self, destination: Destination) -> Box<dyn SceneState> {
        self(destination)
    }
}
