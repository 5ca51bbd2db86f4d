//=========================================================================
// Menu State
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::input::{InputState, KeyCode};
use crate::core::lifecycle::{ClientContext, LoadGameplay, QuitApplication, SceneState};

//=== MenuState ===========================================================

/// Main menu: start a game or quit.
///
/// Enter starts, Escape quits.
#[derive(Debug, Default)]
pub struct MenuState;

impl MenuState {
    pub fn new() -> Self {
        Self
    }

    pub fn start_game(&self, ctx: &ClientContext) {
        info!("Start game requested from menu");
        ctx.bus().publish(&LoadGameplay);
    }

    pub fn quit(&self, ctx: &ClientContext) {
        ctx.bus().publish(&QuitApplication);
    }
}

impl SceneState for MenuState {
    fn update(&mut self, ctx: &ClientContext, input: &InputState) {
        if input.was_pressed(KeyCode::Enter) {
            self.start_game(ctx);
        } else if input.was_pressed(KeyCode::Escape) {
            self.quit(ctx);
        }
    }
}
