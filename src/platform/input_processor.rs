//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit keyboard events into client InputEvents.
//
//   winit KeyEvent → InputProcessor → InputEvent → InputBuffer
//
// OS key repeats are dropped; the core derives held state itself. Keys
// the client has no use for are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode};

//=== InputProcessor ======================================================

/// Maps winit key events onto the client's key set.
pub(crate) struct InputProcessor;

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Converts a key event, or `None` for repeats and unmapped keys.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        if key_event.repeat {
            return None;
        }

        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => return None,
        };

        self.key_transition(key, key_event.state)
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_transition(&self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }

        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown(key),
            ElementState::Released => InputEvent::KeyUp(key),
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Physical winit key codes to client key codes.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        match code {
            //--- Movement -----------------------------------------------------
            WinitKeyCode::KeyW => KeyCode::KeyW,
            WinitKeyCode::KeyA => KeyCode::KeyA,
            WinitKeyCode::KeyS => KeyCode::KeyS,
            WinitKeyCode::KeyD => KeyCode::KeyD,
            WinitKeyCode::ArrowUp => KeyCode::ArrowUp,
            WinitKeyCode::ArrowDown => KeyCode::ArrowDown,
            WinitKeyCode::ArrowLeft => KeyCode::ArrowLeft,
            WinitKeyCode::ArrowRight => KeyCode::ArrowRight,

            //--- Commands -----------------------------------------------------
            WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::KeyR => KeyCode::KeyR,

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
