//=========================================================================
// Input Events
//=========================================================================
//
// Platform-independent keyboard events delivered to the core thread.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputState (per-tick key state)
//         ↓
//    Scene states, movement relay
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical key identifier for the keys the client reacts to.
///
/// Represents key location, not the produced character. Anything else the
/// platform reports maps to `Unidentified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Movement ---------------------------------------------------------
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    //--- Commands ---------------------------------------------------------
    Enter,
    Escape,
    Space,
    KeyR,

    /// Keys with no meaning to the client.
    Unidentified,
}

//=== InputEvent ==========================================================

/// A single key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

impl InputEvent {
    pub fn key(&self) -> KeyCode {
        match self {
            InputEvent::KeyDown(key) | InputEvent::KeyUp(key) => *key,
        }
    }
}
