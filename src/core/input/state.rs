//=========================================================================
// Input State
//=========================================================================
//
// Key state tracking with per-tick deltas.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys held) → query
//
// Tick lifecycle: begin_frame() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};

//=== InputState ==========================================================

/// Keys held across ticks plus the keys pressed or released this tick.
#[derive(Debug, Default)]
pub struct InputState {
    //--- Persistent State (survives tick boundary) -----------------------
    keys_down: HashSet<KeyCode>,

    //--- Tick Deltas (reset by begin_frame) ------------------------------
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears the per-tick deltas.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Applies a batch of events in order.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(*event);
        }
    }

    /// Forgets every held key, e.g. after the window lost focus.
    pub fn release_all(&mut self) {
        self.released.extend(self.keys_down.drain());
    }

    fn process_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(KeyCode::Unidentified) | InputEvent::KeyUp(KeyCode::Unidentified) => {}

            InputEvent::KeyDown(key) => {
                // Only mark as pressed if it wasn't already down
                if self.keys_down.insert(key) {
                    self.pressed.insert(key);
                }
            }

            InputEvent::KeyUp(key) => {
                if self.keys_down.remove(&key) {
                    self.released.insert(key);
                }
            }
        }
    }

    //--- Query API --------------------------------------------------------

    /// Returns `true` while `key` is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if `key` went down during this tick.
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Returns `true` if `key` went up during this tick.
    pub fn was_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Movement vector from WASD and arrow keys: +y forward, +x right.
    ///
    /// Opposing keys cancel out. Diagonals are not normalized.
    pub fn move_axis(&self) -> Vec2 {
        let axis = |positive: [KeyCode; 2], negative: [KeyCode; 2]| {
            let pos = positive.iter().any(|k| self.is_key_down(*k)) as i8;
            let neg = negative.iter().any(|k| self.is_key_down(*k)) as i8;
            f32::from(pos - neg)
        };

        Vec2::new(
            axis([KeyCode::KeyD, KeyCode::ArrowRight], [KeyCode::KeyA, KeyCode::ArrowLeft]),
            axis([KeyCode::KeyW, KeyCode::ArrowUp], [KeyCode::KeyS, KeyCode::ArrowDown]),
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_for_one_frame_only() {
        let mut state = InputState::new();

        state.begin_frame();
        state.process_events(&[InputEvent::KeyDown(KeyCode::Enter)]);
        assert!(state.was_pressed(KeyCode::Enter));
        assert!(state.is_key_down(KeyCode::Enter));

        state.begin_frame();
        assert!(!state.was_pressed(KeyCode::Enter));
        assert!(state.is_key_down(KeyCode::Enter));
    }

    #[test]
    fn repeated_key_down_does_not_press_again() {
        let mut state = InputState::new();
        state.process_events(&[InputEvent::KeyDown(KeyCode::Space)]);

        state.begin_frame();
        state.process_events(&[InputEvent::KeyDown(KeyCode::Space)]);
        assert!(!state.was_pressed(KeyCode::Space));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::new();
        state.process_events(&[InputEvent::KeyUp(KeyCode::Escape)]);
        assert!(!state.was_released(KeyCode::Escape));
    }

    #[test]
    fn tap_within_one_frame_counts_as_press() {
        let mut state = InputState::new();
        state.process_events(&[
            InputEvent::KeyDown(KeyCode::Escape),
            InputEvent::KeyUp(KeyCode::Escape),
        ]);

        assert!(state.was_pressed(KeyCode::Escape));
        assert!(state.was_released(KeyCode::Escape));
        assert!(!state.is_key_down(KeyCode::Escape));
    }

    #[test]
    fn move_axis_combines_keys() {
        let mut state = InputState::new();
        state.process_events(&[
            InputEvent::KeyDown(KeyCode::KeyW),
            InputEvent::KeyDown(KeyCode::ArrowRight),
        ]);
        assert_eq!(state.move_axis(), Vec2::new(1.0, 1.0));

        state.process_events(&[InputEvent::KeyDown(KeyCode::KeyS)]);
        assert_eq!(state.move_axis(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut state = InputState::new();
        state.process_events(&[InputEvent::KeyDown(KeyCode::KeyA)]);

        state.begin_frame();
        state.release_all();
        assert!(!state.is_key_down(KeyCode::KeyA));
        assert!(state.was_released(KeyCode::KeyA));
        assert_eq!(state.move_axis(), Vec2::ZERO);
    }
}
