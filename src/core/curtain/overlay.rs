//=========================================================================
// Curtain Overlay
//=========================================================================
//
// Visual side of the curtain: a full-screen overlay that can be enabled
// and faded. The renderer is an external collaborator; the headless
// implementation only records what it was told.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

//=== Overlay =============================================================

/// Full-screen overlay driven by the screen curtain.
pub trait Overlay {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;

    /// Sets opacity in `[0, 1]`.
    fn set_alpha(&mut self, alpha: f32);
    fn alpha(&self) -> f32;
}

//=== HeadlessOverlay =====================================================

#[derive(Debug, Default)]
struct OverlayState {
    enabled: Cell<bool>,
    alpha: Cell<f32>,
    alpha_writes: Cell<u32>,
}

/// Overlay without visuals. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOverlay {
    state: Rc<OverlayState>,
}

impl HeadlessOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_alpha` calls so far.
    pub fn alpha_writes(&self) -> u32 {
        self.state.alpha_writes.get()
    }
}

impl Overlay for HeadlessOverlay {
    fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled.set(enabled);
    }

    fn is_enabled(&self) -> bool {
        self.state.enabled.get()
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha.set(alpha.clamp(0.0, 1.0));
        self.state.alpha_writes.set(self.state.alpha_writes.get() + 1);
    }

    fn alpha(&self) -> f32 {
        self.state.alpha.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let observer = HeadlessOverlay::new();
        let mut overlay = observer.clone();

        overlay.set_enabled(true);
        overlay.set_alpha(1.5);

        assert!(observer.is_enabled());
        assert_eq!(observer.alpha(), 1.0);
        assert_eq!(observer.alpha_writes(), 1);
    }
}
