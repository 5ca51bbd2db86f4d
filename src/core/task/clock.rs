//=========================================================================
// Frame Clock
//=========================================================================
//
// Per-tick elapsed time source shared by every flow on the core thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

//=== FrameClock ==========================================================

#[derive(Debug, Default)]
struct ClockState {
    delta: Cell<f32>,
    elapsed: Cell<f64>,
    frame: Cell<u64>,
}

/// Shared handle to the current frame's timing.
///
/// Cloning is cheap; all clones observe the same values. Only the
/// scheduler advances the clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    state: Rc<ClockState>,
}

impl FrameClock {
    /// Creates a clock at frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed during the current tick.
    pub fn delta_seconds(&self) -> f32 {
        self.state.delta.get()
    }

    /// Seconds elapsed since the clock was created.
    pub fn elapsed_seconds(&self) -> f64 {
        self.state.elapsed.get()
    }

    /// Number of ticks so far.
    pub fn frame(&self) -> u64 {
        self.state.frame.get()
    }

    pub(crate) fn advance(&self, delta_seconds: f32) {
        let delta = delta_seconds.max(0.0);
        self.state.delta.set(delta);
        self.state.elapsed.set(self.state.elapsed.get() + f64::from(delta));
        self.state.frame.set(self.state.frame.get() + 1);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
