//=========================================================================
// Screen Curtain
//=========================================================================
//
// Full-screen fade used to mask scene transitions.
//
//   show()/hide() → bump fade generation → enable overlay
//                 → per tick: alpha = lerp(from, to, ease(t)) → next_tick
//                 → terminal state (shown: alpha 1 / hidden: disabled)
//
// At most one fade writes to the overlay. Starting any fade, or jumping
// to a terminal state, bumps the generation; an older fade notices on its
// next poll and returns without touching the overlay again.
//
//=========================================================================

//=== Module Declarations =================================================

mod ease;
mod overlay;

//=== Public API ==========================================================

pub use ease::Ease;
pub use overlay::{HeadlessOverlay, Overlay};

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::task::{next_tick, FrameClock};
use ease::lerp;

//=== Settings ============================================================

/// Fade timing and curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurtainSettings {
    /// Seconds per fade.
    pub duration: f32,
    pub show_ease: Ease,
    pub hide_ease: Ease,
}

impl Default for CurtainSettings {
    fn default() -> Self {
        Self {
            duration: 0.5,
            show_ease: Ease::EaseInOut,
            hide_ease: Ease::EaseInOut,
        }
    }
}

/// How an animated fade ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// Reached its target and applied the terminal state.
    Completed,

    /// Another fade or an immediate show/hide started first.
    Superseded,
}

//=== ScreenCurtain =======================================================

struct CurtainState {
    overlay: Box<dyn Overlay>,
    settings: CurtainSettings,
    shown: bool,
    fade_generation: u64,
}

impl CurtainState {
    fn apply_shown(&mut self) {
        self.overlay.set_alpha(1.0);
        self.overlay.set_enabled(true);
        self.shown = true;
    }

    fn apply_hidden(&mut self) {
        self.overlay.set_alpha(0.0);
        self.overlay.set_enabled(false);
        self.shown = false;
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    generation: u64,
    from: f32,
    to: f32,
    ease: Ease,
    duration: f32,
}

/// Shared handle to the curtain overlay.
///
/// Clones control the same curtain. A new curtain starts hidden.
#[derive(Clone)]
pub struct ScreenCurtain {
    state: Rc<RefCell<CurtainState>>,
    clock: FrameClock,
}

impl ScreenCurtain {
    /// Creates a hidden curtain whose fades advance with `clock`.
    pub fn new(overlay: impl Overlay + 'static, settings: CurtainSettings, clock: FrameClock) -> Self {
        Self::from_boxed(Box::new(overlay), settings, clock)
    }

    pub fn from_boxed(overlay: Box<dyn Overlay>, settings: CurtainSettings, clock: FrameClock) -> Self {
        let curtain = Self {
            state: Rc::new(RefCell::new(CurtainState {
                overlay,
                settings,
                shown: false,
                fade_generation: 0,
            })),
            clock,
        };
        curtain.hide_immediate();
        curtain
    }

    /// True once a show reached its terminal state, until the next hide starts.
    pub fn is_shown(&self) -> bool {
        self.state.borrow().shown
    }

    pub fn settings(&self) -> CurtainSettings {
        self.state.borrow().settings
    }

    //--- Immediate ----------------------------------------------------------

    /// Cancels any fade and shows the curtain fully opaque.
    pub fn show_immediate(&self) {
        let mut state = self.state.borrow_mut();
        state.fade_generation += 1;
        state.apply_shown();
        trace!("Curtain shown immediately");
    }

    /// Cancels any fade and hides the curtain.
    pub fn hide_immediate(&self) {
        let mut state = self.state.borrow_mut();
        state.fade_generation += 1;
        state.apply_hidden();
        trace!("Curtain hidden immediately");
    }

    //--- Animated -----------------------------------------------------------

    /// Starts fading in. The previous fade, if any, is cancelled right away;
    /// the returned future drives the new one.
    pub fn show(&self) -> impl Future<Output = FadeOutcome> + 'static {
        let fade = self.begin_fade(1.0);
        let curtain = self.clone();
        async move { curtain.run_fade(fade).await }
    }

    /// Starts fading out. See [`ScreenCurtain::show`].
    pub fn hide(&self) -> impl Future<Output = FadeOutcome> + 'static {
        let fade = self.begin_fade(0.0);
        let curtain = self.clone();
        async move { curtain.run_fade(fade).await }
    }

    //--- Internal Helpers ---------------------------------------------------

    fn begin_fade(&self, to: f32) -> Fade {
        let mut state = self.state.borrow_mut();
        state.fade_generation += 1;
        state.shown = false;
        state.overlay.set_enabled(true);

        let ease = if to > 0.5 {
            state.settings.show_ease
        } else {
            state.settings.hide_ease
        };

        Fade {
            generation: state.fade_generation,
            from: state.overlay.alpha(),
            to,
            ease,
            duration: state.settings.duration.max(0.0),
        }
    }

    fn is_current(&self, fade: &Fade) -> bool {
        self.state.borrow().fade_generation == fade.generation
    }

    async fn run_fade(&self, fade: Fade) -> FadeOutcome {
        let mut elapsed = 0.0_f32;

        while elapsed < fade.duration {
            if !self.is_current(&fade) {
                trace!("Curtain fade superseded");
                return FadeOutcome::Superseded;
            }

            elapsed += self.clock.delta_seconds();
            let t = fade.ease.evaluate(elapsed / fade.duration);
            self.state
                .borrow_mut()
                .overlay
                .set_alpha(lerp(fade.from, fade.to, t));

            next_tick().await;
        }

        if !self.is_current(&fade) {
            trace!("Curtain fade superseded");
            return FadeOutcome::Superseded;
        }

        let mut state = self.state.borrow_mut();
        if fade.to > 0.5 {
            state.apply_shown();
        } else {
            state.apply_hidden();
        }
        FadeOutcome::Completed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
