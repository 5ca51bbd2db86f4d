//=========================================================================
// Application Controller
//=========================================================================
//
// Top-level lifecycle: reacts to lifecycle messages on the bus and
// sequences scene-set transitions.
//
// Transition flow (one scheduler task):
//   exit current state → curtain.show() → unload old set → load new set
//   → curtain.hide() → clear is_loading → enter new state
//
// Only one transition runs at a time. Requests arriving while one is in
// progress (or while restarting) are dropped, not queued, as are requests
// for the destination already entered.
//
// The new state is entered with the curtain down and the guard clear, so
// it may request the next transition straight from `on_enter`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use super::messages::{LoadGameplay, LoadMenu, QuitApplication, RestartApplication};
use super::{ClientContext, Destination, SceneState, StateFactory};
use crate::core::input::{InputState, KeyCode};
use crate::core::pubsub::Listener;
use crate::core::scene::{GameScene, SceneError};
use crate::core::task::wait_until;

//=== Listeners ===========================================================

struct Listeners {
    quit: Listener,
    load_menu: Listener,
    load_gameplay: Listener,
    restart: Listener,
}

//=== ControllerInner =====================================================

struct ControllerInner {
    ctx: ClientContext,
    menu_scenes: Vec<GameScene>,
    gameplay_scenes: Vec<GameScene>,
    states: RefCell<Box<dyn StateFactory>>,
    current: RefCell<Option<(Destination, Box<dyn SceneState>)>>,
    listeners: RefCell<Option<Listeners>>,

    is_loading: Cell<bool>,
    is_restarting: Cell<bool>,
    quit_requested: Cell<bool>,
}

impl ControllerInner {
    fn scene_sets(&self, destination: Destination) -> (Vec<GameScene>, Vec<GameScene>) {
        match destination {
            Destination::Menu => (self.gameplay_scenes.clone(), self.menu_scenes.clone()),
            Destination::Gameplay => (self.menu_scenes.clone(), self.gameplay_scenes.clone()),
        }
    }

    fn exit_current_state(&self) {
        let current = self.current.borrow_mut().take();
        if let Some((destination, mut state)) = current {
            debug!("Exiting {:?} state", destination);
            state.on_exit(&self.ctx);
        }
    }

    fn enter_state(&self, destination: Destination) {
        let mut state = self.states.borrow_mut().create(destination);
        debug!("Entering {:?} state", destination);
        state.on_enter(&self.ctx);
        *self.current.borrow_mut() = Some((destination, state));
    }

    async fn swap_scenes(&self, unload: &[GameScene], load: &[GameScene]) -> Result<(), SceneError> {
        for scene in unload {
            self.ctx.loader().unload(scene).await?;
        }
        for scene in load {
            self.ctx.loader().load(scene).await?;
        }
        Ok(())
    }

    /// Expects `is_loading` to be set by the caller.
    async fn run_transition(self: Rc<Self>, unload: Vec<GameScene>, load: Vec<GameScene>, destination: Destination) {
        info!("Transition to {:?} started", destination);

        self.exit_current_state();
        self.ctx.curtain().show().await;

        if let Err(err) = self.swap_scenes(&unload, &load).await {
            error!("Transition to {:?} aborted: {}", destination, err);
            self.is_loading.set(false);
            return;
        }

        self.ctx.curtain().hide().await;
        self.is_loading.set(false);
        self.enter_state(destination);

        info!("Transition to {:?} finished", destination);
    }

    async fn run_restart(self: Rc<Self>) {
        info!("Restarting application");

        let inner = Rc::clone(&self);
        wait_until(move || !inner.is_loading.get()).await;

        // Everything currently loaded goes, then the menu comes back.
        self.is_loading.set(true);
        let unload = self.ctx.loader().loaded_scenes();
        let load = self.menu_scenes.clone();
        Rc::clone(&self).run_transition(unload, load, Destination::Menu).await;

        self.is_restarting.set(false);
    }
}

//=== ApplicationController ===============================================

/// Owns the lifecycle of the client session.
///
/// Cloning is cheap; all clones drive the same controller. Bus listeners
/// hold weak references, so dropping every clone releases the controller
/// even if `shutdown` was never called.
#[derive(Clone)]
pub struct ApplicationController {
    inner: Rc<ControllerInner>,
}

impl ApplicationController {
    //--- Construction -----------------------------------------------------

    pub fn new(
        ctx: ClientContext,
        menu_scenes: Vec<GameScene>,
        gameplay_scenes: Vec<GameScene>,
        states: Box<dyn StateFactory>,
    ) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                ctx,
                menu_scenes,
                gameplay_scenes,
                states: RefCell::new(states),
                current: RefCell::new(None),
                listeners: RefCell::new(None),
                is_loading: Cell::new(false),
                is_restarting: Cell::new(false),
                quit_requested: Cell::new(false),
            }),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Registers the bus listeners, covers the screen and loads the menu.
    pub fn start(&self) {
        let listeners = Listeners {
            quit: self.listener(|c| c.quit()),
            load_menu: self.listener(|c| {
                c.request_transition(Destination::Menu);
            }),
            load_gameplay: self.listener(|c| {
                c.request_transition(Destination::Gameplay);
            }),
            restart: self.listener(|c| c.restart()),
        };

        let bus = self.inner.ctx.bus();
        bus.register_listener::<QuitApplication>(&listeners.quit);
        bus.register_listener::<LoadMenu>(&listeners.load_menu);
        bus.register_listener::<LoadGameplay>(&listeners.load_gameplay);
        bus.register_listener::<RestartApplication>(&listeners.restart);

        if let Some(previous) = self.inner.listeners.borrow_mut().replace(listeners) {
            Self::unregister(&self.inner.ctx, &previous);
        }

        info!("Application controller started");
        self.inner.ctx.curtain().show_immediate();
        self.request_transition(Destination::Menu);
    }

    /// Unregisters every listener and exits the current state.
    pub fn shutdown(&self) {
        if let Some(listeners) = self.inner.listeners.borrow_mut().take() {
            Self::unregister(&self.inner.ctx, &listeners);
        }
        self.inner.exit_current_state();
        info!("Application controller shut down");
    }

    /// Starts a transition to `destination`.
    ///
    /// Returns false, and does nothing, if a transition or restart is
    /// already running or `destination` is already entered.
    pub fn request_transition(&self, destination: Destination) -> bool {
        if self.inner.is_loading.get() || self.inner.is_restarting.get() {
            debug!("Transition to {:?} dropped: another one is running", destination);
            return false;
        }
        if self.current_destination() == Some(destination) {
            debug!("Transition to {:?} dropped: already there", destination);
            return false;
        }

        self.inner.is_loading.set(true);
        let (unload, load) = self.inner.scene_sets(destination);
        let inner = Rc::clone(&self.inner);
        self.inner
            .ctx
            .scheduler()
            .spawn(inner.run_transition(unload, load, destination));
        true
    }

    /// Unloads everything and returns to the menu. Ignored while a
    /// restart is already running.
    pub fn restart(&self) {
        if self.inner.is_restarting.get() {
            return;
        }

        self.inner.is_restarting.set(true);
        let inner = Rc::clone(&self.inner);
        self.inner.ctx.scheduler().spawn(inner.run_restart());
    }

    /// Stops listening for quit requests and flags the session for exit.
    pub fn quit(&self) {
        if let Some(listeners) = self.inner.listeners.borrow().as_ref() {
            self.inner
                .ctx
                .bus()
                .unregister_listener::<QuitApplication>(&listeners.quit);
        }

        if !self.inner.quit_requested.replace(true) {
            info!("Quit requested");
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Forwards the tick to the current state.
    pub fn update(&self, input: &InputState) {
        if input.was_pressed(KeyCode::KeyR) {
            self.restart();
        }

        let taken = self.inner.current.borrow_mut().take();
        if let Some((destination, mut state)) = taken {
            state.update(&self.inner.ctx, input);

            let mut slot = self.inner.current.borrow_mut();
            if slot.is_none() {
                *slot = Some((destination, state));
            }
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading.get()
    }

    pub fn is_restarting(&self) -> bool {
        self.inner.is_restarting.get()
    }

    pub fn quit_requested(&self) -> bool {
        self.inner.quit_requested.get()
    }

    /// Destination whose state is currently entered.
    pub fn current_destination(&self) -> Option<Destination> {
        self.inner.current.borrow().as_ref().map(|(destination, _)| *destination)
    }

    pub fn context(&self) -> &ClientContext {
        &self.inner.ctx
    }

    //--- Internal Helpers -------------------------------------------------

    fn listener(&self, action: fn(&ApplicationController)) -> Listener {
        let weak: Weak<ControllerInner> = Rc::downgrade(&self.inner);
        Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                action(&ApplicationController { inner });
            }
        })
    }

    fn unregister(ctx: &ClientContext, listeners: &Listeners) {
        let bus = ctx.bus();
        bus.unregister_listener::<QuitApplication>(&listeners.quit);
        bus.unregister_listener::<LoadMenu>(&listeners.load_menu);
        bus.unregister_listener::<LoadGameplay>(&listeners.load_gameplay);
        bus.unregister_listener::<RestartApplication>(&listeners.restart);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::curtain::{CurtainSettings, HeadlessOverlay, Overlay, ScreenCurtain};
    use crate::core::input::InputEvent;
    use crate::core::pubsub::PubSub;
    use crate::core::scene::{HeadlessSceneBackend, SceneLoader};
    use crate::core::task::Scheduler;

    //--- Test Helpers -----------------------------------------------------

    type Journal = Rc<RefCell<Vec<String>>>;

    struct RecordingState {
        name: &'static str,
        journal: Journal,
        overlay: HeadlessOverlay,
        overlay_at_enter: Rc<RefCell<Vec<bool>>>,
        bounce_to_menu: bool,
    }

    impl SceneState for RecordingState {
        fn on_enter(&mut self, ctx: &ClientContext) {
            self.journal.borrow_mut().push(format!("enter {}", self.name));
            self.overlay_at_enter.borrow_mut().push(self.overlay.is_enabled());

            if self.bounce_to_menu {
                ctx.bus().publish(&LoadMenu);
            }
        }

        fn on_exit(&mut self, _ctx: &ClientContext) {
            self.journal.borrow_mut().push(format!("exit {}", self.name));
        }

        fn update(&mut self, _ctx: &ClientContext, _input: &InputState) {
            self.journal.borrow_mut().push(format!("update {}", self.name));
        }
    }

    struct Fixture {
        backend: HeadlessSceneBackend,
        overlay: HeadlessOverlay,
        controller: ApplicationController,
        journal: Journal,
        overlay_at_enter: Rc<RefCell<Vec<bool>>>,
        bounce_from_gameplay: Rc<Cell<bool>>,
    }

    impl Fixture {
        fn new() -> Self {
            let scheduler = Rc::new(Scheduler::new());
            let backend = HeadlessSceneBackend::new(["menu", "arena", "hud"]);
            let overlay = HeadlessOverlay::new();
            let settings = CurtainSettings {
                duration: 0.25,
                ..CurtainSettings::default()
            };
            let curtain = ScreenCurtain::new(overlay.clone(), settings, scheduler.clock().clone());
            let ctx = ClientContext::new(
                Rc::new(PubSub::new()),
                scheduler,
                curtain,
                SceneLoader::new(backend.clone()),
            );

            let journal: Journal = Rc::new(RefCell::new(Vec::new()));
            let overlay_at_enter = Rc::new(RefCell::new(Vec::new()));
            let bounce_from_gameplay = Rc::new(Cell::new(false));

            let log = Rc::clone(&journal);
            let seen = Rc::clone(&overlay_at_enter);
            let bounce = Rc::clone(&bounce_from_gameplay);
            let state_overlay = overlay.clone();
            let states = move |destination: Destination| -> Box<dyn SceneState> {
                let name = match destination {
                    Destination::Menu => "menu",
                    Destination::Gameplay => "gameplay",
                };
                Box::new(RecordingState {
                    name,
                    journal: Rc::clone(&log),
                    overlay: state_overlay.clone(),
                    overlay_at_enter: Rc::clone(&seen),
                    bounce_to_menu: destination == Destination::Gameplay && bounce.get(),
                })
            };

            let controller = ApplicationController::new(
                ctx,
                vec![GameScene::new("menu", 0)],
                vec![GameScene::new("arena", 1), GameScene::new("hud", 0)],
                Box::new(states),
            );

            Self {
                backend,
                overlay,
                controller,
                journal,
                overlay_at_enter,
                bounce_from_gameplay,
            }
        }

        fn ctx(&self) -> &ClientContext {
            self.controller.context()
        }

        fn tick(&self) {
            self.ctx().scheduler().tick(0.125);
        }

        fn settle(&self) {
            for _ in 0..64 {
                self.tick();
            }
        }

        fn started() -> Self {
            let fx = Self::new();
            fx.controller.start();
            fx.settle();
            fx
        }

        fn entries(&self) -> Vec<String> {
            self.journal
                .borrow()
                .iter()
                .filter(|e| !e.starts_with("update"))
                .cloned()
                .collect()
        }
    }

    //--- Startup ----------------------------------------------------------

    #[test]
    fn start_loads_menu_behind_curtain() {
        let fx = Fixture::new();
        fx.controller.start();

        assert!(fx.ctx().curtain().is_shown());
        assert!(fx.controller.is_loading());

        fx.settle();
        assert!(!fx.controller.is_loading());
        assert_eq!(fx.backend.loaded_content(), vec!["menu".to_string()]);
        assert_eq!(fx.controller.current_destination(), Some(Destination::Menu));
        assert!(!fx.ctx().curtain().is_shown());
        assert!(!fx.overlay.is_enabled());
        assert_eq!(fx.entries(), vec!["enter menu"]);
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn load_gameplay_swaps_scene_sets() {
        let fx = Fixture::started();

        fx.ctx().bus().publish(&LoadGameplay);
        fx.settle();

        assert_eq!(fx.backend.loaded_content(), vec!["arena".to_string(), "hud".to_string()]);
        assert_eq!(fx.backend.active().as_deref(), Some("arena"));
        assert_eq!(fx.controller.current_destination(), Some(Destination::Gameplay));
        assert_eq!(fx.entries(), vec!["enter menu", "exit menu", "enter gameplay"]);
    }

    #[test]
    fn curtain_covers_the_swap() {
        let fx = Fixture::started();
        fx.ctx().bus().publish(&LoadGameplay);

        // Wait for the curtain to close, then check the menu is still there.
        while !fx.ctx().curtain().is_shown() {
            fx.tick();
        }
        assert!(fx.controller.is_loading());
        assert_eq!(fx.controller.current_destination(), None);

        fx.settle();
        assert!(!fx.ctx().curtain().is_shown());
    }

    #[test]
    fn requests_during_transition_are_dropped() {
        let fx = Fixture::started();

        fx.ctx().bus().publish(&LoadGameplay);
        fx.tick();
        assert!(!fx.controller.request_transition(Destination::Menu));
        fx.ctx().bus().publish(&LoadMenu);

        fx.settle();
        assert_eq!(fx.controller.current_destination(), Some(Destination::Gameplay));
        assert_eq!(fx.entries(), vec!["enter menu", "exit menu", "enter gameplay"]);
    }

    #[test]
    fn failed_load_aborts_and_clears_guard() {
        let fx = Fixture::started();
        fx.backend.fail_loads_of("arena");

        fx.ctx().bus().publish(&LoadGameplay);
        fx.settle();

        assert!(!fx.controller.is_loading());
        assert_eq!(fx.controller.current_destination(), None);
        assert!(fx.ctx().curtain().is_shown(), "Aborted transition leaves the curtain up");
        assert!(fx.backend.loaded_content().is_empty());

        fx.ctx().bus().publish(&LoadMenu);
        fx.settle();
        assert_eq!(fx.controller.current_destination(), Some(Destination::Menu));
    }

    #[test]
    fn state_is_entered_after_curtain_hides() {
        let fx = Fixture::started();
        fx.ctx().bus().publish(&LoadGameplay);
        fx.settle();

        assert_eq!(*fx.overlay_at_enter.borrow(), vec![false, false]);
        assert!(!fx.controller.is_loading());
    }

    #[test]
    fn request_from_on_enter_is_honoured() {
        let fx = Fixture::started();
        fx.bounce_from_gameplay.set(true);

        fx.ctx().bus().publish(&LoadGameplay);
        fx.settle();

        assert_eq!(fx.controller.current_destination(), Some(Destination::Menu));
        assert_eq!(
            fx.entries(),
            vec!["enter menu", "exit menu", "enter gameplay", "exit gameplay", "enter menu"]
        );
    }

    #[test]
    fn request_for_current_destination_is_ignored() {
        let fx = Fixture::started();

        assert!(!fx.controller.request_transition(Destination::Menu));
        fx.ctx().bus().publish(&LoadMenu);
        assert!(!fx.controller.is_loading());

        fx.settle();
        assert_eq!(fx.entries(), vec!["enter menu"]);
        assert_eq!(fx.backend.activation_count(), 1);
    }

    #[test]
    fn update_forwards_to_current_state() {
        let fx = Fixture::started();
        fx.controller.update(&InputState::new());
        assert_eq!(fx.journal.borrow().last().map(String::as_str), Some("update menu"));
    }

    //--- Restart & Quit ---------------------------------------------------

    #[test]
    fn restart_reloads_menu_from_gameplay() {
        let fx = Fixture::started();
        fx.ctx().bus().publish(&LoadGameplay);
        fx.settle();

        fx.ctx().bus().publish(&RestartApplication);
        assert!(fx.controller.is_restarting());
        fx.settle();

        assert!(!fx.controller.is_restarting());
        assert_eq!(fx.backend.loaded_content(), vec!["menu".to_string()]);
        assert_eq!(fx.controller.current_destination(), Some(Destination::Menu));
    }

    #[test]
    fn restart_waits_for_running_transition() {
        let fx = Fixture::started();
        fx.ctx().bus().publish(&LoadGameplay);
        fx.tick();

        fx.controller.restart();
        fx.settle();

        assert_eq!(fx.backend.loaded_content(), vec!["menu".to_string()]);
        assert_eq!(
            fx.entries(),
            vec!["enter menu", "exit menu", "enter gameplay", "exit gameplay", "enter menu"]
        );
    }

    #[test]
    fn restart_hotkey_triggers_restart() {
        let fx = Fixture::started();
        let mut input = InputState::new();
        input.process_events(&[InputEvent::KeyDown(KeyCode::KeyR)]);

        fx.controller.update(&input);
        assert!(fx.controller.is_restarting());
    }

    #[test]
    fn quit_flags_session_and_unregisters_listener() {
        let fx = Fixture::started();

        fx.ctx().bus().publish(&QuitApplication);
        assert!(fx.controller.quit_requested());
        assert_eq!(fx.ctx().bus().listener_count::<QuitApplication>(), 0);
        assert_eq!(fx.ctx().bus().listener_count::<LoadMenu>(), 1);
    }

    #[test]
    fn shutdown_unregisters_everything() {
        let fx = Fixture::started();
        fx.controller.shutdown();

        let bus = fx.ctx().bus();
        assert!(!bus.has_listeners::<QuitApplication>());
        assert!(!bus.has_listeners::<LoadMenu>());
        assert!(!bus.has_listeners::<LoadGameplay>());
        assert!(!bus.has_listeners::<RestartApplication>());
        assert_eq!(fx.entries(), vec!["enter menu", "exit menu"]);
    }

    #[test]
    fn dropped_controller_ignores_messages() {
        let fx = Fixture::started();
        let bus = Rc::clone(fx.ctx().bus());
        drop(fx);

        // Listeners only hold weak references.
        bus.publish(&LoadGameplay);
        bus.publish(&QuitApplication);
    }
}
