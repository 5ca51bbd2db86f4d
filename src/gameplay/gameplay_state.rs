//=========================================================================
// Gameplay State
//=========================================================================
//
// Runs while the gameplay scene set is loaded.
//
//   on_enter → start session (AutoHostOrClient)
//              ├─ ok   → initialized
//              └─ fail → publish LoadMenu
//   update   → runner events → PlayerSpawner
//            → movement → InputRelay → submit_input
//            → Escape → quit_gameplay()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputState, KeyCode};
use crate::core::lifecycle::{ClientContext, LoadMenu, SceneState};
use crate::core::task::{completion, TaskId};
use crate::network::{GameMode, InputRelay, PlayerSpawner, SharedRunner};

//=== SessionFlags ========================================================

#[derive(Debug, Default)]
struct SessionFlags {
    initialized: Cell<bool>,
    left: Cell<bool>,
}

//=== GameplayState =======================================================

pub struct GameplayState {
    runner: SharedRunner,
    relay: InputRelay,
    spawner: PlayerSpawner,
    flags: Rc<SessionFlags>,
    start_task: Option<TaskId>,
}

impl GameplayState {
    pub fn new(runner: SharedRunner, relay: InputRelay) -> Self {
        Self {
            runner,
            relay,
            spawner: PlayerSpawner::new(),
            flags: Rc::new(SessionFlags::default()),
            start_task: None,
        }
    }

    /// True once the network session started.
    pub fn is_initialized(&self) -> bool {
        self.flags.initialized.get()
    }

    pub fn spawner(&self) -> &PlayerSpawner {
        &self.spawner
    }

    /// Leaves the session and asks for the menu.
    ///
    /// Ignored until the session is initialized, and after the first call.
    pub fn quit_gameplay(&mut self, ctx: &ClientContext) -> bool {
        if !self.flags.initialized.get() || self.flags.left.get() {
            return false;
        }

        self.runner.borrow_mut().leave();
        self.spawner.clear();
        self.flags.left.set(true);

        info!("Leaving gameplay");
        ctx.bus().publish(&LoadMenu);
        true
    }

    fn start_session(&mut self, ctx: &ClientContext) {
        let operation = self.runner.borrow_mut().start_game(GameMode::AutoHostOrClient);
        let flags = Rc::clone(&self.flags);
        let bus = Rc::clone(ctx.bus());

        let task = ctx.scheduler().spawn(async move {
            let started = match operation {
                Ok(operation) => completion(operation).await,
                Err(err) => Err(err.to_string()),
            };

            match started {
                Ok(()) => {
                    info!("Network session started");
                    flags.initialized.set(true);
                }
                Err(reason) => {
                    warn!("Could not start network session: {}", reason);
                    bus.publish(&LoadMenu);
                }
            }
        });

        self.start_task = Some(task);
    }

    fn pump_runner_events(&mut self) {
        let events = self.runner.borrow_mut().poll_events();
        for event in events {
            let mut runner = self.runner.borrow_mut();
            if let Err(err) = self.spawner.handle_event(&mut *runner, event) {
                warn!("Failed to handle {:?}: {}", event, err);
            }
        }
    }
}

impl SceneState for GameplayState {
    fn on_enter(&mut self, ctx: &ClientContext) {
        self.start_session(ctx);
    }

    fn on_exit(&mut self, ctx: &ClientContext) {
        if let Some(task) = self.start_task.take() {
            ctx.scheduler().cancel(task);
        }
        if !self.flags.left.replace(true) {
            self.runner.borrow_mut().leave();
        }
        self.spawner.clear();
    }

    fn update(&mut self, ctx: &ClientContext, input: &InputState) {
        self.pump_runner_events();

        let running = self.runner.borrow().is_running();
        if running {
            let data = self.relay.build(input.move_axis());
            self.runner.borrow_mut().submit_input(data);
        }

        if input.was_pressed(KeyCode::Escape) {
            self.quit_gameplay(ctx);
        }
    }
}
