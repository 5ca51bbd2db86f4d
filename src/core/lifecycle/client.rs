//=========================================================================
// Client
//=========================================================================
//
// Owns every client service on the core thread and advances them once
// per tick.
//
//   tick(dt, input) → controller.update(input) → scheduler.tick(dt)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::info;

//=== Internal Dependencies ===============================================

use super::{ApplicationController, ClientContext};
use crate::config::{ClientConfig, Collaborators};
use crate::core::curtain::ScreenCurtain;
use crate::core::input::InputState;
use crate::core::pubsub::PubSub;
use crate::core::scene::SceneLoader;
use crate::core::task::Scheduler;

//=== Client ==============================================================

pub struct Client {
    context: ClientContext,
    controller: ApplicationController,
}

impl Client {
    pub fn new(config: &ClientConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            scene_backend,
            overlay,
            states,
        } = collaborators;

        let scheduler = Rc::new(Scheduler::new());
        let curtain = ScreenCurtain::from_boxed(overlay, config.curtain, scheduler.clock().clone());
        let context = ClientContext::new(
            Rc::new(PubSub::new()),
            scheduler,
            curtain,
            SceneLoader::from_boxed(scene_backend),
        );

        let controller = ApplicationController::new(
            context.clone(),
            config.menu_scenes.clone(),
            config.gameplay_scenes.clone(),
            states,
        );

        Self { context, controller }
    }

    pub fn start(&self) {
        info!("Client starting");
        self.controller.start();
    }

    /// Runs one tick: state update first, then every pending flow.
    pub fn tick(&self, delta_seconds: f32, input: &InputState) {
        self.controller.update(input);
        self.context.scheduler().tick(delta_seconds);
    }

    pub fn quit_requested(&self) -> bool {
        self.controller.quit_requested()
    }

    pub fn shutdown(&self) {
        self.controller.shutdown();
        info!("Client shut down");
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub fn controller(&self) -> &ApplicationController {
        &self.controller
    }
}
