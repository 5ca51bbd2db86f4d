//=========================================================================
// Client Context
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::curtain::ScreenCurtain;
use crate::core::pubsub::PubSub;
use crate::core::scene::SceneLoader;
use crate::core::task::Scheduler;

//=== ClientContext =======================================================

/// Shared services handed to the controller and scene states.
///
/// Cloning is cheap; all clones refer to the same services.
#[derive(Clone)]
pub struct ClientContext {
    bus: Rc<PubSub>,
    scheduler: Rc<Scheduler>,
    curtain: ScreenCurtain,
    loader: SceneLoader,
}

impl ClientContext {
    pub fn new(bus: Rc<PubSub>, scheduler: Rc<Scheduler>, curtain: ScreenCurtain, loader: SceneLoader) -> Self {
        Self {
            bus,
            scheduler,
            curtain,
            loader,
        }
    }

    pub fn bus(&self) -> &Rc<PubSub> {
        &self.bus
    }

    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.scheduler
    }

    pub fn curtain(&self) -> &ScreenCurtain {
        &self.curtain
    }

    pub fn loader(&self) -> &SceneLoader {
        &self.loader
    }
}
