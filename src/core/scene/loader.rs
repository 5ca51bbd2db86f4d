//=========================================================================
// Scene Loader
//=========================================================================
//
// Tracks the set of loaded scenes and keeps the backend's active scene in
// sync with it.
//
//   load(scene)   → record membership → backend.load_additive → await
//                                    → update_active_scene()
//   unload(scene) → drop membership   → backend.unload        → await
//                                    → update_active_scene()
//
// Membership is recorded before the backend finishes, so a second load of
// the same scene issued mid-flight is a no-op. Only scenes whose load has
// completed are candidates for activation. A failed backend operation
// rolls the membership change back.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::backend::{SceneBackend, SceneError};
use super::GameScene;
use crate::core::task::completion;

//=== LoaderState =========================================================

#[derive(Debug, Clone)]
struct LoadedScene {
    scene: GameScene,
    /// Backend load finished; the scene's content exists.
    ready: bool,
}

struct LoaderState {
    backend: Box<dyn SceneBackend>,
    loaded: Vec<LoadedScene>,
    active: Option<GameScene>,
}

impl LoaderState {
    /// Highest order wins; on equal orders the later-loaded scene wins.
    /// Scenes still loading are skipped.
    fn scene_to_activate(&self) -> Option<&GameScene> {
        let mut candidate: Option<&GameScene> = None;

        for scene in self.loaded.iter().filter(|entry| entry.ready).map(|entry| &entry.scene) {
            match candidate {
                Some(current) if scene.order() < current.order() => {}
                _ => candidate = Some(scene),
            }
        }

        candidate
    }

    fn update_active_scene(&mut self) -> Result<(), SceneError> {
        let Some(target) = self.scene_to_activate().cloned() else {
            if let Some(previous) = self.active.take() {
                debug!("No scenes loaded, {} is no longer active", previous.name());
            }
            return Ok(());
        };

        if self.backend.active_scene().as_deref() != Some(target.name()) {
            self.backend.set_active(target.name())?;
            debug!("Active scene set to {}", target);
        }

        self.active = Some(target);
        Ok(())
    }

    fn position_of(&self, scene: &GameScene) -> Option<usize> {
        self.loaded.iter().position(|entry| entry.scene == *scene)
    }

    fn forget(&mut self, scene: &GameScene) {
        if let Some(pos) = self.position_of(scene) {
            self.loaded.remove(pos);
        }
    }

    fn mark_ready(&mut self, scene: &GameScene) {
        if let Some(pos) = self.position_of(scene) {
            self.loaded[pos].ready = true;
        }
    }

    fn restore(&mut self, entry: LoadedScene, index: usize) {
        if self.position_of(&entry.scene).is_none() {
            let index = index.min(self.loaded.len());
            self.loaded.insert(index, entry);
        }
    }
}

//=== SceneLoader =========================================================

/// Shared handle to the loaded-scene set.
///
/// Clones refer to the same set. All methods must be called from the
/// core thread; the handle is not `Send`.
#[derive(Clone)]
pub struct SceneLoader {
    state: Rc<RefCell<LoaderState>>,
}

impl SceneLoader {
    //--- Construction -----------------------------------------------------

    /// Creates a loader with nothing loaded.
    pub fn new(backend: impl SceneBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    /// Creates a loader from an already boxed backend.
    pub fn from_boxed(backend: Box<dyn SceneBackend>) -> Self {
        Self {
            state: Rc::new(RefCell::new(LoaderState {
                backend,
                loaded: Vec::new(),
                active: None,
            })),
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if `scene` is recorded as loaded.
    pub fn is_loaded(&self, scene: &GameScene) -> bool {
        self.state.borrow().position_of(scene).is_some()
    }

    /// Loaded scenes in load order.
    pub fn loaded_scenes(&self) -> Vec<GameScene> {
        self.state
            .borrow()
            .loaded
            .iter()
            .map(|entry| entry.scene.clone())
            .collect()
    }

    /// The scene currently selected as active, or `None` if nothing is loaded.
    pub fn active_scene(&self) -> Option<GameScene> {
        self.state.borrow().active.clone()
    }

    //--- Operations -------------------------------------------------------

    /// Loads `scene` additively and resumes once the backend is done.
    ///
    /// Returns immediately if the scene is already loaded.
    pub async fn load(&self, scene: &GameScene) -> Result<(), SceneError> {
        let operation = {
            let mut state = self.state.borrow_mut();
            if state.position_of(scene).is_some() {
                trace!("Scene {} already loaded, skipping load", scene.name());
                return Ok(());
            }

            state.loaded.push(LoadedScene {
                scene: scene.clone(),
                ready: false,
            });
            match state.backend.load_additive(scene.name()) {
                Ok(operation) => operation,
                Err(err) => {
                    state.forget(scene);
                    return Err(err);
                }
            }
        };

        debug!("Loading scene {}", scene);

        if let Err(reason) = completion(operation).await {
            let mut state = self.state.borrow_mut();
            state.forget(scene);
            if let Err(err) = state.update_active_scene() {
                warn!("Could not restore active scene after failed load: {}", err);
            }
            return Err(SceneError::OperationFailed {
                scene: scene.name().to_string(),
                operation: "load",
                reason,
            });
        }

        debug!("Scene {} loaded", scene.name());
        let mut state = self.state.borrow_mut();
        state.mark_ready(scene);
        state.update_active_scene()
    }

    /// Unloads `scene` and resumes once the backend is done.
    ///
    /// Does nothing if the scene is not loaded.
    pub async fn unload(&self, scene: &GameScene) -> Result<(), SceneError> {
        let (operation, entry, index) = {
            let mut state = self.state.borrow_mut();
            let Some(index) = state.position_of(scene) else {
                trace!("Scene {} not loaded, skipping unload", scene.name());
                return Ok(());
            };

            let entry = state.loaded.remove(index);
            match state.backend.unload(scene.name()) {
                Ok(operation) => (operation, entry, index),
                Err(err) => {
                    state.restore(entry, index);
                    return Err(err);
                }
            }
        };

        debug!("Unloading scene {}", scene);

        if let Err(reason) = completion(operation).await {
            self.state.borrow_mut().restore(entry, index);
            return Err(SceneError::OperationFailed {
                scene: scene.name().to_string(),
                operation: "unload",
                reason,
            });
        }

        debug!("Scene {} unloaded", scene.name());
        self.state.borrow_mut().update_active_scene()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
