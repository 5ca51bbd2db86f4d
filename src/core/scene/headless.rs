//=========================================================================
// Headless Scene Backend
//=========================================================================
//
// In-memory `SceneBackend` with no real content. Loads and unloads finish
// after a configurable number of ticks. Used by the default binary and
// by tests, which keep a clone of the handle to inspect its state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::backend::{SceneBackend, SceneError};
use crate::core::task::{AsyncOperation, OperationStatus};

//=== State ===============================================================

#[derive(Debug, Default)]
struct HeadlessState {
    build: HashSet<String>,
    failing_loads: HashSet<String>,
    failing_unloads: HashSet<String>,
    loaded: Vec<String>,
    active: Option<String>,
    operation_ticks: u32,
    activations: u32,
}

//=== HeadlessSceneBackend ================================================

/// Shared handle to an in-memory scene backend.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSceneBackend {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSceneBackend {
    /// Creates a backend knowing the given scene names.
    ///
    /// Operations complete on the tick after they start.
    pub fn new<I, S>(build: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = HeadlessState {
            build: build.into_iter().map(Into::into).collect(),
            operation_ticks: 1,
            ..HeadlessState::default()
        };

        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Number of in-progress polls before an operation completes.
    pub fn with_operation_ticks(self, ticks: u32) -> Self {
        self.state.borrow_mut().operation_ticks = ticks;
        self
    }

    /// Makes every future load of `name` fail.
    pub fn fail_loads_of(&self, name: impl Into<String>) {
        self.state.borrow_mut().failing_loads.insert(name.into());
    }

    /// Makes every future unload of `name` fail, leaving its content in place.
    pub fn fail_unloads_of(&self, name: impl Into<String>) {
        self.state.borrow_mut().failing_unloads.insert(name.into());
    }

    /// Scene names whose content is currently present, in load order.
    pub fn loaded_content(&self) -> Vec<String> {
        self.state.borrow().loaded.clone()
    }

    /// Active scene name, if any.
    pub fn active(&self) -> Option<String> {
        self.state.borrow().active.clone()
    }

    /// How many times the active scene was actually changed.
    pub fn activation_count(&self) -> u32 {
        self.state.borrow().activations
    }

    fn start(&self, name: &str, kind: OperationKind) -> Result<Box<dyn AsyncOperation>, SceneError> {
        let state = self.state.borrow();
        if !state.build.contains(name) {
            return Err(SceneError::NotInBuild(name.to_string()));
        }

        Ok(Box::new(HeadlessOperation {
            state: Rc::clone(&self.state),
            scene: name.to_string(),
            kind,
            remaining: state.operation_ticks,
            outcome: None,
        }))
    }
}

impl SceneBackend for HeadlessSceneBackend {
    fn load_additive(&mut self, name: &str) -> Result<Box<dyn AsyncOperation>, SceneError> {
        self.start(name, OperationKind::Load)
    }

    fn unload(&mut self, name: &str) -> Result<Box<dyn AsyncOperation>, SceneError> {
        self.start(name, OperationKind::Unload)
    }

    fn active_scene(&self) -> Option<String> {
        self.active()
    }

    fn set_active(&mut self, name: &str) -> Result<(), SceneError> {
        let mut state = self.state.borrow_mut();
        if !state.loaded.iter().any(|s| s == name) {
            return Err(SceneError::ActivationFailed(name.to_string()));
        }

        if state.active.as_deref() != Some(name) {
            debug!("Headless backend: active scene is now '{}'", name);
            state.active = Some(name.to_string());
            state.activations += 1;
        }
        Ok(())
    }
}

//=== HeadlessOperation ===================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationKind {
    Load,
    Unload,
}

struct HeadlessOperation {
    state: Rc<RefCell<HeadlessState>>,
    scene: String,
    kind: OperationKind,
    remaining: u32,
    outcome: Option<OperationStatus>,
}

impl HeadlessOperation {
    fn finish(&mut self) -> OperationStatus {
        let mut state = self.state.borrow_mut();

        match self.kind {
            OperationKind::Load if state.failing_loads.contains(&self.scene) => {
                OperationStatus::Failed("content failed to load".to_string())
            }
            OperationKind::Unload if state.failing_unloads.contains(&self.scene) => {
                OperationStatus::Failed("content failed to unload".to_string())
            }
            OperationKind::Load => {
                if !state.loaded.contains(&self.scene) {
                    state.loaded.push(self.scene.clone());
                }
                OperationStatus::Completed
            }
            OperationKind::Unload => match state.loaded.iter().position(|s| *s == self.scene) {
                Some(pos) => {
                    state.loaded.remove(pos);
                    if state.active.as_deref() == Some(self.scene.as_str()) {
                        state.active = None;
                    }
                    OperationStatus::Completed
                }
                None => OperationStatus::Failed("scene is not loaded".to_string()),
            },
        }
    }
}

impl AsyncOperation for HeadlessOperation {
    fn poll_status(&mut self) -> OperationStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            return OperationStatus::InProgress;
        }

        let outcome = self.finish();
        self.outcome = Some(outcome.clone());
        outcome
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
