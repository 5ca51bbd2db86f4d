//=========================================================================
// Scene Backend
//=========================================================================
//
// Contract between the scene loader and whatever actually owns scene
// content (a game engine, or the headless backend used by tests and the
// default binary).
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::task::AsyncOperation;

//=== SceneError ==========================================================

/// Scene loading and activation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The backend does not know a scene with this name.
    #[error("scene '{0}' is not part of the build")]
    NotInBuild(String),

    /// The backend started the operation but reported a failure.
    #[error("{operation} of scene '{scene}' failed: {reason}")]
    OperationFailed {
        scene: String,
        operation: &'static str,
        reason: String,
    },

    /// The scene could not be made active.
    #[error("scene '{0}' cannot be activated: content not loaded")]
    ActivationFailed(String),
}

//=== SceneBackend ========================================================

/// Additive scene loading primitive.
///
/// Load and unload start asynchronous work and return an operation that
/// the loader polls once per tick until it reports completion.
pub trait SceneBackend {
    /// Starts loading `name` next to the scenes already loaded.
    fn load_additive(&mut self, name: &str) -> Result<Box<dyn AsyncOperation>, SceneError>;

    /// Starts unloading `name`.
    fn unload(&mut self, name: &str) -> Result<Box<dyn AsyncOperation>, SceneError>;

    /// Name of the scene newly placed objects currently land in.
    fn active_scene(&self) -> Option<String>;

    /// Makes `name` the active scene.
    fn set_active(&mut self, name: &str) -> Result<(), SceneError>;
}
