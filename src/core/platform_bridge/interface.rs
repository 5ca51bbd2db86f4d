//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages crossing the platform ↔ core thread boundary, and the errors
// the runtime can report.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;
use winit::error::EventLoopError;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformEvent {
    /// Key transitions buffered during one platform frame, in order.
    Inputs(Vec<InputEvent>),

    /// The window lost keyboard focus; held keys will never see a release.
    FocusLost,

    /// Window close requested.
    WindowClosed,
}

//=== CoreEvent ===========================================================

/// Events sent from core back to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoreEvent {
    /// The client asked to end the session; the platform should exit.
    Quit,
}

//=== PlatformError =======================================================

/// Runtime initialization and execution errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    /// The core thread could not be started.
    #[error("failed to spawn core thread: {0}")]
    CoreThreadSpawn(#[source] std::io::Error),

    /// The core thread panicked before the platform exited.
    #[error("core thread panicked")]
    CoreThreadPanicked,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::CoreThreadSpawn(std::io::Error::other("no threads left"));
        assert_eq!(err.to_string(), "failed to spawn core thread: no threads left");
        assert!(std::error::Error::source(&err).is_some());
    }
}
