//=========================================================================
// Asynchronous Operations
//=========================================================================
//
// Completion signals reported by external collaborators (scene loading,
// network session start). The scheduler polls them once per tick through
// the `Completion` future.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

//=== OperationStatus =====================================================

/// Progress reported by an [`AsyncOperation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Still running; poll again next tick.
    InProgress,

    /// Finished successfully.
    Completed,

    /// Finished with an error.
    Failed(String),
}

//=== AsyncOperation ======================================================

/// An operation started by a collaborator that finishes on a later tick.
///
/// `poll_status` is called at most once per tick. Once it has returned
/// `Completed` or `Failed`, it is not called again.
pub trait AsyncOperation {
    fn poll_status(&mut self) -> OperationStatus;
}

//=== Completion ==========================================================

/// Wraps an operation into a future resolving when it finishes.
pub fn completion(operation: Box<dyn AsyncOperation>) -> Completion {
    Completion { operation }
}

/// Future returned by [`completion`]. Resolves to the failure reason on error.
#[must_use = "futures do nothing unless awaited"]
pub struct Completion {
    operation: Box<dyn AsyncOperation>,
}

impl Future for Completion {
    type Output = Result<(), String>;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.operation.poll_status() {
            OperationStatus::InProgress => Poll::Pending,
            OperationStatus::Completed => Poll::Ready(Ok(())),
            OperationStatus::Failed(reason) => Poll::Ready(Err(reason)),
        }
    }
}

//=== DeferredOperation ===================================================

/// Operation that reports a fixed outcome after a number of polls.
///
/// Useful for headless collaborators that have no real work to wait on.
#[derive(Debug, Clone)]
pub struct DeferredOperation {
    remaining: u32,
    outcome: OperationStatus,
}

impl DeferredOperation {
    /// Completes successfully after `polls` in-progress reports.
    pub fn completed_after(polls: u32) -> Self {
        Self {
            remaining: polls,
            outcome: OperationStatus::Completed,
        }
    }

    /// Fails with `reason` after `polls` in-progress reports.
    pub fn failed_after(polls: u32, reason: impl Into<String>) -> Self {
        Self {
            remaining: polls,
            outcome: OperationStatus::Failed(reason.into()),
        }
    }
}

impl AsyncOperation for DeferredOperation {
    fn poll_status(&mut self) -> OperationStatus {
        if self.remaining > 0 {
            self.remaining -= 1;
            OperationStatus::InProgress
        } else {
            self.outcome.clone()
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
