//=========================================================================
// Task System
//=========================================================================
//
// Single-threaded cooperative executor for sequential client flows.
//
// Architecture:
//   spawn(future) → tasks: Vec<(TaskId, LocalTask)>
//                        ↓
//   tick(dt) ──→ FrameClock::advance(dt) ──→ poll every task once
//                        ↓
//   Ready → dropped      Pending → kept for next tick
//
// Flows (scene transitions, curtain fades, event waits) are plain Rust
// futures. Nothing registers wakers: the core loop polls each live task
// exactly once per tick, which makes every `.await` a suspension point
// that resumes on a later frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod clock;
mod operation;
mod yields;

//=== Public API ==========================================================

pub use clock::FrameClock;
pub use operation::{completion, AsyncOperation, Completion, DeferredOperation, OperationStatus};
pub use yields::{next_tick, wait_until, NextTick, WaitUntil};

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use log::trace;

//=== Task Types ==========================================================

/// Boxed future owned by the scheduler.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Identifies a spawned task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

//=== Scheduler ===========================================================

/// Cooperative task executor driven by the frame loop.
///
/// Tasks spawned while a tick is in progress are first polled on the
/// following tick. Cancelling a task drops its future without polling it
/// again, which leaves whatever state it last wrote untouched.
pub struct Scheduler {
    clock: FrameClock,
    tasks: RefCell<Vec<(TaskId, LocalTask)>>,
    cancelled: RefCell<Vec<TaskId>>,
    next_id: Cell<u64>,
}

impl Scheduler {
    //--- Construction -----------------------------------------------------

    /// Creates an empty scheduler with its own frame clock.
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new())
    }

    /// Creates an empty scheduler advancing the given clock.
    pub fn with_clock(clock: FrameClock) -> Self {
        Self {
            clock,
            tasks: RefCell::new(Vec::new()),
            cancelled: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Returns a handle to the clock advanced by [`Scheduler::tick`].
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    //--- Task Management --------------------------------------------------

    /// Queues a future to be polled from the next tick onward.
    pub fn spawn<F>(&self, future: F) -> TaskId
    where
        F: Future<Output = ()> + 'static,
    {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        trace!("Spawned {}", id);
        self.tasks.borrow_mut().push((id, Box::pin(future)));
        id
    }

    /// Stops a task. Unknown or finished ids are ignored.
    pub fn cancel(&self, id: TaskId) {
        let removed = {
            let mut tasks = self.tasks.borrow_mut();
            tasks
                .iter()
                .position(|(task_id, _)| *task_id == id)
                .map(|pos| tasks.remove(pos))
        };

        match removed {
            // Dropped with the queue released: its destructor may spawn or cancel.
            Some(task) => {
                trace!("Cancelled {}", id);
                drop(task);
            }
            // Possibly the task currently being polled, or one already
            // taken out for this tick.
            None => self.cancelled.borrow_mut().push(id),
        }
    }

    /// Number of tasks waiting to be polled.
    pub fn task_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns true if the task is still queued.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.borrow().iter().any(|(task_id, _)| *task_id == id)
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the clock by `delta_seconds` and polls every task once.
    pub fn tick(&self, delta_seconds: f32) {
        self.clock.advance(delta_seconds);

        let running = std::mem::take(&mut *self.tasks.borrow_mut());
        let mut still_pending = Vec::with_capacity(running.len());
        let mut cx = Context::from_waker(Waker::noop());

        for (id, mut task) in running {
            if self.take_cancelled(id) {
                trace!("Dropped cancelled {}", id);
                continue;
            }

            match task.as_mut().poll(&mut cx) {
                Poll::Ready(()) => trace!("Completed {}", id),
                Poll::Pending => still_pending.push((id, task)),
            }
        }

        // Tasks spawned during this tick were pushed onto the (now empty)
        // queue; keep them after the survivors to preserve spawn order.
        let mut tasks = self.tasks.borrow_mut();
        let spawned = std::mem::take(&mut *tasks);
        still_pending.extend(spawned);

        let mut cancelled = self.cancelled.borrow_mut();
        if !cancelled.is_empty() {
            still_pending.retain(|(id, _)| !cancelled.contains(id));
            cancelled.clear();
        }

        *tasks = still_pending;
    }

    //--- Internal Helpers -------------------------------------------------

    fn take_cancelled(&self, id: TaskId) -> bool {
        let mut cancelled = self.cancelled.borrow_mut();
        match cancelled.iter().position(|c| *c == id) {
            Some(pos) => {
                cancelled.swap_remove(pos);
                true
            }
            None => false,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
