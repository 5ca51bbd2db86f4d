//=========================================================================
// Suspension Points
//=========================================================================
//
// Leaf futures used by flows to give control back to the frame loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

//=== NextTick ============================================================

/// Suspends the current flow until the next scheduler tick.
pub fn next_tick() -> NextTick {
    NextTick { yielded: false }
}

/// Future returned by [`next_tick`].
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct NextTick {
    yielded: bool,
}

impl Future for NextTick {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            Poll::Pending
        }
    }
}

//=== WaitUntil ===========================================================

/// Suspends the current flow until `condition` returns true.
///
/// The condition is checked on every poll, including the first one.
pub fn wait_until<F>(condition: F) -> WaitUntil<F>
where
    F: FnMut() -> bool + Unpin,
{
    WaitUntil { condition }
}

/// Future returned by [`wait_until`].
#[must_use = "futures do nothing unless awaited"]
pub struct WaitUntil<F> {
    condition: F,
}

impl<F> Future for WaitUntil<F>
where
    F: FnMut() -> bool + Unpin,
{
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if (this.condition)() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::Scheduler;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn wait_until_resolves_once_condition_holds() {
        let scheduler = Scheduler::new();
        let gate = Rc::new(Cell::new(false));
        let done = Rc::new(Cell::new(false));

        let g = Rc::clone(&gate);
        let d = Rc::clone(&done);
        scheduler.spawn(async move {
            wait_until(move || g.get()).await;
            d.set(true);
        });

        scheduler.tick(0.016);
        scheduler.tick(0.016);
        assert!(!done.get());

        gate.set(true);
        scheduler.tick(0.016);
        assert!(done.get());
    }

    #[test]
    fn wait_until_with_true_condition_does_not_suspend() {
        let scheduler = Scheduler::new();
        let done = Rc::new(Cell::new(false));

        let d = Rc::clone(&done);
        scheduler.spawn(async move {
            wait_until(|| true).await;
            d.set(true);
        });

        scheduler.tick(0.016);
        assert!(done.get());
    }
}
