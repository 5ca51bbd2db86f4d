//=========================================================================
// One-Shot Signals
//=========================================================================
//
// Wait-until-published support for marker events.
//
//   wait_for<M>()        → pending[M] += 1, remember generation[M]
//   publish_signal<M>()  → pending[M] = 0,  generation[M] += 1
//   EventWait::poll      → ready once generation[M] moved past the armed one
//
// The generation counter releases exactly the waiters armed before the
// publish, even if new waiters arm before the released ones are polled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

//=== SignalTable =========================================================

#[derive(Debug, Default, Clone, Copy)]
struct SignalSlot {
    pending: usize,
    generation: u64,
}

#[derive(Debug, Default)]
pub(super) struct SignalTable {
    slots: HashMap<TypeId, SignalSlot>,
}

impl SignalTable {
    /// Registers a waiter and returns the generation it waits past.
    pub(super) fn arm(&mut self, type_id: TypeId) -> u64 {
        let slot = self.slots.entry(type_id).or_default();
        slot.pending += 1;
        slot.generation
    }

    /// Releases all armed waiters. Returns how many were pending.
    pub(super) fn publish(&mut self, type_id: TypeId) -> Option<usize> {
        let slot = self.slots.get_mut(&type_id)?;
        let released = slot.pending;
        slot.pending = 0;
        slot.generation += 1;
        Some(released)
    }

    pub(super) fn is_released(&self, type_id: TypeId, armed_generation: u64) -> bool {
        self.slots
            .get(&type_id)
            .is_some_and(|slot| slot.generation > armed_generation)
    }

    pub(super) fn pending(&self, type_id: TypeId) -> usize {
        self.slots.get(&type_id).map_or(0, |slot| slot.pending)
    }

    fn disarm(&mut self, type_id: TypeId, armed_generation: u64) {
        if let Some(slot) = self.slots.get_mut(&type_id) {
            if slot.generation == armed_generation {
                slot.pending = slot.pending.saturating_sub(1);
            }
        }
    }
}

//=== EventWait ===========================================================

/// Future returned by [`PubSub::wait_for`](super::PubSub::wait_for).
///
/// Always stays pending on its first poll, then resolves once the event
/// type has been signalled after this waiter was armed. Dropping an
/// unresolved wait removes it from the pending count.
#[must_use = "futures do nothing unless awaited"]
pub struct EventWait {
    table: Rc<RefCell<SignalTable>>,
    type_id: TypeId,
    armed_generation: u64,
    polled: bool,
    resolved: bool,
}

impl EventWait {
    pub(super) fn new(table: Rc<RefCell<SignalTable>>, type_id: TypeId) -> Self {
        let armed_generation = table.borrow_mut().arm(type_id);
        Self {
            table,
            type_id,
            armed_generation,
            polled: false,
            resolved: false,
        }
    }
}

impl Future for EventWait {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if !self.polled {
            self.polled = true;
            return Poll::Pending;
        }

        if self.table.borrow().is_released(self.type_id, self.armed_generation) {
            self.resolved = true;
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

impl Drop for EventWait {
    fn drop(&mut self) {
        if !self.resolved {
            self.table
                .borrow_mut()
                .disarm(self.type_id, self.armed_generation);
        }
    }
}
