//=========================================================================
// Handler List Trait
//=========================================================================
//
// Type-erased trait for per-event handler lists, allowing storage in a
// HashMap keyed by TypeId without knowing the event type.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::{Event, Handler};

//=========================================================================

/// Type-erased view over a `Vec<Handler<M>>`.
pub(super) trait HandlerList {
    /// Returns the number of registrations.
    fn len(&self) -> usize;

    /// Returns true if no handler is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Downcasts to `&dyn Any` for type-specific operations.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for type-specific operations.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================

impl<M: Event> HandlerList for Vec<Handler<M>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
