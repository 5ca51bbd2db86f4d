//=========================================================================
// Input Buffer
//=========================================================================
//
// Holds key transitions between frame boundaries. Order is preserved so
// a press and release inside one frame both reach the core.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    const BASE_CAPACITY: usize = 32;

    pub(crate) fn new() -> Self {
        Self {
            events: Vec::with_capacity(Self::BASE_CAPACITY),
        }
    }

    pub(crate) fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Takes everything buffered this frame, or `None` if nothing was.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(std::mem::replace(
            &mut self.events,
            Vec::with_capacity(Self::BASE_CAPACITY),
        ))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn empty_buffer_drains_to_none() {
        let mut buffer = InputBuffer::new();
        assert_eq!(buffer.drain(), None);
    }

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::KeyDown(KeyCode::Space));
        buffer.push(InputEvent::KeyUp(KeyCode::Space));

        assert_eq!(
            buffer.drain(),
            Some(vec![
                InputEvent::KeyDown(KeyCode::Space),
                InputEvent::KeyUp(KeyCode::Space),
            ])
        );
        assert_eq!(buffer.drain(), None);
    }
}
