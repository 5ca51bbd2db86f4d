//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side platform event collection with bounded polling and shutdown
// detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → input batches → TickControl
//
// Bounded polling prevents starvation when the platform floods the queue.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events once per tick.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
    focus_lost: bool,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
            focus_lost: false,
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.input_batches.clear();
        self.focus_lost = false;
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Input batches collected this frame, in arrival order.
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }

    /// True if the window lost focus during this frame.
    pub(crate) fn focus_lost(&self) -> bool {
        self.focus_lost
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs(batch) => {
                if !batch.is_empty() {
                    self.input_batches.push(batch);
                }
                TickControl::Continue
            }
            PlatformEvent::FocusLost => {
                self.focus_lost = true;
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
