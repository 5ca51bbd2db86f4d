//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS-level events) with the client's core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  EventCollector      │
//  │   ↓                      │    │   ↓                  │
//  │  InputProcessor          │    │  InputState          │
//  │   ↓                      │    │   ↓                  │
//  │  InputBuffer             │    │  Client (controller, │
//  │   ↓                      │    │   scheduler, states) │
//  │  RedrawRequested (flush) │    │                      │
//  │   ↓                      │    └──────────────────────┘
//  │  Channel ────────────────┼──────────→ PlatformEvent
//  │  Channel ←───────────────┼────────── CoreEvent::Quit
//  └──────────────────────────┘
// ```
//
// Frame boundary is RedrawRequested: buffered keys are sent as one batch
// and the core's quit channel is checked. Empty batches are not sent.
// If the core thread is gone the platform exits rather than idling with
// a window nobody drives.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{CoreEvent, PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and input aggregator.
///
/// Runs on the main thread (winit requirement on macOS/iOS). Not `Send`;
/// talks to the core thread only through its two channels.
pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    window_title: String,

    buffer: InputBuffer,
    input_processor: InputProcessor,

    event_sender: Sender<PlatformEvent>,
    core_receiver: Receiver<CoreEvent>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(
        window_title: impl Into<String>,
        event_sender: Sender<PlatformEvent>,
        core_receiver: Receiver<CoreEvent>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_title: window_title.into(),
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            event_sender,
            core_receiver,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes or the core quits.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered keys to the core thread as one batch.
    ///
    /// A disconnected channel drops the batch; the next core check exits.
    fn flush_input_buffer(&mut self) {
        if let Some(events) = self.buffer.drain() {
            let count = events.len();
            trace!(target: "platform::input", "Flushing {} key events", count);

            if self.event_sender.send(PlatformEvent::Inputs(events)).is_err() {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    count
                );
            }
        }
    }

    /// True when the core asked to quit or is no longer running.
    fn core_wants_exit(&self) -> bool {
        match self.core_receiver.try_recv() {
            Ok(CoreEvent::Quit) => {
                info!(target: "platform", "Core requested quit");
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!(target: "platform", "Core thread disconnected");
                true
            }
        }
    }

    fn notify_closed(&self) {
        // The core may already be gone; nothing left to tell it then.
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation (mobile may resume repeatedly).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.window_title.clone())
            .with_inner_size(LogicalSize::new(1280, 720));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.notify_closed();
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::Focused(false) => {
                debug!(target: "platform", "Window lost focus");
                // Keys released while unfocused never arrive; flush what we
                // have first so the order stays intact.
                self.flush_input_buffer();
                let _ = self.event_sender.send(PlatformEvent::FocusLost);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push(event);
                } else {
                    trace!(target: "platform::input", "Key ignored");
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                if self.core_wants_exit() {
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
