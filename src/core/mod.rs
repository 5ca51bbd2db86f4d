//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Runs the client on a dedicated logic thread at a fixed tick rate.
//
// Architecture:
//   Receiver<PlatformEvent> → EventCollector → InputState
//                                                  ↓
//                       Client::tick(dt, &input) (controller + scheduler)
//                                                  ↓
//   quit requested? → Sender<CoreEvent::Quit> → platform exits
//
// The client and its collaborators hold `Rc` state, so they are built
// inside the thread from a `Send` config and factory.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod curtain;
pub mod input;
pub mod lifecycle;
pub mod pubsub;
pub mod scene;
pub mod task;

pub(crate) mod platform_bridge;

//=== External Dependencies ===============================================

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::{ClientConfig, CollaboratorFactory};
use input::InputState;
use lifecycle::Client;
use platform_bridge::{CoreEvent, EventCollector, PlatformEvent, TickControl};

//=== CoreSystemsOrchestrator =============================================

/// Owns the core thread's startup data until the thread is spawned.
pub(crate) struct CoreSystemsOrchestrator {
    config: ClientConfig,
    collaborators: CollaboratorFactory,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(config: ClientConfig, collaborators: CollaboratorFactory) -> Self {
        Self { config, collaborators }
    }

    //--- Thread Management ------------------------------------------------

    /// Spawns the logic thread.
    ///
    /// Each tick:
    ///  1. Collects platform events (exits on close or disconnect)
    ///  2. Updates input state and ticks the client
    ///  3. Notifies the platform and exits if the client asked to quit
    ///  4. Sleeps to maintain fixed pacing
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        core_sender: Sender<CoreEvent>,
    ) -> io::Result<thread::JoinHandle<()>> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.tps);

        thread::Builder::new()
            .name("core".to_string())
            .spawn(move || {
                let collaborators = (self.collaborators)(&self.config);
                let client = Client::new(&self.config, collaborators);

                client.start();
                Self::run_loop(&client, EventCollector::new(receiver), &core_sender, frame_duration);
                client.shutdown();

                info!("Core thread exiting");
            })
    }

    fn run_loop(
        client: &Client,
        mut collector: EventCollector,
        core_sender: &Sender<CoreEvent>,
        frame_duration: Duration,
    ) {
        let mut input = InputState::new();
        let mut last_tick = Instant::now();

        loop {
            let frame_start = Instant::now();

            //--- Step 1: Gather platform events ------------------------
            if collector.collect_frame() == TickControl::Exit {
                debug!("Platform closed the session");
                break;
            }

            //--- Step 2: Update input and client -----------------------
            input.begin_frame();
            if collector.focus_lost() {
                input.release_all();
            }
            for batch in collector.batches() {
                input.process_events(batch);
            }

            let delta = frame_start.duration_since(last_tick).as_secs_f32();
            last_tick = frame_start;
            client.tick(delta, &input);

            //--- Step 3: Propagate quit --------------------------------
            if client.quit_requested() {
                if core_sender.send(CoreEvent::Quit).is_err() {
                    warn!("Platform already gone, quit not delivered");
                }
                break;
            }

            //--- Step 4: Maintain pacing -------------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
