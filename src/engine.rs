//=========================================================================
// Survival Client Runtime
//
// Entry point that wires the platform (main thread) to the client core
// (logic thread).
//
// Architecture:
// ```text
//  ApplicationBuilder ──build()──> Application ──run()──> [Runtime]
//     │                               │
//     ├─ with_tps()                   ├─ spawns core thread
//     ├─ with_curtain_*()             ├─ runs platform event loop
//     ├─ with_*_scenes()              └─ joins core thread
//     └─ with_collaborators()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, unbounded};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::config::{ClientConfig, CollaboratorFactory, Collaborators};
use crate::core::curtain::Ease;
use crate::core::platform_bridge::PlatformError;
use crate::core::scene::GameScene;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== ApplicationBuilder ==================================================

/// Fluent configuration for an [`Application`].
///
/// # Default Values
///
/// - **TPS**: 60.0
/// - **Channel capacity**: 128 events
/// - **Curtain**: 0.5 s, ease-in-out both ways
/// - **Scenes**: menu `[Menu]`, gameplay `[Gameplay, GameplayUI]`
/// - **Collaborators**: headless scene backend and overlay, loopback network
///
/// # Examples
///
/// ```no_run
/// use survival_client::ApplicationBuilder;
///
/// ApplicationBuilder::new()
///     .with_tps(120.0)
///     .with_curtain_duration(0.3)
///     .build()
///     .run()
///     .expect("client failed");
/// ```
pub struct ApplicationBuilder {
    config: ClientConfig,
    collaborators: CollaboratorFactory,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            collaborators: Box::new(Collaborators::headless),
        }
    }

    /// Sets the core loop rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.config.tps = tps;
        self
    }

    /// Sets the platform → core channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Sets the seconds each curtain fade takes.
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is negative or not finite.
    pub fn with_curtain_duration(mut self, seconds: f32) -> Self {
        assert!(
            seconds.is_finite() && seconds >= 0.0,
            "Curtain duration must be a non-negative number of seconds, got {}",
            seconds
        );
        self.config.curtain.duration = seconds;
        self
    }

    pub fn with_curtain_ease(mut self, show: Ease, hide: Ease) -> Self {
        self.config.curtain.show_ease = show;
        self.config.curtain.hide_ease = hide;
        self
    }

    pub fn with_menu_scenes(mut self, scenes: impl IntoIterator<Item = GameScene>) -> Self {
        self.config.menu_scenes = scenes.into_iter().collect();
        self
    }

    pub fn with_gameplay_scenes(mut self, scenes: impl IntoIterator<Item = GameScene>) -> Self {
        self.config.gameplay_scenes = scenes.into_iter().collect();
        self
    }

    /// Yaw, in degrees, applied to movement input before it is sent.
    pub fn with_input_offset_angle(mut self, degrees: f32) -> Self {
        self.config.input_offset_angle = degrees;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.config.window_title = title.into();
        self
    }

    /// Replaces the scene backend, overlay and state factory.
    ///
    /// The factory runs on the core thread, where the collaborators live.
    pub fn with_collaborators<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&ClientConfig) -> Collaborators + Send + 'static,
    {
        self.collaborators = Box::new(factory);
        self
    }

    pub fn build(self) -> Application {
        info!(
            "Building client (TPS: {}, channel: {}, curtain: {}s)",
            self.config.tps, self.config.channel_capacity, self.config.curtain.duration
        );

        Application {
            config: self.config,
            collaborators: self.collaborators,
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Application =========================================================

/// Configured client, ready to run.
pub struct Application {
    config: ClientConfig,
    collaborators: CollaboratorFactory,
}

impl Application {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs the client and blocks until it exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core (bounded) and core → platform channels
    /// 2. Spawns the core thread
    /// 3. Runs the platform event loop on this thread
    /// 4. Joins the core thread once the loop exits
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the core thread cannot start, the event
    /// loop fails, or the core thread panicked.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting client runtime (TPS: {})", self.config.tps);

        //--- 1. Create communication channels ----------------------------
        let (event_tx, event_rx) = bounded(self.config.channel_capacity);
        let (core_tx, core_rx) = unbounded();

        let window_title = self.config.window_title.clone();

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = CoreSystemsOrchestrator::new(self.config, self.collaborators)
            .spawn_core_thread(event_rx, core_tx)
            .map_err(PlatformError::CoreThreadSpawn)?;
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform_result = Platform::new(window_title, event_tx, core_rx).run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 4. Wait for the core thread ----------------------------------
        // The platform's sender is gone by now, so the core loop sees a
        // disconnect even if WindowClosed never went out.
        let joined = core_handle.join();

        platform_result?;
        match joined {
            Ok(()) => {
                info!("Client shutdown complete");
                Ok(())
            }
            Err(_) => {
                error!("Core thread panicked");
                Err(PlatformError::CoreThreadPanicked)
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
