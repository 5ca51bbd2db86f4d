//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the windowing platform (main thread) and the core
// thread that owns the client.
//
// Components:
// - `interface`: message and error types
// - `event_collector`: core-side event collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::{CoreEvent, PlatformEvent};
pub use interface::PlatformError;
