//=========================================================================
// Scene System
//=========================================================================
//
// Manages the set of additively loaded scenes and the active-scene rule.
//
// Architecture:
//   SceneLoader (shared handle)
//     ├─ loaded: Vec<GameScene>      (load order, unique by name)
//     ├─ active: Option<GameScene>
//     └─ backend: Box<dyn SceneBackend>
//
// Flow:
//   load()/unload() → backend operation → await completion
//                   → update_active_scene() → SceneBackend::set_active()
//
//=========================================================================

//=== Module Declarations =================================================

mod backend;
mod game_scene;
mod headless;
mod loader;

//=== Public API ==========================================================

pub use backend::{SceneBackend, SceneError};
pub use game_scene::GameScene;
pub use headless::HeadlessSceneBackend;
pub use loader::SceneLoader;
