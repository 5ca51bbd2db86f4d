//=========================================================================
// Game Scene Descriptor
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::hash::{Hash, Hasher};

//=== GameScene ===========================================================

/// Named scene with an activation priority.
///
/// Identity is the scene name: two descriptors with the same name are the
/// same scene regardless of `order`. Among loaded scenes, the one with the
/// highest order becomes active; on equal orders the last loaded wins.
#[derive(Debug, Clone)]
pub struct GameScene {
    name: String,
    order: i32,
}

impl GameScene {
    pub fn new(name: impl Into<String>, order: i32) -> Self {
        Self {
            name: name.into(),
            order,
        }
    }

    /// Scene name as known to the scene backend.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Activation priority.
    pub fn order(&self) -> i32 {
        self.order
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for GameScene {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for GameScene {}

impl Hash for GameScene {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with PartialEq: name only
        self.name.hash(state);
    }
}

impl fmt::Display for GameScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (order {})", self.name, self.order)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
