//=========================================================================
// Movement Input Relay
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec2, Vec3};

//=== NetworkInputData ====================================================

/// Per-tick input sent to the session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkInputData {
    /// World-space movement direction on the ground plane, length ≤ 1.
    pub direction: Vec3,
}

//=== InputRelay ==========================================================

/// Turns a 2D movement vector into world-space network input.
///
/// The vector is clamped to unit length and rotated about +Y by a fixed
/// offset, compensating for the camera's yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputRelay {
    rotation: Quat,
}

impl InputRelay {
    pub fn new(offset_angle_degrees: f32) -> Self {
        Self {
            rotation: Quat::from_axis_angle(Vec3::Y, offset_angle_degrees.to_radians()),
        }
    }

    pub fn build(&self, move_axis: Vec2) -> NetworkInputData {
        let clamped = move_axis.clamp_length_max(1.0);
        NetworkInputData {
            direction: self.rotation * Vec3::new(clamped.x, 0.0, clamped.y),
        }
    }
}

impl Default for InputRelay {
    fn default() -> Self {
        Self::new(45.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
