//=========================================================================
// Fade Easing
//=========================================================================

/// Interpolation curve applied to fade progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    /// Constant speed.
    Linear,

    /// Smoothstep: slow start, slow end.
    #[default]
    EaseInOut,
}

impl Ease {
    /// Maps normalized progress `t` to eased progress. `t` is clamped to `[0, 1]`.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

pub(super) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for ease in [Ease::Linear, Ease::EaseInOut] {
            assert_eq!(ease.evaluate(0.0), 0.0);
            assert_eq!(ease.evaluate(1.0), 1.0);
            assert_eq!(ease.evaluate(-2.0), 0.0);
            assert_eq!(ease.evaluate(3.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_around_midpoint() {
        let ease = Ease::EaseInOut;
        assert_eq!(ease.evaluate(0.5), 0.5);
        assert!(ease.evaluate(0.25) < 0.25);
        assert!(ease.evaluate(0.75) > 0.75);
        assert!((ease.evaluate(0.25) + ease.evaluate(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_interpolates_in_both_directions() {
        assert_eq!(lerp(0.0, 1.0, 0.25), 0.25);
        assert_eq!(lerp(1.0, 0.0, 0.25), 0.75);
    }
}
