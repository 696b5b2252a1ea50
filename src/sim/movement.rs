//! One-step acceleration command
//!
//! Out-of-range commands are clamped, never rejected: angular acceleration
//! saturates at ±π and the translational vector is scaled down to the cap
//! with its direction preserved.

use serde::{Deserialize, Serialize};

use super::vector::Vector2D;
use crate::consts::{MAX_ANGULAR_ACCELERATION, MAX_TRANSLATIONAL_ACCELERATION};

/// Clamped accelerations consumed once by the integrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    translational_acceleration: Vector2D,
    angular_acceleration: f64,
}

impl Movement {
    /// No acceleration: the object coasts
    pub const NONE: Self = Self {
        translational_acceleration: Vector2D::ZERO,
        angular_acceleration: 0.0,
    };

    pub fn new(translational: Vector2D, angular: f64) -> Self {
        Self {
            translational_acceleration: clamp_translational(translational),
            angular_acceleration: clamp_angular(angular),
        }
    }

    pub fn translational(translational: Vector2D) -> Self {
        Self::new(translational, 0.0)
    }

    pub fn angular(angular: f64) -> Self {
        Self::new(Vector2D::ZERO, angular)
    }

    #[inline]
    pub fn translational_acceleration(&self) -> Vector2D {
        self.translational_acceleration
    }

    #[inline]
    pub fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    pub fn set_translational_acceleration(&mut self, accel: Vector2D) {
        self.translational_acceleration = clamp_translational(accel);
    }

    pub fn set_angular_acceleration(&mut self, accel: f64) {
        self.angular_acceleration = clamp_angular(accel);
    }
}

fn clamp_angular(accel: f64) -> f64 {
    if accel.is_nan() {
        return 0.0;
    }
    accel.clamp(-MAX_ANGULAR_ACCELERATION, MAX_ANGULAR_ACCELERATION)
}

fn clamp_translational(accel: Vector2D) -> Vector2D {
    if !accel.is_valid() {
        return Vector2D::ZERO;
    }
    let magnitude = accel.magnitude();
    if magnitude > MAX_TRANSLATIONAL_ACCELERATION {
        accel * (MAX_TRANSLATIONAL_ACCELERATION / magnitude)
    } else {
        accel
    }
}
