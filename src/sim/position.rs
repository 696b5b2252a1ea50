//! Physical state of a single object
//!
//! A `Position` is a plain value: each object owns its own copy, look-ahead
//! code copies it freely, and only the integrator and the collision resolver
//! write to it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::vector::Vector2D;

/// Location, heading, and velocities of one object
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// World x (may be outside [0, width) until wrapped)
    pub x: f64,
    /// World y (may be outside [0, height) until wrapped)
    pub y: f64,
    /// Heading in radians, unbounded
    pub orientation: f64,
    /// Radians per unit time
    pub angular_velocity: f64,
    pub translational_velocity: Vector2D,
}

impl Position {
    /// An object at rest at (x, y) facing +x
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_orientation(mut self, orientation: f64) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.translational_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Location as a vector from the world origin
    #[inline]
    pub fn coords(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }

    #[inline]
    pub fn translational_velocity_magnitude(&self) -> f64 {
        self.translational_velocity.magnitude()
    }

    /// True if every component is finite. Callers check this before trusting
    /// a state produced by integration.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.orientation.is_finite()
            && self.angular_velocity.is_finite()
            && self.translational_velocity.is_valid()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) θ={:.3} ω={:.3} v={}",
            self.x, self.y, self.orientation, self.angular_velocity, self.translational_velocity
        )
    }
}
