//! Torus Arena - toroidal 2D physics core for a multi-agent space game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, integration, collisions, PD control)
//! - `config`: Data-driven world and controller settings
//! - `error`: Reportable failures (sampling exhaustion, bad configuration)

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::{PhysicsError, PhysicsResult};

/// World configuration constants
pub mod consts {
    /// Default simulation timestep (20 Hz)
    pub const SIM_DT: f64 = 1.0 / 20.0;

    /// Default playing field dimensions
    pub const WORLD_WIDTH: f64 = 1600.0;
    pub const WORLD_HEIGHT: f64 = 1080.0;

    /// Hard cap on translational acceleration (units/timestep²)
    pub const MAX_TRANSLATIONAL_ACCELERATION: f64 = 62.0;
    /// Hard cap on angular acceleration (rad/timestep²)
    pub const MAX_ANGULAR_ACCELERATION: f64 = std::f64::consts::PI;

    /// Rejection-sampling budget for free locations
    pub const MAX_FREE_LOCATION_ATTEMPTS: u32 = 10_000;

    /// Entity defaults
    pub const SHIP_RADIUS: f64 = 15.0;
    pub const SHIP_MASS: f64 = 1000.0;
    pub const ASTEROID_MIN_RADIUS: f64 = 5.0;
    pub const ASTEROID_MAX_RADIUS: f64 = 25.0;
    /// Asteroid mass per unit of area
    pub const ASTEROID_DENSITY: f64 = 1.0;
}

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Signed shortest rotation taking `from` onto `to`, in [-π, π)
#[inline]
pub fn angle_difference(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}
