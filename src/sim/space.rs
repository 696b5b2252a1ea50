//! Toroidal playing field
//!
//! The world is a W×H rectangle whose edges wrap. Every distance, direction,
//! and overlap test goes through the shortest-path primitives here; plain
//! coordinate subtraction ignores the wraparound images and is wrong near
//! the edges.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::movement::Movement;
use super::object::PhysicsObject;
use super::position::Position;
use super::vector::Vector2D;
use crate::config::SimConfig;
use crate::consts::*;
use crate::error::{PhysicsError, PhysicsResult};

/// Dimensions and timestep of one match's world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Toroidal2DPhysics {
    width: f64,
    height: f64,
    timestep: f64,
    max_free_location_attempts: u32,
}

impl Toroidal2DPhysics {
    pub fn new(width: f64, height: f64, timestep: f64) -> PhysicsResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PhysicsError::InvalidDimensions { width, height });
        }
        if !(timestep.is_finite() && timestep > 0.0) {
            return Err(PhysicsError::InvalidTimestep(timestep));
        }
        Ok(Self {
            width,
            height,
            timestep,
            max_free_location_attempts: MAX_FREE_LOCATION_ATTEMPTS,
        })
    }

    pub fn from_config(config: &SimConfig) -> PhysicsResult<Self> {
        config.validate()?;
        let mut space = Self::new(config.width, config.height, config.timestep)?;
        space.max_free_location_attempts = config.max_free_location_attempts;
        Ok(space)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Wrap raw coordinates into [0, W) × [0, H)
    pub fn wrap_coords(&self, x: f64, y: f64) -> (f64, f64) {
        (wrap_axis(x, self.width), wrap_axis(y, self.height))
    }

    /// Normalize a position's location onto the torus, in place. Idempotent.
    pub fn toroidal_wrap(&self, position: &mut Position) {
        let (x, y) = self.wrap_coords(position.x, position.y);
        position.x = x;
        position.y = y;
    }

    /// Shortest displacement from `a` to `b` considering every wraparound image
    pub fn find_shortest_distance_vector(&self, a: &Position, b: &Position) -> Vector2D {
        self.shortest_vector_between(a.coords(), b.coords())
    }

    pub fn find_shortest_distance(&self, a: &Position, b: &Position) -> f64 {
        self.find_shortest_distance_vector(a, b).magnitude()
    }

    /// Coordinate form of [`Self::find_shortest_distance_vector`]
    pub fn shortest_vector_between(&self, a: Vector2D, b: Vector2D) -> Vector2D {
        Vector2D::new(
            shortest_axis_delta(b.x() - a.x(), self.width),
            shortest_axis_delta(b.y() - a.y(), self.height),
        )
    }

    /// Semi-implicit Euler step. Returns the new, unwrapped state; the input
    /// is left untouched so look-ahead code can branch from it.
    pub fn apply_movement(&self, position: &Position, movement: &Movement, dt: f64) -> Position {
        let angular_velocity =
            position.angular_velocity + movement.angular_acceleration() * dt;
        let orientation = position.orientation + angular_velocity * dt;
        let velocity =
            position.translational_velocity + movement.translational_acceleration() * dt;

        Position {
            x: position.x + velocity.x() * dt,
            y: position.y + velocity.y() * dt,
            orientation,
            angular_velocity,
            translational_velocity: velocity,
        }
    }

    /// [`Self::apply_movement`] with this world's timestep
    pub fn step_position(&self, position: &Position, movement: &Movement) -> Position {
        self.apply_movement(position, movement, self.timestep)
    }

    /// True if no alive object's disk comes within `clearance` of `location`
    pub fn is_location_free(
        &self,
        objects: &[PhysicsObject],
        location: &Position,
        clearance: f64,
    ) -> bool {
        objects
            .iter()
            .filter(|obj| obj.alive)
            .all(|obj| self.find_shortest_distance(&obj.position, location) > clearance + obj.radius)
    }

    /// Sample a free spot within `max_distance` of (center_x, center_y).
    ///
    /// Samples are uniform over the disk's area (radius drawn as
    /// `max_distance * sqrt(u)`) so the center is not over-represented.
    pub fn random_free_location_in_region<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        objects: &[PhysicsObject],
        clearance: f64,
        center_x: f64,
        center_y: f64,
        max_distance: f64,
    ) -> PhysicsResult<Position> {
        check_finite("clearance", clearance)?;
        check_finite("center_x", center_x)?;
        check_finite("center_y", center_y)?;
        check_finite("max_distance", max_distance)?;
        if max_distance < 0.0 {
            return Err(PhysicsError::InvalidSamplingParameter {
                name: "max_distance",
                value: max_distance,
            });
        }

        let attempts = self.max_free_location_attempts;
        for _ in 0..attempts {
            let r = max_distance * rng.random::<f64>().sqrt();
            let theta = rng.random::<f64>() * std::f64::consts::TAU;
            let (x, y) = self.wrap_coords(center_x + r * theta.cos(), center_y + r * theta.sin());
            let candidate = Position::new(x, y);
            if self.is_location_free(objects, &candidate, clearance) {
                return Ok(candidate);
            }
        }

        log::warn!(
            "No free location within {:.1} of ({:.1}, {:.1}) after {} attempts",
            max_distance,
            center_x,
            center_y,
            attempts
        );
        Err(PhysicsError::NoFreeLocation {
            attempts,
            clearance,
        })
    }

    /// Sample a free spot anywhere in the world
    pub fn random_free_location<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        objects: &[PhysicsObject],
        clearance: f64,
    ) -> PhysicsResult<Position> {
        check_finite("clearance", clearance)?;

        let attempts = self.max_free_location_attempts;
        for _ in 0..attempts {
            let candidate = Position::new(
                rng.random::<f64>() * self.width,
                rng.random::<f64>() * self.height,
            );
            if self.is_location_free(objects, &candidate, clearance) {
                return Ok(candidate);
            }
        }

        log::warn!("No free location anywhere after {} attempts", attempts);
        Err(PhysicsError::NoFreeLocation {
            attempts,
            clearance,
        })
    }

    /// True if a disk of `free_radius` can travel the shortest path from
    /// `start` to `goal` without touching any alive obstruction
    pub fn is_path_clear_of_obstructions(
        &self,
        start: &Position,
        goal: &Position,
        obstructions: &[PhysicsObject],
        free_radius: f64,
    ) -> bool {
        let path = self.find_shortest_distance_vector(start, goal);
        let path_len_sq = path.magnitude_squared();

        obstructions.iter().filter(|obs| obs.alive).all(|obs| {
            let to_obs = self.find_shortest_distance_vector(start, &obs.position);
            // Closest point on the segment start -> start + path
            let t = if path_len_sq == 0.0 {
                0.0
            } else {
                (to_obs.dot(path) / path_len_sq).clamp(0.0, 1.0)
            };
            let gap = (to_obs - path * t).magnitude();
            gap > obs.radius + free_radius
        })
    }
}

impl Default for Toroidal2DPhysics {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            timestep: SIM_DT,
            max_free_location_attempts: MAX_FREE_LOCATION_ATTEMPTS,
        }
    }
}

fn check_finite(name: &'static str, value: f64) -> PhysicsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidSamplingParameter { name, value })
    }
}

/// Modulo that is non-negative for negative inputs
#[inline]
fn wrap_axis(value: f64, size: f64) -> f64 {
    let wrapped = value.rem_euclid(size);
    // rem_euclid can round up to exactly `size` for tiny negative inputs
    if wrapped >= size { 0.0 } else { wrapped }
}

/// Pick the smallest-magnitude delta among the direct one and its two images
#[inline]
fn shortest_axis_delta(delta: f64, size: f64) -> f64 {
    let mut best = delta;
    for image in [delta - size, delta + size] {
        if image.abs() < best.abs() {
            best = image;
        }
    }
    best
}
