//! Authoritative per-match simulation state and fixed-timestep step
//!
//! One `World` owns every object and the match's single RNG stream. A step
//! integrates commanded movements, wraps, validates, then resolves
//! collisions pairwise. Nothing here is shared across matches, so separate
//! worlds can run on separate threads.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, resolve_all};
use super::movement::Movement;
use super::object::PhysicsObject;
use super::position::Position;
use super::space::Toroidal2DPhysics;
use crate::config::SimConfig;
use crate::error::{PhysicsError, PhysicsResult};

/// Seed record for reproducible replays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub collisions: Vec<CollisionEvent>,
    /// Objects whose integrated state was non-finite and was rolled back
    pub invalid: Vec<u32>,
}

/// Complete physical state of one match
#[derive(Debug, Clone)]
pub struct World {
    pub space: Toroidal2DPhysics,
    /// Alive and dead objects, sorted by id for deterministic iteration
    pub objects: Vec<PhysicsObject>,
    pub rng_state: RngState,
    rng: Pcg32,
    /// Steps completed so far
    pub steps: u64,
    /// Next id to hand out; wider than `u32` so the last id can be allocated
    next_id: u64,
}

impl World {
    pub fn new(config: &SimConfig, seed: u64) -> PhysicsResult<Self> {
        let space = Toroidal2DPhysics::from_config(config)?;
        let rng_state = RngState::new(seed);
        log::info!(
            "New world {}x{} dt={} seed={}",
            space.width(),
            space.height(),
            space.timestep(),
            seed
        );
        Ok(Self {
            space,
            objects: Vec::new(),
            rng_state,
            rng: rng_state.to_rng(),
            steps: 0,
            next_id: 1,
        })
    }

    /// Allocate a new object id
    pub fn next_object_id(&mut self) -> PhysicsResult<u32> {
        let id = u32::try_from(self.next_id).map_err(|_| PhysicsError::ObjectIdsExhausted)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Add an object, wrapping its location onto the torus. Returns its id.
    ///
    /// Ids must be unique within a world.
    pub fn spawn(&mut self, mut object: PhysicsObject) -> PhysicsResult<u32> {
        let id = object.id;
        if self.get(id).is_some() {
            return Err(PhysicsError::DuplicateObject(id));
        }
        self.space.toroidal_wrap(&mut object.position);
        self.next_id = self.next_id.max(u64::from(id) + 1);
        self.objects.push(object);
        self.normalize_order();
        Ok(id)
    }

    /// Place `object` at a random free location anywhere in the world
    pub fn spawn_at_random(&mut self, mut object: PhysicsObject, clearance: f64) -> PhysicsResult<u32> {
        let location =
            self.space
                .random_free_location(&mut self.rng, &self.objects, clearance + object.radius)?;
        object.position.x = location.x;
        object.position.y = location.y;
        self.spawn(object)
    }

    /// Place `object` at a random free location near a point
    pub fn spawn_in_region(
        &mut self,
        mut object: PhysicsObject,
        clearance: f64,
        center_x: f64,
        center_y: f64,
        max_distance: f64,
    ) -> PhysicsResult<u32> {
        let location = self.space.random_free_location_in_region(
            &mut self.rng,
            &self.objects,
            clearance + object.radius,
            center_x,
            center_y,
            max_distance,
        )?;
        object.position.x = location.x;
        object.position.y = location.y;
        self.spawn(object)
    }

    pub fn get(&self, id: u32) -> Option<&PhysicsObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut PhysicsObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Random free location drawn from this match's RNG stream
    pub fn random_free_location(&mut self, clearance: f64) -> PhysicsResult<Position> {
        self.space
            .random_free_location(&mut self.rng, &self.objects, clearance)
    }

    /// Advance one fixed timestep.
    ///
    /// Objects without a command coast. Commands for immovable or dead
    /// objects are ignored; commands for unknown ids are an error and leave
    /// the world untouched.
    pub fn step(&mut self, commands: &[(u32, Movement)]) -> PhysicsResult<StepReport> {
        if let Some((id, _)) = commands.iter().find(|(id, _)| self.get(*id).is_none()) {
            return Err(PhysicsError::UnknownObject(*id));
        }

        let mut report = StepReport::default();
        let space = self.space;

        for object in self.objects.iter_mut().filter(|o| o.alive && o.is_moveable()) {
            let movement = commands
                .iter()
                .rev()
                .find(|(id, _)| *id == object.id)
                .map(|(_, m)| *m)
                .unwrap_or(Movement::NONE);

            let mut next = space.step_position(&object.position, &movement);
            space.toroidal_wrap(&mut next);

            if next.is_valid() {
                object.position = next;
            } else {
                log::warn!(
                    "Object {} produced a non-finite state from {}; keeping previous state",
                    object.id,
                    object.position
                );
                report.invalid.push(object.id);
            }
        }

        report.collisions = resolve_all(&mut self.objects, &space);
        self.steps += 1;

        if !report.collisions.is_empty() {
            log::trace!(
                "Step {}: {} collisions",
                self.steps,
                report.collisions.len()
            );
        }
        Ok(report)
    }

    /// Ensure objects are sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }
}
