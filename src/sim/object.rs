//! Physical objects: owned state plus capability flags
//!
//! Ships and asteroids share one struct. Behavior differences come from the
//! `Capabilities` set and the `ObjectKind` tag, so collision code asks
//! "is this moveable / mineable" rather than switching on a type hierarchy.

use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::consts::*;

/// Resource types carried by asteroids and ships
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePile {
    pub water: f64,
    pub fuel: f64,
    pub metals: f64,
}

impl ResourcePile {
    pub fn new(water: f64, fuel: f64, metals: f64) -> Self {
        Self {
            water,
            fuel,
            metals,
        }
    }

    pub fn total(&self) -> f64 {
        self.water + self.fuel + self.metals
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }

    /// Add every resource type from `other`
    pub fn add(&mut self, other: &ResourcePile) {
        self.water += other.water;
        self.fuel += other.fuel;
        self.metals += other.metals;
    }

    /// Remove and return the whole pile, leaving it empty
    pub fn take(&mut self) -> ResourcePile {
        std::mem::take(self)
    }
}

/// What an object can do physically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Responds to forces and collisions; immovable objects act as infinite mass
    pub moveable: bool,
    /// Hands its resources to a ship on contact
    pub mineable: bool,
    /// Accepts movement commands from an agent
    pub controllable: bool,
}

/// Object variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Ship { team: u32 },
    Asteroid,
}

impl ObjectKind {
    pub fn is_ship(&self) -> bool {
        matches!(self, ObjectKind::Ship { .. })
    }

    pub fn is_asteroid(&self) -> bool {
        matches!(self, ObjectKind::Asteroid)
    }
}

/// A circular body in the toroidal world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub position: Position,
    pub mass: f64,
    pub radius: f64,
    pub alive: bool,
    pub caps: Capabilities,
    pub resources: ResourcePile,
}

impl PhysicsObject {
    /// A controllable ship at rest
    pub fn ship(id: u32, team: u32, position: Position) -> Self {
        Self {
            id,
            kind: ObjectKind::Ship { team },
            position,
            mass: SHIP_MASS,
            radius: SHIP_RADIUS,
            alive: true,
            caps: Capabilities {
                moveable: true,
                mineable: false,
                controllable: true,
            },
            resources: ResourcePile::default(),
        }
    }

    /// A plain (non-mineable) asteroid; mass scales with area
    pub fn asteroid(id: u32, position: Position, radius: f64, moveable: bool) -> Self {
        Self {
            id,
            kind: ObjectKind::Asteroid,
            position,
            mass: ASTEROID_DENSITY * std::f64::consts::PI * radius * radius,
            radius,
            alive: true,
            caps: Capabilities {
                moveable,
                mineable: false,
                controllable: false,
            },
            resources: ResourcePile::default(),
        }
    }

    /// An asteroid carrying a resource pile
    pub fn mineable_asteroid(
        id: u32,
        position: Position,
        radius: f64,
        moveable: bool,
        resources: ResourcePile,
    ) -> Self {
        let mut asteroid = Self::asteroid(id, position, radius, moveable);
        asteroid.caps.mineable = true;
        asteroid.resources = resources;
        asteroid
    }

    #[inline]
    pub fn is_moveable(&self) -> bool {
        self.caps.moveable
    }

    #[inline]
    pub fn is_mineable(&self) -> bool {
        self.caps.mineable
    }

    #[inline]
    pub fn is_controllable(&self) -> bool {
        self.caps.controllable
    }

    pub fn team(&self) -> Option<u32> {
        match self.kind {
            ObjectKind::Ship { team } => Some(team),
            ObjectKind::Asteroid => None,
        }
    }
}
