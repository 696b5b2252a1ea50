//! Deterministic physics core
//!
//! Everything a match needs to move bodies around the torus. This module
//! must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one stream per world)
//! - Stable iteration order (by object ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod move_action;
pub mod movement;
pub mod object;
pub mod position;
pub mod space;
pub mod vector;
pub mod world;

pub use collision::{
    CollisionEvent, CollisionKind, CollisionPair, check_overlap, collide, elastic_collision_1d,
    find_collisions, resolve_all,
};
pub use move_action::{MoveAction, MoveTolerances, PdGains};
pub use movement::Movement;
pub use object::{Capabilities, ObjectKind, PhysicsObject, ResourcePile};
pub use position::Position;
pub use space::Toroidal2DPhysics;
pub use vector::Vector2D;
pub use world::{RngState, StepReport, World};
