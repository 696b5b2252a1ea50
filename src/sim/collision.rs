//! Collision detection and response for circular bodies on the torus
//!
//! Two alive objects collide when the toroidal-shortest distance between
//! their centers is less than the sum of their radii. Response is a
//! frictionless elastic exchange along the contact normal, followed by a
//! positional push that removes the interpenetration.
//!
//! Pairs are resolved one at a time in enumeration order with no global
//! solve, so simultaneous contacts between three or more bodies depend on
//! object order.

use serde::{Deserialize, Serialize};

use super::object::{PhysicsObject, ResourcePile};
use super::space::Toroidal2DPhysics;
use super::vector::Vector2D;

/// What kind of contact occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    ShipShip,
    ShipAsteroid,
    AsteroidAsteroid,
    /// Ship touching a mineable asteroid
    Mining,
}

impl CollisionKind {
    pub fn classify(a: &PhysicsObject, b: &PhysicsObject) -> Self {
        match (a.kind.is_ship(), b.kind.is_ship()) {
            (true, true) => CollisionKind::ShipShip,
            (true, false) if b.is_mineable() => CollisionKind::Mining,
            (false, true) if a.is_mineable() => CollisionKind::Mining,
            (true, false) | (false, true) => CollisionKind::ShipAsteroid,
            (false, false) => CollisionKind::AsteroidAsteroid,
        }
    }
}

/// An overlapping pair found by [`find_collisions`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    /// Index of the first object in the scanned slice
    pub first: usize,
    /// Index of the second object (always greater than `first`)
    pub second: usize,
    /// Penetration depth (radius sum minus center distance)
    pub overlap: f64,
    /// Unit normal pointing from first to second
    pub normal: Vector2D,
}

/// Record of one resolved collision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub first: u32,
    pub second: u32,
    pub kind: CollisionKind,
    pub overlap: f64,
    pub normal: Vector2D,
    /// Resources moved from asteroid to ship, for mining contacts
    pub mined: Option<ResourcePile>,
}

/// Closed-form 1D elastic collision; returns the two final velocities
pub fn elastic_collision_1d(u1: f64, m1: f64, u2: f64, m2: f64) -> (f64, f64) {
    let total = m1 + m2;
    let v1 = ((m1 - m2) * u1 + 2.0 * m2 * u2) / total;
    let v2 = ((m2 - m1) * u2 + 2.0 * m1 * u1) / total;
    (v1, v2)
}

/// Unit vector from `a` to `b` along the shortest path (+x if coincident)
pub fn collision_normal(a: &PhysicsObject, b: &PhysicsObject, space: &Toroidal2DPhysics) -> Vector2D {
    space
        .find_shortest_distance_vector(&a.position, &b.position)
        .unit()
}

/// Penetration depth if both objects are alive and overlapping
pub fn check_overlap(a: &PhysicsObject, b: &PhysicsObject, space: &Toroidal2DPhysics) -> Option<f64> {
    if !a.alive || !b.alive {
        return None;
    }
    let distance = space.find_shortest_distance(&a.position, &b.position);
    let reach = a.radius + b.radius;
    (distance < reach).then_some(reach - distance)
}

/// Every overlapping pair in enumeration order, without resolving any
pub fn find_collisions(objects: &[PhysicsObject], space: &Toroidal2DPhysics) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();
    for (i, a) in objects.iter().enumerate() {
        for (j, b) in objects.iter().enumerate().skip(i + 1) {
            if let Some(overlap) = check_overlap(a, b, space) {
                pairs.push(CollisionPair {
                    first: i,
                    second: j,
                    overlap,
                    normal: collision_normal(a, b, space),
                });
            }
        }
    }
    pairs
}

/// Resolve one collision between `a` and `b`, mutating both.
///
/// Velocities are split into normal and tangential parts; the normal parts
/// go through [`elastic_collision_1d`] while tangential parts are kept.
/// An immovable side behaves as infinite mass: its velocity is unchanged
/// and the moveable side reflects off it. Any interpenetration is removed
/// by pushing along the normal, half each or all on the moveable side.
/// A ship touching a mineable asteroid takes the asteroid's whole resource
/// pile and the asteroid is consumed.
pub fn collide(
    a: &mut PhysicsObject,
    b: &mut PhysicsObject,
    space: &Toroidal2DPhysics,
) -> CollisionEvent {
    let kind = CollisionKind::classify(a, b);
    let normal = collision_normal(a, b, space);
    let distance = space.find_shortest_distance(&a.position, &b.position);
    let overlap = (a.radius + b.radius - distance).max(0.0);

    exchange_momentum(a, b, normal);
    separate(a, b, normal, overlap, space);

    let mined = if kind == CollisionKind::Mining {
        let pile = if a.kind.is_ship() { mine(a, b) } else { mine(b, a) };
        Some(pile)
    } else {
        None
    };

    log::debug!(
        "Collision {:?} between {} and {} (overlap {:.3}, normal {})",
        kind,
        a.id,
        b.id,
        overlap,
        normal
    );

    CollisionEvent {
        first: a.id,
        second: b.id,
        kind,
        overlap,
        normal,
        mined,
    }
}

/// Scan every unordered pair in enumeration order and resolve each one that
/// overlaps against the state left by earlier resolutions.
pub fn resolve_all(objects: &mut [PhysicsObject], space: &Toroidal2DPhysics) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    for i in 0..objects.len() {
        let (head, tail) = objects.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if check_overlap(a, b, space).is_some() {
                events.push(collide(a, b, space));
            }
        }
    }
    events
}

fn exchange_momentum(a: &mut PhysicsObject, b: &mut PhysicsObject, normal: Vector2D) {
    let va = a.position.translational_velocity;
    let vb = b.position.translational_velocity;
    let ua = va.dot(normal);
    let ub = vb.dot(normal);
    let tangent_a = va - normal * ua;
    let tangent_b = vb - normal * ub;

    let (ua_new, ub_new) = match (a.is_moveable(), b.is_moveable()) {
        (true, true) => {
            if a.mass + b.mass > 0.0 {
                elastic_collision_1d(ua, a.mass, ub, b.mass)
            } else {
                (ub, ua)
            }
        }
        (true, false) => (2.0 * ub - ua, ub),
        (false, true) => (ua, 2.0 * ua - ub),
        (false, false) => (ua, ub),
    };

    if a.is_moveable() {
        a.position.translational_velocity = normal * ua_new + tangent_a;
    }
    if b.is_moveable() {
        b.position.translational_velocity = normal * ub_new + tangent_b;
    }
}

fn separate(
    a: &mut PhysicsObject,
    b: &mut PhysicsObject,
    normal: Vector2D,
    overlap: f64,
    space: &Toroidal2DPhysics,
) {
    if overlap <= 0.0 {
        return;
    }
    let (shift_a, shift_b) = match (a.is_moveable(), b.is_moveable()) {
        (true, true) => (overlap / 2.0, overlap / 2.0),
        (true, false) => (overlap, 0.0),
        (false, true) => (0.0, overlap),
        (false, false) => return,
    };

    a.position.x -= normal.x() * shift_a;
    a.position.y -= normal.y() * shift_a;
    b.position.x += normal.x() * shift_b;
    b.position.y += normal.y() * shift_b;
    space.toroidal_wrap(&mut a.position);
    space.toroidal_wrap(&mut b.position);
}

fn mine(ship: &mut PhysicsObject, asteroid: &mut PhysicsObject) -> ResourcePile {
    let pile = asteroid.resources.take();
    ship.resources.add(&pile);
    asteroid.alive = false;
    log::debug!(
        "Ship {} mined asteroid {} for {:.1} resources",
        ship.id,
        asteroid.id,
        pile.total()
    );
    pile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::position::Position;
    use proptest::prelude::*;

    fn space() -> Toroidal2DPhysics {
        Toroidal2DPhysics::new(640.0, 480.0, 1.0).unwrap()
    }

    fn ship_at(id: u32, x: f64, y: f64, vx: f64, vy: f64) -> PhysicsObject {
        PhysicsObject::ship(
            id,
            0,
            Position::new(x, y).with_velocity(Vector2D::new(vx, vy)),
        )
    }

    #[test]
    fn test_elastic_1d_reference_values() {
        let (v1, v2) = elastic_collision_1d(4.0, 3.0, -6.0, 5.0);
        assert_eq!(v1, -8.5);
        assert_eq!(v2, 1.5);
    }

    #[test]
    fn test_equal_mass_head_on_swaps_velocities() {
        let space = space();
        let mut a = ship_at(1, 100.0, 100.0, 0.0, 20.0);
        let mut b = ship_at(2, 100.0, 110.0, 0.0, -10.0);

        let event = collide(&mut a, &mut b, &space);
        assert_eq!(event.kind, CollisionKind::ShipShip);
        assert_eq!(a.position.translational_velocity, Vector2D::new(0.0, -10.0));
        assert_eq!(b.position.translational_velocity, Vector2D::new(0.0, 20.0));
    }

    #[test]
    fn test_ship_reflects_off_immovable_asteroid() {
        let space = space();
        let mut ship = ship_at(1, 100.0, 100.0, 10.0, 0.0);
        let mut rock = PhysicsObject::asteroid(2, Position::new(120.0, 100.0), 10.0, false);

        let event = collide(&mut ship, &mut rock, &space);
        assert_eq!(event.kind, CollisionKind::ShipAsteroid);
        assert_eq!(ship.position.translational_velocity, Vector2D::new(-10.0, 0.0));
        assert_eq!(rock.position.translational_velocity, Vector2D::ZERO);
        // Overlap 5 is removed entirely on the ship side
        assert_eq!((ship.position.x, ship.position.y), (95.0, 100.0));
        assert_eq!((rock.position.x, rock.position.y), (120.0, 100.0));
    }

    #[test]
    fn test_oblique_reflection_keeps_tangential_part() {
        let space = space();
        let mut ship = ship_at(1, 100.0, 100.0, 10.0, 7.0);
        let mut rock = PhysicsObject::asteroid(2, Position::new(120.0, 100.0), 10.0, false);
        collide(&mut rock, &mut ship, &space);
        let v = ship.position.translational_velocity;
        assert!((v.x() + 10.0).abs() < 1e-12);
        assert!((v.y() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_mining_transfers_full_pile() {
        let space = space();
        let pile = ResourcePile::new(120.0, 35.5, 80.0);
        let mut ship = ship_at(1, 100.0, 100.0, 5.0, 0.0);
        let mut ore = PhysicsObject::mineable_asteroid(
            2,
            Position::new(110.0, 100.0),
            10.0,
            false,
            pile,
        );

        let event = collide(&mut ore, &mut ship, &space);
        assert_eq!(event.kind, CollisionKind::Mining);
        assert_eq!(event.mined, Some(pile));
        assert_eq!(ship.resources, pile);
        assert!(ore.resources.is_empty());
        assert!(!ore.alive);
    }

    #[test]
    fn test_coincident_centers_fall_back_to_x_axis() {
        let space = space();
        let mut a = ship_at(1, 200.0, 200.0, 0.0, 0.0);
        let mut b = ship_at(2, 200.0, 200.0, 0.0, 0.0);

        let event = collide(&mut a, &mut b, &space);
        assert_eq!(event.normal, Vector2D::X_AXIS);
        assert_eq!(event.overlap, 30.0);
        assert_eq!((a.position.x, a.position.y), (185.0, 200.0));
        assert_eq!((b.position.x, b.position.y), (215.0, 200.0));
        assert!(a.position.is_valid() && b.position.is_valid());
    }

    #[test]
    fn test_separation_uses_wrapped_normal() {
        let space = space();
        let mut a = ship_at(1, 635.0, 240.0, 0.0, 0.0);
        let mut b = ship_at(2, 5.0, 240.0, 0.0, 0.0);
        a.radius = 10.0;
        b.radius = 10.0;

        let event = collide(&mut a, &mut b, &space);
        assert_eq!(event.normal, Vector2D::X_AXIS);
        assert_eq!(event.overlap, 10.0);
        assert_eq!(a.position.x, 630.0);
        assert_eq!(b.position.x, 10.0);
        assert_eq!(space.find_shortest_distance(&a.position, &b.position), 20.0);
    }

    #[test]
    fn test_two_immovable_objects_stay_put() {
        let space = space();
        let mut a = PhysicsObject::asteroid(1, Position::new(100.0, 100.0), 20.0, false);
        let mut b = PhysicsObject::asteroid(2, Position::new(110.0, 100.0), 20.0, false);
        let event = collide(&mut a, &mut b, &space);
        assert_eq!(event.kind, CollisionKind::AsteroidAsteroid);
        assert_eq!(a.position, Position::new(100.0, 100.0));
        assert_eq!(b.position, Position::new(110.0, 100.0));
    }

    #[test]
    fn test_oblique_collision_conserves_momentum_and_energy() {
        let space = space();
        let mut a = ship_at(1, 100.0, 100.0, 12.0, 3.0);
        let mut b = PhysicsObject::asteroid(2, Position::new(118.0, 108.0), 10.0, true);
        b.position.translational_velocity = Vector2D::new(-4.0, 1.0);

        let momentum = |a: &PhysicsObject, b: &PhysicsObject| {
            a.position.translational_velocity * a.mass + b.position.translational_velocity * b.mass
        };
        let energy = |a: &PhysicsObject, b: &PhysicsObject| {
            0.5 * a.mass * a.position.translational_velocity.magnitude_squared()
                + 0.5 * b.mass * b.position.translational_velocity.magnitude_squared()
        };

        let p0 = momentum(&a, &b);
        let e0 = energy(&a, &b);
        collide(&mut a, &mut b, &space);
        let p1 = momentum(&a, &b);
        let e1 = energy(&a, &b);

        assert!((p0 - p1).magnitude() < 1e-6);
        assert!((e0 - e1).abs() / e0 < 1e-9);
    }

    #[test]
    fn test_check_overlap_and_find_collisions() {
        let space = space();
        let objects = vec![
            ship_at(1, 100.0, 100.0, 0.0, 0.0),
            ship_at(2, 120.0, 100.0, 0.0, 0.0),
            ship_at(3, 400.0, 400.0, 0.0, 0.0),
            ship_at(4, 630.0, 100.0, 0.0, 0.0),
            ship_at(5, 10.0, 100.0, 0.0, 0.0),
        ];
        assert_eq!(check_overlap(&objects[0], &objects[1], &space), Some(10.0));
        assert_eq!(check_overlap(&objects[0], &objects[2], &space), None);

        let pairs = find_collisions(&objects, &space);
        let indices: Vec<_> = pairs.iter().map(|p| (p.first, p.second)).collect();
        assert_eq!(indices, vec![(0, 1), (3, 4)]);
        assert_eq!(pairs[1].normal, Vector2D::X_AXIS);
    }

    #[test]
    fn test_dead_objects_never_collide() {
        let space = space();
        let mut objects = vec![ship_at(1, 100.0, 100.0, 1.0, 0.0), ship_at(2, 110.0, 100.0, -1.0, 0.0)];
        objects[1].alive = false;
        assert!(resolve_all(&mut objects, &space).is_empty());
        assert_eq!(objects[0].position.translational_velocity, Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_resolve_all_mined_asteroid_collected_once() {
        let space = space();
        let pile = ResourcePile::new(10.0, 0.0, 0.0);
        let mut objects = vec![
            ship_at(1, 100.0, 100.0, 0.0, 0.0),
            ship_at(2, 100.0, 125.0, 0.0, 0.0),
            PhysicsObject::mineable_asteroid(3, Position::new(100.0, 112.0), 5.0, true, pile),
        ];

        let events = resolve_all(&mut objects, &space);
        let mining: Vec<_> = events.iter().filter(|e| e.kind == CollisionKind::Mining).collect();
        assert_eq!(mining.len(), 1);
        assert_eq!(objects[0].resources.total() + objects[1].resources.total(), 10.0);
        assert!(!objects[2].alive);
    }

    #[test]
    fn test_resolve_all_separates_pairs() {
        let space = space();
        let mut objects = vec![
            ship_at(1, 100.0, 100.0, 5.0, 0.0),
            ship_at(2, 120.0, 100.0, -5.0, 0.0),
            ship_at(3, 300.0, 300.0, 0.0, 0.0),
        ];
        let events = resolve_all(&mut objects, &space);
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].first, events[0].second), (1, 2));
        let d = space.find_shortest_distance(&objects[0].position, &objects[1].position);
        assert!((d - 30.0).abs() < 1e-9);
        assert_eq!(objects[0].position.translational_velocity, Vector2D::new(-5.0, 0.0));
        assert_eq!(objects[1].position.translational_velocity, Vector2D::new(5.0, 0.0));
    }

    #[test]
    fn test_classify() {
        let ship = ship_at(1, 0.0, 0.0, 0.0, 0.0);
        let rock = PhysicsObject::asteroid(2, Position::new(0.0, 0.0), 5.0, true);
        let ore = PhysicsObject::mineable_asteroid(
            3,
            Position::new(0.0, 0.0),
            5.0,
            true,
            ResourcePile::default(),
        );
        assert_eq!(CollisionKind::classify(&ship, &ship), CollisionKind::ShipShip);
        assert_eq!(CollisionKind::classify(&rock, &ship), CollisionKind::ShipAsteroid);
        assert_eq!(CollisionKind::classify(&ship, &ore), CollisionKind::Mining);
        assert_eq!(CollisionKind::classify(&ore, &rock), CollisionKind::AsteroidAsteroid);
    }

    proptest! {
        #[test]
        fn prop_elastic_1d_conserves_momentum_and_energy(
            u1 in -100.0..100.0f64, m1 in 0.1..1e4f64,
            u2 in -100.0..100.0f64, m2 in 0.1..1e4f64,
        ) {
            let (v1, v2) = elastic_collision_1d(u1, m1, u2, m2);
            let p0 = m1 * u1 + m2 * u2;
            let p1 = m1 * v1 + m2 * v2;
            let e0 = m1 * u1 * u1 + m2 * u2 * u2;
            let e1 = m1 * v1 * v1 + m2 * v2 * v2;
            prop_assert!((p0 - p1).abs() <= 1e-9 * (1.0 + p0.abs().max(m1 * u1.abs() + m2 * u2.abs())));
            prop_assert!((e0 - e1).abs() <= 1e-9 * (1.0 + e0));
        }
    }
}
