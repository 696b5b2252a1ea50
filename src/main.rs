//! Torus Arena headless runner
//!
//! Runs a demo match: ships steer toward the nearest mineable asteroid with
//! the PD move controller while the physics core handles wraparound,
//! collisions, and mining.
//!
//! Usage: `torus-arena [seed] [config.json]`

use torus_arena::consts::*;
use torus_arena::sim::{
    CollisionKind, MoveAction, Movement, PhysicsObject, Position, ResourcePile, World,
};
use torus_arena::{PhysicsResult, SimConfig};

const SHIPS: u32 = 4;
const ASTEROIDS: u32 = 24;
const DEMO_STEPS: u64 = 2000;
const DEFAULT_SEED: u64 = 12345;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed_arg = args.next();
    let seed = match parse_seed(seed_arg.as_deref()) {
        Ok(seed) => seed,
        Err(err) => {
            log::error!("Invalid seed {:?}: {err}", seed_arg.unwrap_or_default());
            std::process::exit(1);
        }
    };
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Could not load {path}: {err}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    if let Err(err) = run_demo(&config, seed) {
        log::error!("Demo match failed: {err}");
        std::process::exit(1);
    }
}

/// Seed from the first argument; the default seed when it is absent
fn parse_seed(arg: Option<&str>) -> Result<u64, std::num::ParseIntError> {
    arg.map_or(Ok(DEFAULT_SEED), |s| s.parse())
}

fn run_demo(config: &SimConfig, seed: u64) -> PhysicsResult<()> {
    log::info!("Torus Arena demo starting (seed {seed})");
    let mut world = World::new(config, seed)?;

    for team in 0..SHIPS {
        let id = world.next_object_id()?;
        world.spawn_at_random(PhysicsObject::ship(id, team, Position::default()), 20.0)?;
    }
    for i in 0..ASTEROIDS {
        let id = world.next_object_id()?;
        let radius = ASTEROID_MIN_RADIUS
            + (ASTEROID_MAX_RADIUS - ASTEROID_MIN_RADIUS) * (i as f64 / ASTEROIDS as f64);
        let asteroid = if i % 2 == 0 {
            let pile = ResourcePile::new(radius * 4.0, radius * 2.0, radius * 3.0);
            PhysicsObject::mineable_asteroid(id, Position::default(), radius, true, pile)
        } else {
            PhysicsObject::asteroid(id, Position::default(), radius, i % 3 != 0)
        };
        world.spawn_at_random(asteroid, 10.0)?;
    }

    let mut mined = 0usize;
    let mut bumps = 0usize;
    for _ in 0..DEMO_STEPS {
        let commands = plan_moves(&world, config);
        let report = world.step(&commands)?;
        for event in &report.collisions {
            match event.kind {
                CollisionKind::Mining => {
                    mined += 1;
                    log::info!(
                        "Step {}: objects {} and {} mined {:.1} resources",
                        world.steps,
                        event.first,
                        event.second,
                        event.mined.map(|p| p.total()).unwrap_or(0.0)
                    );
                }
                _ => bumps += 1,
            }
        }
        if !report.invalid.is_empty() {
            log::warn!("Step {}: invalid states for {:?}", world.steps, report.invalid);
        }
        if !world.objects.iter().any(|o| o.alive && o.is_mineable()) {
            log::info!("All mineable asteroids collected after {} steps", world.steps);
            break;
        }
    }

    log::info!("Match over: {mined} asteroids mined, {bumps} other collisions");
    for ship in world.objects.iter().filter(|o| o.kind.is_ship()) {
        log::info!(
            "Ship {} (team {:?}) at {} carrying {:.1}",
            ship.id,
            ship.team(),
            ship.position,
            ship.resources.total()
        );
    }
    Ok(())
}

/// Each controllable ship heads for the nearest alive mineable asteroid
fn plan_moves(world: &World, config: &SimConfig) -> Vec<(u32, Movement)> {
    let targets: Vec<&PhysicsObject> = world
        .objects
        .iter()
        .filter(|o| o.alive && o.is_mineable())
        .collect();

    world
        .objects
        .iter()
        .filter(|o| o.alive && o.is_controllable())
        .filter_map(|ship| {
            let target = targets.iter().min_by(|a, b| {
                let da = world.space.find_shortest_distance(&ship.position, &a.position);
                let db = world.space.find_shortest_distance(&ship.position, &b.position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })?;
            let action = MoveAction::toward_object(target)
                .with_gains(config.gains)
                .with_tolerances(config.tolerances);
            Some((ship.id, action.movement(&world.space, &ship.position)))
        })
        .collect()
}
