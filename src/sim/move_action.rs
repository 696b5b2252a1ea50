//! PD move-to-goal controller
//!
//! Produces the clamped [`Movement`] that steers an object toward a goal
//! position (and optionally a goal velocity). Orientation and translation
//! are controlled independently:
//!
//! - Orientation error is the signed shortest rotation from the current
//!   heading to the heading of the toroidal-shortest vector to the goal.
//!   Near the goal the target heading switches to the goal's own
//!   orientation so the heading does not chase a vanishing vector.
//! - Translation uses the shortest vector to the goal as position error and
//!   `goal_velocity - velocity` as velocity error.
//!
//! Default gains satisfy `kd = 2 * sqrt(kp)` on both loops (critical damping).
//! Once inside the tolerance band the controller only damps the remaining
//! velocity, so a converged object settles instead of drifting back out.

use serde::{Deserialize, Serialize};

use super::movement::Movement;
use super::object::PhysicsObject;
use super::position::Position;
use super::space::Toroidal2DPhysics;
use super::vector::Vector2D;
use crate::angle_difference;

/// Proportional/derivative gains for both control loops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdGains {
    pub kp_rotational: f64,
    pub kd_rotational: f64,
    pub kp_translational: f64,
    pub kd_translational: f64,
}

impl Default for PdGains {
    fn default() -> Self {
        Self {
            kp_rotational: 4.0,
            kd_rotational: 4.0,
            kp_translational: 0.64,
            kd_translational: 1.6,
        }
    }
}

/// "Target reached" thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveTolerances {
    /// Distance to goal considered arrived
    pub position: f64,
    /// Residual relative speed considered matched
    pub velocity: f64,
    /// Heading error considered aligned (radians)
    pub orientation: f64,
    /// Residual spin considered stopped (radians per unit time)
    pub angular_velocity: f64,
    /// Within this distance, hold the goal's orientation instead of facing it
    pub heading_hold_distance: f64,
}

impl Default for MoveTolerances {
    fn default() -> Self {
        Self {
            position: 1.0,
            velocity: 0.5,
            orientation: 0.01,
            angular_velocity: 0.01,
            heading_hold_distance: 10.0,
        }
    }
}

/// Steer toward a goal position with PD control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveAction {
    pub goal: Position,
    pub goal_velocity: Vector2D,
    pub gains: PdGains,
    pub tolerances: MoveTolerances,
}

impl MoveAction {
    /// Move to `goal` and stop there
    pub fn new(goal: Position) -> Self {
        Self {
            goal,
            goal_velocity: Vector2D::ZERO,
            gains: PdGains::default(),
            tolerances: MoveTolerances::default(),
        }
    }

    /// Arrive at `goal` travelling with `velocity`
    pub fn with_goal_velocity(mut self, velocity: Vector2D) -> Self {
        self.goal_velocity = velocity;
        self
    }

    pub fn with_gains(mut self, gains: PdGains) -> Self {
        self.gains = gains;
        self
    }

    pub fn with_tolerances(mut self, tolerances: MoveTolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Track another object: its current location and velocity become the goal
    pub fn toward_object(target: &PhysicsObject) -> Self {
        Self::new(target.position).with_goal_velocity(target.position.translational_velocity)
    }

    /// Heading the controller is currently steering toward
    pub fn target_orientation(&self, space: &Toroidal2DPhysics, current: &Position) -> f64 {
        let to_goal = space.find_shortest_distance_vector(current, &self.goal);
        if to_goal.magnitude() < self.tolerances.heading_hold_distance {
            self.goal.orientation
        } else {
            to_goal.angle()
        }
    }

    /// Heading error in [-π, π)
    pub fn orientation_error(&self, space: &Toroidal2DPhysics, current: &Position) -> f64 {
        angle_difference(current.orientation, self.target_orientation(space, current))
    }

    pub fn is_oriented(&self, space: &Toroidal2DPhysics, current: &Position) -> bool {
        self.orientation_error(space, current).abs() < self.tolerances.orientation
            && current.angular_velocity.abs() < self.tolerances.angular_velocity
    }

    pub fn is_at_goal(&self, space: &Toroidal2DPhysics, current: &Position) -> bool {
        let distance = space.find_shortest_distance(current, &self.goal);
        let speed_error = (self.goal_velocity - current.translational_velocity).magnitude();
        distance < self.tolerances.position && speed_error < self.tolerances.velocity
    }

    /// Both loops inside their tolerance bands
    pub fn is_finished(&self, space: &Toroidal2DPhysics, current: &Position) -> bool {
        self.is_at_goal(space, current) && self.is_oriented(space, current)
    }

    /// Angular acceleration (before clamping)
    pub fn orientation_acceleration(&self, space: &Toroidal2DPhysics, current: &Position) -> f64 {
        let g = &self.gains;
        if self.is_oriented(space, current) {
            return -g.kd_rotational * current.angular_velocity;
        }
        let error = self.orientation_error(space, current);
        g.kp_rotational * error - g.kd_rotational * current.angular_velocity
    }

    /// Translational acceleration (before clamping)
    pub fn translational_acceleration(
        &self,
        space: &Toroidal2DPhysics,
        current: &Position,
    ) -> Vector2D {
        let g = &self.gains;
        let velocity_error = self.goal_velocity - current.translational_velocity;
        if self.is_at_goal(space, current) {
            return velocity_error * g.kd_translational;
        }
        let position_error = space.find_shortest_distance_vector(current, &self.goal);
        position_error * g.kp_translational + velocity_error * g.kd_translational
    }

    /// The clamped command for this timestep
    pub fn movement(&self, space: &Toroidal2DPhysics, current: &Position) -> Movement {
        Movement::new(
            self.translational_acceleration(space, current),
            self.orientation_acceleration(space, current),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn world() -> Toroidal2DPhysics {
        Toroidal2DPhysics::new(WORLD_WIDTH, WORLD_HEIGHT, SIM_DT).unwrap()
    }

    /// Step `start` under `action`; returns the step at which it first
    /// reported finished, plus the final state
    fn run(action: &MoveAction, start: Position, max_steps: usize) -> (Option<usize>, Position) {
        let space = world();
        let mut current = start;
        for step in 0..max_steps {
            if action.is_finished(&space, &current) {
                return (Some(step), current);
            }
            let movement = action.movement(&space, &current);
            current = space.step_position(&current, &movement);
            space.toroidal_wrap(&mut current);
        }
        (None, current)
    }

    #[test]
    fn test_default_gains_are_critically_damped() {
        let g = PdGains::default();
        assert!((g.kd_rotational - 2.0 * g.kp_rotational.sqrt()).abs() < 1e-12);
        assert!((g.kd_translational - 2.0 * g.kp_translational.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_orientation_error_uses_wrapped_direction() {
        let space = world();
        // Goal is 100 units to the left through the seam, so face -x
        let current = Position::new(50.0, 500.0);
        let action = MoveAction::new(Position::new(1550.0, 500.0));
        let target = action.target_orientation(&space, &current);
        assert!((target.abs() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_holds_goal_heading_near_goal() {
        let space = world();
        let goal = Position::new(500.0, 500.0).with_orientation(1.0);
        let action = MoveAction::new(goal);
        // 5 units out: hold the goal's own orientation
        let near = Position::new(500.0, 495.0);
        assert_eq!(action.target_orientation(&space, &near), 1.0);
        // 50 units out: face the goal
        let far = Position::new(450.0, 500.0);
        assert_eq!(action.target_orientation(&space, &far), 0.0);
    }

    #[test]
    fn test_first_command_points_at_goal_and_is_clamped() {
        let space = world();
        let current = Position::new(100.0, 100.0);
        let action = MoveAction::new(Position::new(700.0, 100.0));
        let m = action.movement(&space, &current);
        let a = m.translational_acceleration();
        assert!((a.magnitude() - MAX_TRANSLATIONAL_ACCELERATION).abs() < 1e-9);
        assert_eq!(a.y(), 0.0);
        assert!(a.x() > 0.0);
        assert_eq!(m.angular_acceleration(), 0.0);
    }

    #[test]
    fn test_converges_from_various_starts() {
        let cases = [
            (Position::new(100.0, 100.0), Position::new(700.0, 500.0)),
            (Position::new(10.0, 10.0), Position::new(1590.0, 1070.0)),
            (Position::new(50.0, 50.0).with_orientation(-2.0), Position::new(1500.0, 900.0)),
            (Position::new(1200.0, 300.0).with_orientation(1.0), Position::new(200.0, 800.0)),
            (Position::new(100.0, 100.0).with_orientation(0.5), Position::new(1500.0, 100.0)),
        ];
        let space = world();
        for (start, goal) in cases {
            let action = MoveAction::new(goal);
            let (steps, end) = run(&action, start, 600);
            assert!(steps.is_some(), "did not converge from {start} to {goal}");
            assert!(space.find_shortest_distance(&end, &goal) < 1.0);
        }
    }

    #[test]
    fn test_reorients_in_place() {
        let start = Position::new(800.0, 540.0).with_orientation(3.0);
        let goal = Position::new(800.0, 540.0);
        let (steps, end) = run(&MoveAction::new(goal), start, 300);
        assert!(steps.is_some());
        assert!(angle_difference(end.orientation, 0.0).abs() < 0.01);
    }

    #[test]
    fn test_no_residual_oscillation_after_convergence() {
        let space = world();
        let goal = Position::new(700.0, 500.0);
        let action = MoveAction::new(goal);
        let (steps, mut current) = run(&action, Position::new(100.0, 100.0), 600);
        assert!(steps.is_some());

        let mut last = Movement::NONE;
        for _ in 0..200 {
            assert!(action.is_finished(&space, &current));
            last = action.movement(&space, &current);
            current = space.step_position(&current, &last);
            space.toroidal_wrap(&mut current);
        }
        assert!(last.translational_acceleration().magnitude() < 1e-3);
        assert!(last.angular_acceleration().abs() < 1e-3);
        assert!(space.find_shortest_distance(&current, &goal) < 1.0);
    }

    #[test]
    fn test_toward_object_matches_velocity() {
        let target = PhysicsObject::ship(
            9,
            1,
            Position::new(300.0, 300.0).with_velocity(Vector2D::new(4.0, -2.0)),
        );
        let action = MoveAction::toward_object(&target);
        assert_eq!(action.goal, target.position);
        assert_eq!(action.goal_velocity, Vector2D::new(4.0, -2.0));

        // Sitting on the goal already moving at the goal velocity needs no push
        let space = world();
        let here = Position::new(300.0, 300.0).with_velocity(Vector2D::new(4.0, -2.0));
        assert_eq!(action.translational_acceleration(&space, &here), Vector2D::ZERO);
    }
}
