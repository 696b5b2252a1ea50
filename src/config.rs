//! Simulation configuration
//!
//! World dimensions, timestep, and controller tuning arrive as plain values
//! from whatever loads the match. `SimConfig` deserializes from JSON with
//! every field defaulted, so a file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PhysicsError, PhysicsResult};
use crate::sim::move_action::{MoveTolerances, PdGains};

/// World and controller settings for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: f64,
    pub height: f64,
    /// Seconds per simulation step
    pub timestep: f64,
    /// Rejection-sampling budget for free-location searches
    pub max_free_location_attempts: u32,
    pub gains: PdGains,
    pub tolerances: MoveTolerances,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            timestep: SIM_DT,
            max_free_location_attempts: MAX_FREE_LOCATION_ATTEMPTS,
            gains: PdGains::default(),
            tolerances: MoveTolerances::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> PhysicsResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> PhysicsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {}: {}x{} world, dt={}",
            path.display(),
            config.width,
            config.height,
            config.timestep
        );
        Ok(config)
    }

    pub fn to_json(&self) -> PhysicsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value is usable before building a world from it
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
        {
            return Err(PhysicsError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PhysicsError::InvalidTimestep(self.timestep));
        }
        if self.max_free_location_attempts == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_free_location_attempts must be at least 1".to_string(),
            ));
        }

        let g = &self.gains;
        for (name, value) in [
            ("kp_rotational", g.kp_rotational),
            ("kd_rotational", g.kd_rotational),
            ("kp_translational", g.kp_translational),
            ("kd_translational", g.kd_translational),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "gain {name} = {value} must be finite and non-negative"
                )));
            }
        }

        let t = &self.tolerances;
        for (name, value) in [
            ("position", t.position),
            ("velocity", t.velocity),
            ("orientation", t.orientation),
            ("angular_velocity", t.angular_velocity),
            ("heading_hold_distance", t.heading_hold_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "tolerance {name} = {value} must be finite and positive"
                )));
            }
        }
        Ok(())
    }
}
