//! Reportable failures of the physics core.
//!
//! Numeric edge cases (non-finite state, zero-length normals, oversized
//! commands) are not errors: they have validity predicates or fallbacks.
//! The variants here are the conditions a caller must handle.

use thiserror::Error;

/// Errors surfaced by the physics core and its configuration layer.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Rejection sampling ran out of attempts before finding a clear spot.
    #[error("no free location found after {attempts} attempts (clearance {clearance})")]
    NoFreeLocation { attempts: u32, clearance: f64 },

    #[error("invalid world dimensions {width}x{height}: both must be finite and positive")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("invalid timestep {0}: must be finite and positive")]
    InvalidTimestep(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Sampling center, radius, or clearance was non-finite (or a negative radius).
    #[error("invalid sampling parameter {name} = {value}")]
    InvalidSamplingParameter { name: &'static str, value: f64 },

    /// A movement command addressed an object that is not in the world.
    #[error("unknown object id {0}")]
    UnknownObject(u32),

    #[error("object id {0} is already in the world")]
    DuplicateObject(u32),

    #[error("object ids exhausted")]
    ObjectIdsExhausted,
}

/// Convenience alias: a `Result` using `PhysicsError` as the error type.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
