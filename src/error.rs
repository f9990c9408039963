//! Error types for the fallible entry points.
//!
//! Numeric degeneracies inside the collision and integration code are handled inline
//! and never surface here. These errors only report bad input at the API boundary.

use thiserror::Error;

/// A point set that cannot describe a convex hull
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HullError {
    #[error("a convex hull needs at least one point")]
    Empty,
    #[error("hull point {index} is not finite")]
    NonFinitePoint { index: usize },
}

/// An invalid [`WorldConfig`](crate::WorldConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("collision iterations must be at least 1")]
    ZeroIterations,
    #[error("MPR iteration cap must be at least 1")]
    ZeroMprIterations,
    #[error("push-out distance must be finite and non-negative, got {0}")]
    InvalidPushOut(f32),
    #[error("gravity must be finite")]
    NonFiniteGravity,
    #[error("failed to parse world config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures reported by [`World::step`](crate::World::step)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f32),
}
