//! # Time Discretization
//!
//! Maps continuous simulation time onto integer [`Tick`]s so the rule base
//! can reason about "simultaneous" arrivals. All events that fall inside one
//! resolution window share a tick:
//!
//! ```text
//! tick = floor(sim_time / resolution)
//! ```
//!
//! With the default 0.5 s resolution, 1.05 s and 1.45 s are both tick 2,
//! and 1.55 s is tick 3.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default discretization resolution in simulated seconds.
pub const DEFAULT_TIME_RESOLUTION: f64 = 0.5;

/// A discretized time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick(pub i64);

impl Tick {
    /// The raw bucket index.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts simulation seconds into ticks at a fixed resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDiscretizer {
    resolution: f64,
}

impl TimeDiscretizer {
    /// Create a discretizer. The resolution must be finite and `> 0`.
    pub fn new(resolution: f64) -> Result<Self, ValidationError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(ValidationError::InvalidResolution(resolution));
        }
        Ok(Self { resolution })
    }

    /// The bucket width in simulated seconds.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Map a simulation time to its tick.
    ///
    /// Total: non-finite inputs saturate (`NaN` maps to tick 0, infinities
    /// to the `i64` bounds).
    pub fn discretize(&self, sim_time: f64) -> Tick {
        Tick((sim_time / self.resolution).floor() as i64)
    }
}

impl Default for TimeDiscretizer {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_TIME_RESOLUTION,
        }
    }
}
