//! # Bearing and Signal Derivation
//!
//! Two empirically chosen thresholds live here:
//!
//! - **Right-of band.** Fork A is on the right of fork B when the planar
//!   cross product of their unit forward vectors exceeds `+0.5`, i.e. the
//!   angle from A to B lies strictly between 30° and 150°. `|cross| <= 0.5`
//!   (near-parallel or near-opposite approaches) yields no relation.
//!
//! - **Straight band.** A lane needs no indicator when the cosine between
//!   entry and exit directions is at least `0.866` (turn of 30° or less).
//!   Otherwise the sign of the vertical cross component picks left/right.
//!
//! Both are strict reproductions, not derivations. Do not "fix" them.

use junction_core::{TurnSignal, Vec3};

/// Planar cross product above which the first fork is on the right of the second.
pub const RIGHT_OF_THRESHOLD: f64 = 0.5;

/// Turn cosine at or above which a lane requires no indicator.
pub const STRAIGHT_COSINE: f64 = 0.866;

/// Turn cosine below which a lane is treated as a U-turn.
pub const U_TURN_COSINE: f64 = -0.8;

/// Relative bearing of one fork with respect to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bearing {
    /// The first fork is on the right of the second.
    RightOf,
    /// The first fork is on the left of the second.
    LeftOf,
    /// Inside the dead zone: roughly parallel or opposite approaches.
    Unrelated,
}

/// Classify `ego` relative to `other` from their forward vectors.
pub fn bearing(ego_forward: &Vec3, other_forward: &Vec3) -> Bearing {
    let sine = ego_forward.cross_2d(other_forward);
    if sine > RIGHT_OF_THRESHOLD {
        Bearing::RightOf
    } else if sine < -RIGHT_OF_THRESHOLD {
        Bearing::LeftOf
    } else {
        Bearing::Unrelated
    }
}

/// Whether the fork facing `ego_forward` is on the right of the fork facing
/// `other_forward`.
pub fn is_on_right_of(ego_forward: &Vec3, other_forward: &Vec3) -> bool {
    bearing(ego_forward, other_forward) == Bearing::RightOf
}

/// The indicator a vehicle should show to drive from an entry facing
/// `entry_forward` to an exit facing `exit_forward`.
pub fn required_signal(entry_forward: &Vec3, exit_forward: &Vec3) -> TurnSignal {
    let cosine = entry_forward.cosine_angle_2d(exit_forward);
    if cosine >= STRAIGHT_COSINE {
        return TurnSignal::Off;
    }
    if entry_forward.cross(exit_forward).z < 0.0 {
        TurnSignal::Left
    } else {
        TurnSignal::Right
    }
}

/// Shape classification of a lane's connecting curve.
///
/// Diagnostic only: lanes are compiled into facts regardless of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneShape {
    /// A single-arc cubic connects entry and exit.
    Smooth,
    /// Entry and exit point in roughly opposite directions.
    UTurn,
    /// The connecting curve would need an inflection point.
    NeedsInflection,
}

impl LaneShape {
    /// Classify the curve from `entry` (facing `entry_forward`) to `exit`
    /// (facing `exit_forward`).
    pub fn classify(entry: &Vec3, entry_forward: &Vec3, exit: &Vec3, exit_forward: &Vec3) -> Self {
        if entry_forward.cosine_angle_2d(exit_forward) < U_TURN_COSINE {
            return Self::UTurn;
        }
        let delta = *exit - *entry;
        let c01 = entry_forward.cross_2d(exit_forward);
        let c0 = entry_forward.cross_2d(&delta);
        let c1 = exit_forward.cross_2d(&delta);
        if c0 * c01 > 0.0 && c1 * c01 < 0.0 {
            return Self::Smooth;
        }
        // Straight-through lanes have c01 == 0 and need no tangent scaling.
        if c01.abs() <= f64::EPSILON && c0.abs() <= f64::EPSILON {
            return Self::Smooth;
        }
        Self::NeedsInflection
    }
}
