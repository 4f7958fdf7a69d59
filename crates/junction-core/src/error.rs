//! # Error Hierarchy
//!
//! Structured error types for Junction, built with `thiserror`.
//!
//! Only setup can fail loudly: malformed geometry, invalid configuration and
//! unreadable rule files surface as [`JunctionError`]. Solving and dispatch
//! never return errors; their failure modes are explicit outcome values in
//! `junction-reasoner` and `junction-monitor`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for Junction setup paths.
#[derive(Error, Debug)]
pub enum JunctionError {
    /// Malformed or degenerate intersection topology.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Identifier or configuration value failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The static traffic-rule program could not be read.
    #[error("failed to read traffic rules from {path}: {source}")]
    Rules {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while registering intersection geometry.
///
/// Any of these is fatal to the initialization of the intersection that
/// raised it, and to nothing else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A forward vector has no planar component to normalize.
    #[error("degenerate forward direction for {element}: ({x}, {y}, {z})")]
    DegenerateDirection {
        /// The element the direction belongs to.
        element: String,
        /// X component.
        x: f64,
        /// Y component.
        y: f64,
        /// Z component.
        z: f64,
    },

    /// A location or direction contains NaN or infinity.
    #[error("non-finite coordinates for {element}")]
    NonFinite {
        /// The element carrying the bad coordinates.
        element: String,
    },

    /// An element with this identifier is already registered.
    #[error("duplicate element {0}")]
    DuplicateElement(String),

    /// The fork is not part of this intersection.
    #[error("unknown fork {0}")]
    UnknownFork(String),

    /// The exit is not part of this intersection.
    #[error("unknown exit {0}")]
    UnknownExit(String),

    /// The exit is registered but has no slot on the fork.
    #[error("exit {exit} is not reachable from fork {fork}")]
    ExitNotReachable {
        /// Fork identifier.
        fork: String,
        /// Exit identifier.
        exit: String,
    },

    /// Two fork/exit pairs spell the same lane name, e.g. `a` + `to_b` and
    /// `a_to` + `b`.
    #[error("lane {lane} for {fork} -> {exit} is already taken by {existing_fork} -> {existing_exit}")]
    LaneCollision {
        /// The contested lane identifier.
        lane: String,
        /// Fork of the rejected activation.
        fork: String,
        /// Exit of the rejected activation.
        exit: String,
        /// Fork of the lane already holding the name.
        existing_fork: String,
        /// Exit of the lane already holding the name.
        existing_exit: String,
    },
}

/// Validation errors for identifiers and configuration values.
///
/// Each carries the rejected input so misconfiguration can be diagnosed
/// without guesswork.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Identifier is empty or contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid {kind} identifier: \"{value}\" (expected non-empty [A-Za-z0-9_])")]
    InvalidIdentifier {
        /// Identifier role ("vehicle", "fork", ...).
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Time resolution must be finite and strictly positive.
    #[error("invalid time resolution {0} (expected finite value > 0)")]
    InvalidResolution(f64),

    /// The model cap must allow at least one model.
    #[error("max_models must be at least 1")]
    InvalidModelCap,

    /// Monitor name is empty or not usable as a file stem.
    #[error("invalid monitor name: \"{0}\"")]
    InvalidName(String),
}
