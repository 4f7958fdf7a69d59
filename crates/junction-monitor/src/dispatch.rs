//! # Actuation Dispatcher
//!
//! Maps the selected model onto vehicle commands:
//!
//! - `mustStopToYield(v_X)` → [`ActuationCommand::Stop`] for `X`
//! - `hasRightOfWay(v_X)` → [`ActuationCommand::Go`] for `X`
//!
//! Stops are issued before goes, each group in canonical atom order. A
//! vehicle named by both predicates is stopped; its go is skipped as a
//! [`DispatchSkip::ConflictingVerdict`].
//!
//! Nothing here is fatal. Every predicate that cannot be acted on becomes a
//! [`DispatchSkip`] in the returned [`DispatchReport`]. The dispatcher holds
//! no state between calls.

use std::collections::BTreeSet;

use junction_core::{Atom, VehicleId};
use junction_reasoner::Model;

use crate::actuation::{ActuationCommand, HandleRegistry};

/// Predicate that yields [`ActuationCommand::Stop`].
pub const STOP_PREDICATE: &str = "mustStopToYield";

/// Predicate that yields [`ActuationCommand::Go`].
pub const GO_PREDICATE: &str = "hasRightOfWay";

/// Why one solved predicate produced no command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchSkip {
    /// The vehicle has no live handle, typically because it left between
    /// solve and dispatch.
    UnresolvedAgent {
        /// The vehicle named by the model.
        vehicle: VehicleId,
        /// The command that was not issued.
        command: ActuationCommand,
    },
    /// The vehicle refused command injection.
    Uncontrollable {
        /// The refusing vehicle.
        vehicle: VehicleId,
        /// The refused command.
        command: ActuationCommand,
    },
    /// The predicate's subject is not a vehicle constant.
    MalformedSubject {
        /// The offending atom, rendered.
        atom: String,
    },
    /// The vehicle was also told to stop; the go is dropped.
    ConflictingVerdict {
        /// The vehicle named by both predicates.
        vehicle: VehicleId,
    },
}

/// What one dispatch did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands accepted by their handles, in issue order.
    pub issued: Vec<(VehicleId, ActuationCommand)>,
    /// Predicates that produced no command.
    pub skipped: Vec<DispatchSkip>,
}

impl DispatchReport {
    /// Whether nothing was issued or skipped.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty() && self.skipped.is_empty()
    }

    /// The command issued to `vehicle`, if any.
    pub fn command_for(&self, vehicle: &VehicleId) -> Option<ActuationCommand> {
        self.issued
            .iter()
            .rev()
            .find(|(v, _)| v == vehicle)
            .map(|(_, c)| *c)
    }
}

/// Stateless mapping from models to commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActuationDispatcher;

fn subjects<'a>(
    model: &'a Model,
    predicate: &'a str,
    skipped: &mut Vec<DispatchSkip>,
) -> Vec<VehicleId> {
    let mut out = Vec::new();
    for atom in model.with_predicate(predicate, 1) {
        match subject(atom) {
            Some(vehicle) => out.push(vehicle),
            None => {
                tracing::warn!(atom = %atom, "solved predicate does not name a vehicle");
                skipped.push(DispatchSkip::MalformedSubject {
                    atom: atom.to_string(),
                });
            }
        }
    }
    out
}

fn subject(atom: &Atom) -> Option<VehicleId> {
    atom.args()
        .first()
        .and_then(|t| t.as_symbol())
        .and_then(VehicleId::from_constant)
}

impl ActuationDispatcher {
    /// Apply `model` to the live handles.
    pub fn dispatch(model: &Model, handles: &mut HandleRegistry) -> DispatchReport {
        let mut report = DispatchReport::default();
        let stops = subjects(model, STOP_PREDICATE, &mut report.skipped);
        let goes = subjects(model, GO_PREDICATE, &mut report.skipped);
        let stopped: BTreeSet<&VehicleId> = stops.iter().collect();

        let plan = stops
            .iter()
            .map(|v| (v, ActuationCommand::Stop))
            .chain(goes.iter().map(|v| (v, ActuationCommand::Go)));
        for (vehicle, command) in plan {
            if command == ActuationCommand::Go && stopped.contains(vehicle) {
                tracing::warn!(vehicle = %vehicle, "model grants and denies right of way; stopping");
                report.skipped.push(DispatchSkip::ConflictingVerdict {
                    vehicle: vehicle.clone(),
                });
                continue;
            }
            let Some(handle) = handles.get_mut(vehicle) else {
                tracing::warn!(
                    vehicle = %vehicle,
                    command = %command,
                    "no live handle for solved agent; skipped"
                );
                report.skipped.push(DispatchSkip::UnresolvedAgent {
                    vehicle: vehicle.clone(),
                    command,
                });
                continue;
            };
            match handle.issue(command) {
                Ok(()) => {
                    tracing::debug!(vehicle = %vehicle, command = %command, "command issued");
                    report.issued.push((vehicle.clone(), command));
                }
                Err(err) => {
                    tracing::warn!(vehicle = %vehicle, command = %command, error = %err, "command refused");
                    report.skipped.push(DispatchSkip::Uncontrollable {
                        vehicle: vehicle.clone(),
                        command,
                    });
                }
            }
        }
        report
    }
}
