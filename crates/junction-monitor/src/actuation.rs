//! # Actuation Sink
//!
//! The host owns its vehicles. The monitor only holds an injected
//! [`VehicleHandle`] per live agent, registered when the agent becomes
//! known and released when it is evicted.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use junction_core::VehicleId;

/// A command for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuationCommand {
    /// Hold position and yield.
    Stop,
    /// Proceed through the intersection.
    Go,
}

impl ActuationCommand {
    /// Lowercase command name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Go => "go",
        }
    }
}

impl std::fmt::Display for ActuationCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The vehicle does not accept externally injected commands.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("vehicle does not accept external commands")]
pub struct Uncontrollable;

/// Host-side control surface of one vehicle.
pub trait VehicleHandle: Send {
    /// Apply `command`, or refuse with [`Uncontrollable`].
    fn issue(&mut self, command: ActuationCommand) -> Result<(), Uncontrollable>;
}

// ---------------------------------------------------------------------------
// HandleRegistry
// ---------------------------------------------------------------------------

/// Live handles keyed by vehicle.
#[derive(Default)]
pub struct HandleRegistry {
    handles: BTreeMap<VehicleId, Box<dyn VehicleHandle>>,
}

impl HandleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` for `vehicle`, returning any handle it replaces.
    pub fn insert(
        &mut self,
        vehicle: VehicleId,
        handle: Box<dyn VehicleHandle>,
    ) -> Option<Box<dyn VehicleHandle>> {
        self.handles.insert(vehicle, handle)
    }

    /// Release the vehicle's handle. Returns whether one was held.
    pub fn remove(&mut self, vehicle: &VehicleId) -> bool {
        self.handles.remove(vehicle).is_some()
    }

    /// Mutable access to a live handle.
    pub fn get_mut(&mut self, vehicle: &VehicleId) -> Option<&mut (dyn VehicleHandle + 'static)> {
        self.handles.get_mut(vehicle).map(|h| h.as_mut())
    }

    /// Whether a handle is held for `vehicle`.
    pub fn contains(&self, vehicle: &VehicleId) -> bool {
        self.handles.contains_key(vehicle)
    }

    /// Vehicles with live handles, in identifier order.
    pub fn vehicles(&self) -> impl Iterator<Item = &VehicleId> {
        self.handles.keys()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handle is held.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl std::fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handles.keys()).finish()
    }
}

// ---------------------------------------------------------------------------
// RecordingHandle
// ---------------------------------------------------------------------------

/// Shared, ordered record of commands accepted by [`RecordingHandle`]s.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    entries: Arc<Mutex<Vec<(VehicleId, ActuationCommand)>>>,
}

impl CommandLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded command in issue order.
    pub fn entries(&self) -> Vec<(VehicleId, ActuationCommand)> {
        self.entries.lock().clone()
    }

    /// The most recent command accepted for `vehicle`.
    pub fn last_for(&self, vehicle: &VehicleId) -> Option<ActuationCommand> {
        self.entries
            .lock()
            .iter()
            .rev()
            .find(|(v, _)| v == vehicle)
            .map(|(_, c)| *c)
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn push(&self, vehicle: &VehicleId, command: ActuationCommand) {
        self.entries.lock().push((vehicle.clone(), command));
    }
}

/// A handle that records accepted commands instead of driving a vehicle.
/// Used by replay tooling and tests.
#[derive(Debug, Clone)]
pub struct RecordingHandle {
    vehicle: VehicleId,
    log: CommandLog,
    controllable: bool,
}

impl RecordingHandle {
    /// A controllable handle writing into `log`.
    pub fn new(vehicle: VehicleId, log: CommandLog) -> Self {
        Self {
            vehicle,
            log,
            controllable: true,
        }
    }

    /// A handle that refuses every command.
    pub fn uncontrollable(vehicle: VehicleId, log: CommandLog) -> Self {
        Self {
            vehicle,
            log,
            controllable: false,
        }
    }
}

impl VehicleHandle for RecordingHandle {
    fn issue(&mut self, command: ActuationCommand) -> Result<(), Uncontrollable> {
        if !self.controllable {
            return Err(Uncontrollable);
        }
        self.log.push(&self.vehicle, command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> VehicleId {
        VehicleId::new(name).unwrap()
    }

    #[test]
    fn recording_handle_logs_commands() {
        let log = CommandLog::new();
        let mut handle = RecordingHandle::new(v("a"), log.clone());
        handle.issue(ActuationCommand::Stop).unwrap();
        handle.issue(ActuationCommand::Go).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.last_for(&v("a")), Some(ActuationCommand::Go));
        assert_eq!(log.last_for(&v("b")), None);
    }

    #[test]
    fn uncontrollable_handle_refuses() {
        let log = CommandLog::new();
        let mut handle = RecordingHandle::uncontrollable(v("a"), log.clone());
        assert_eq!(handle.issue(ActuationCommand::Go), Err(Uncontrollable));
        assert!(log.is_empty());
    }

    #[test]
    fn registry_insert_replace_remove() {
        let log = CommandLog::new();
        let mut registry = HandleRegistry::new();
        assert!(registry
            .insert(v("a"), Box::new(RecordingHandle::new(v("a"), log.clone())))
            .is_none());
        assert!(registry
            .insert(v("a"), Box::new(RecordingHandle::new(v("a"), log.clone())))
            .is_some());
        assert_eq!(registry.len(), 1);
        registry
            .get_mut(&v("a"))
            .unwrap()
            .issue(ActuationCommand::Stop)
            .unwrap();
        assert!(registry.remove(&v("a")));
        assert!(!registry.remove(&v("a")));
        assert!(registry.get_mut(&v("a")).is_none());
        assert_eq!(log.entries(), vec![(v("a"), ActuationCommand::Stop)]);
    }

    #[test]
    fn command_display() {
        assert_eq!(ActuationCommand::Stop.to_string(), "stop");
        assert_eq!(ActuationCommand::Go.to_string(), "go");
    }
}
