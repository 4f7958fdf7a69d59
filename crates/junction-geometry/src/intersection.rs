//! # Intersection Entity Store
//!
//! Arena-style ownership of every fork, exit and lane of one intersection.
//! Elements are referenced by their stable identifiers, never by pointer.
//!
//! Each element's kind is recorded once at registration under its
//! role-prefixed constant, so resolving `l_north_to_west` back to a lane is a
//! map lookup rather than a probe of every collection.
//!
//! ## Mutation
//!
//! After setup the only permitted mutation is lane activation
//! ([`Intersection::set_lane_active`]). Every mutation bumps
//! [`Intersection::revision`], which the geometry compiler uses to decide
//! whether its cached facts are stale.

use std::collections::BTreeMap;

use junction_core::{ExitId, ForkId, GeometryError, LaneId, Vec3};

use crate::bearing::{required_signal, LaneShape};
use crate::element::{Element, ElementKind, EntryPoint, ExitPoint, ExitSlot, Lane};

/// The static topology of one intersection.
#[derive(Debug, Clone, Default)]
pub struct Intersection {
    forks: BTreeMap<ForkId, EntryPoint>,
    exits: BTreeMap<ExitId, ExitPoint>,
    lanes: BTreeMap<LaneId, Lane>,
    kinds: BTreeMap<String, ElementKind>,
    revision: u64,
}

fn unit_forward(element: &str, location: Vec3, forward: Vec3) -> Result<Vec3, GeometryError> {
    if !location.is_finite() || !forward.is_finite() {
        return Err(GeometryError::NonFinite {
            element: element.to_string(),
        });
    }
    forward
        .flatten()
        .normalized()
        .ok_or_else(|| GeometryError::DegenerateDirection {
            element: element.to_string(),
            x: forward.x,
            y: forward.y,
            z: forward.z,
        })
}

impl Intersection {
    /// An intersection with no elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry point. The forward vector is flattened onto the
    /// ground plane and normalized.
    pub fn add_fork(&mut self, id: ForkId, location: Vec3, forward: Vec3) -> Result<(), GeometryError> {
        let constant = id.constant();
        if self.kinds.contains_key(&constant) {
            return Err(GeometryError::DuplicateElement(constant));
        }
        let forward = unit_forward(&constant, location, forward)?;
        self.kinds.insert(constant, ElementKind::Entry);
        self.forks.insert(
            id.clone(),
            EntryPoint {
                id,
                location,
                forward,
                exits: Vec::new(),
            },
        );
        self.revision += 1;
        Ok(())
    }

    /// Register an exit point.
    pub fn add_exit(&mut self, id: ExitId, location: Vec3, forward: Vec3) -> Result<(), GeometryError> {
        let constant = id.constant();
        if self.kinds.contains_key(&constant) {
            return Err(GeometryError::DuplicateElement(constant));
        }
        let forward = unit_forward(&constant, location, forward)?;
        self.kinds.insert(constant, ElementKind::Exit);
        self.exits.insert(id.clone(), ExitPoint { id, location, forward });
        self.revision += 1;
        Ok(())
    }

    /// Make `exit` reachable from `fork` through an (initially inactive)
    /// slot. Idempotent.
    pub fn connect(&mut self, fork: &ForkId, exit: &ExitId) -> Result<(), GeometryError> {
        if !self.exits.contains_key(exit) {
            return Err(GeometryError::UnknownExit(exit.to_string()));
        }
        let entry = self
            .forks
            .get_mut(fork)
            .ok_or_else(|| GeometryError::UnknownFork(fork.to_string()))?;
        if entry.slot(exit).is_none() {
            entry.exits.push(ExitSlot::new(exit.clone()));
            self.revision += 1;
        }
        Ok(())
    }

    /// Connect every fork to every exit.
    pub fn connect_all(&mut self) {
        let exits: Vec<ExitId> = self.exits.keys().cloned().collect();
        for entry in self.forks.values_mut() {
            for exit in &exits {
                if entry.slot(exit).is_none() {
                    entry.exits.push(ExitSlot::new(exit.clone()));
                    self.revision += 1;
                }
            }
        }
    }

    /// Activate or deactivate the lane for a fork/exit slot.
    ///
    /// Activation creates the lane `<fork>_to_<exit>` and derives its
    /// required signal; deactivation destroys it. Returns the lane id while
    /// active. Toggling to the current state is a no-op.
    ///
    /// Lane names are not injective over fork/exit pairs, so activating a
    /// pair whose name is held by another active lane fails with
    /// [`GeometryError::LaneCollision`] and leaves the topology untouched.
    pub fn set_lane_active(
        &mut self,
        fork: &ForkId,
        exit: &ExitId,
        active: bool,
    ) -> Result<Option<LaneId>, GeometryError> {
        let exit_point = self
            .exits
            .get(exit)
            .ok_or_else(|| GeometryError::UnknownExit(exit.to_string()))?;
        let entry = self
            .forks
            .get_mut(fork)
            .ok_or_else(|| GeometryError::UnknownFork(fork.to_string()))?;
        let slot = entry
            .exits
            .iter_mut()
            .find(|s| &s.exit == exit)
            .ok_or_else(|| GeometryError::ExitNotReachable {
                fork: fork.to_string(),
                exit: exit.to_string(),
            })?;

        match (active, slot.lane.clone()) {
            (true, Some(lane)) => Ok(Some(lane)),
            (false, None) => Ok(None),
            (true, None) => {
                let id = LaneId::between(fork, exit);
                if let Some(existing) = self.lanes.get(&id) {
                    return Err(GeometryError::LaneCollision {
                        lane: id.to_string(),
                        fork: fork.to_string(),
                        exit: exit.to_string(),
                        existing_fork: existing.fork().to_string(),
                        existing_exit: existing.exit().to_string(),
                    });
                }
                let shape = LaneShape::classify(
                    &entry.location,
                    &entry.forward,
                    &exit_point.location,
                    &exit_point.forward,
                );
                match shape {
                    LaneShape::UTurn => {
                        tracing::warn!(lane = %id, "lane requires a U-turn; no mid-turn interpolant")
                    }
                    LaneShape::NeedsInflection => {
                        tracing::warn!(lane = %id, "lane requires an inflection point")
                    }
                    LaneShape::Smooth => {}
                }
                let lane = Lane {
                    id: id.clone(),
                    fork: fork.clone(),
                    exit: exit.clone(),
                    required_signal: required_signal(&entry.forward, &exit_point.forward),
                    shape,
                    start: entry.location,
                    end: exit_point.location,
                };
                slot.active = true;
                slot.lane = Some(id.clone());
                self.kinds.insert(id.constant(), ElementKind::Lane);
                self.lanes.insert(id.clone(), lane);
                self.revision += 1;
                tracing::debug!(lane = %id, "lane activated");
                Ok(Some(id))
            }
            (false, Some(lane)) => {
                slot.active = false;
                slot.lane = None;
                self.kinds.remove(&lane.constant());
                self.lanes.remove(&lane);
                self.revision += 1;
                tracing::debug!(lane = %lane, "lane deactivated");
                Ok(None)
            }
        }
    }

    /// Look up a fork.
    pub fn fork(&self, id: &ForkId) -> Option<&EntryPoint> {
        self.forks.get(id)
    }

    /// Look up an exit.
    pub fn exit(&self, id: &ExitId) -> Option<&ExitPoint> {
        self.exits.get(id)
    }

    /// Look up a lane.
    pub fn lane(&self, id: &LaneId) -> Option<&Lane> {
        self.lanes.get(id)
    }

    /// All forks in identifier order.
    pub fn forks(&self) -> impl Iterator<Item = &EntryPoint> {
        self.forks.values()
    }

    /// All exits in identifier order.
    pub fn exits(&self) -> impl Iterator<Item = &ExitPoint> {
        self.exits.values()
    }

    /// All active lanes in identifier order.
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.values()
    }

    /// Resolve a role-prefixed constant (`f_`, `e_`, `l_`) to its element.
    pub fn element(&self, constant: &str) -> Option<Element<'_>> {
        match self.kinds.get(constant)? {
            ElementKind::Entry => ForkId::from_constant(constant)
                .and_then(|id| self.forks.get(&id))
                .map(Element::Entry),
            ElementKind::Exit => ExitId::from_constant(constant)
                .and_then(|id| self.exits.get(&id))
                .map(Element::Exit),
            ElementKind::Lane => LaneId::from_constant(constant)
                .and_then(|id| self.lanes.get(&id))
                .map(Element::Lane),
        }
    }

    /// Mutation counter; changes whenever topology changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether no element is registered.
    pub fn is_empty(&self) -> bool {
        self.forks.is_empty() && self.exits.is_empty()
    }
}
