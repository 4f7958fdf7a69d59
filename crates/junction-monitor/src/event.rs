//! # Overlap Events
//!
//! Physical overlap notifications delivered by the host, and the fact atoms
//! each one contributes to the ledger:
//!
//! | Event | Atoms |
//! |---|---|
//! | arrival | `arrivesAtForkAtTime(v, f, T)`, plus `signalsAtForkAtTime(v, S, f, T)` when a signal is reported |
//! | entrance | `entersForkAtTime(v, f, T)` |
//! | lane entry | `entersLaneAtTime(v, l, T)` |
//! | lane exit | `leavesLaneAtTime(v, l, T)` |
//! | region exit | none (eviction) |

use serde::{Deserialize, Serialize};

use junction_core::{Atom, ForkId, LaneId, Term, Tick, TurnSignal, VehicleId};
use junction_geometry::ElementKind;

/// Lifecycle phase of an agent inside the monitored region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Waiting at a fork.
    Arrived,
    /// Inside the intersection box, between lanes.
    Entered,
    /// Traversing a lane.
    InLane,
    /// Left the monitored region. Terminal; the agent is evicted.
    Departed,
}

impl AgentPhase {
    /// Whether `from → to` is an expected transition. Unexpected transitions
    /// are still applied.
    pub fn expects(from: Option<AgentPhase>, to: AgentPhase) -> bool {
        use AgentPhase::*;
        matches!(
            (from, to),
            (None, Arrived)
                | (Some(Arrived), Entered)
                | (Some(Entered), InLane)
                | (Some(InLane), Entered)
                | (Some(InLane), InLane)
                | (_, Departed)
        )
    }
}

/// One overlap notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum OverlapEvent {
    /// A vehicle reached a fork.
    Arrival {
        /// The arriving vehicle.
        vehicle: VehicleId,
        /// The fork it reached.
        fork: ForkId,
        /// Simulation time in seconds.
        sim_time: f64,
        /// Indicator the vehicle is showing, if the host reports one.
        #[serde(default)]
        signal: Option<TurnSignal>,
    },
    /// A vehicle crossed from its fork into the intersection.
    Entrance {
        /// The entering vehicle.
        vehicle: VehicleId,
        /// The fork it entered from.
        fork: ForkId,
        /// Simulation time in seconds.
        sim_time: f64,
    },
    /// A vehicle entered a lane.
    EnterLane {
        /// The vehicle.
        vehicle: VehicleId,
        /// The lane entered.
        lane: LaneId,
        /// Simulation time in seconds.
        sim_time: f64,
    },
    /// A vehicle left a lane.
    ExitLane {
        /// The vehicle.
        vehicle: VehicleId,
        /// The lane left.
        lane: LaneId,
        /// Simulation time in seconds.
        sim_time: f64,
    },
    /// A vehicle left the monitored region.
    ExitIntersection {
        /// The departing vehicle.
        vehicle: VehicleId,
    },
}

impl OverlapEvent {
    /// The vehicle this event concerns.
    pub fn vehicle(&self) -> &VehicleId {
        match self {
            Self::Arrival { vehicle, .. }
            | Self::Entrance { vehicle, .. }
            | Self::EnterLane { vehicle, .. }
            | Self::ExitLane { vehicle, .. }
            | Self::ExitIntersection { vehicle } => vehicle,
        }
    }

    /// Event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Arrival { .. } => "arrival",
            Self::Entrance { .. } => "entrance",
            Self::EnterLane { .. } => "enter_lane",
            Self::ExitLane { .. } => "exit_lane",
            Self::ExitIntersection { .. } => "exit_intersection",
        }
    }

    /// Simulation time, absent for region exits.
    pub fn sim_time(&self) -> Option<f64> {
        match self {
            Self::Arrival { sim_time, .. }
            | Self::Entrance { sim_time, .. }
            | Self::EnterLane { sim_time, .. }
            | Self::ExitLane { sim_time, .. } => Some(*sim_time),
            Self::ExitIntersection { .. } => None,
        }
    }

    /// The geometry element this event names, with the kind it must have.
    pub fn element(&self) -> Option<(String, ElementKind)> {
        match self {
            Self::Arrival { fork, .. } | Self::Entrance { fork, .. } => {
                Some((fork.constant(), ElementKind::Entry))
            }
            Self::EnterLane { lane, .. } | Self::ExitLane { lane, .. } => {
                Some((lane.constant(), ElementKind::Lane))
            }
            Self::ExitIntersection { .. } => None,
        }
    }

    /// Phase the agent is in after this event.
    pub fn phase(&self) -> AgentPhase {
        match self {
            Self::Arrival { .. } => AgentPhase::Arrived,
            Self::Entrance { .. } | Self::ExitLane { .. } => AgentPhase::Entered,
            Self::EnterLane { .. } => AgentPhase::InLane,
            Self::ExitIntersection { .. } => AgentPhase::Departed,
        }
    }

    /// Fact atoms contributed by this event at `tick`.
    pub fn facts(&self, tick: Tick) -> Vec<Atom> {
        let t = Term::from(tick.value());
        match self {
            Self::Arrival {
                vehicle,
                fork,
                signal,
                ..
            } => {
                let mut atoms = vec![Atom::new(
                    "arrivesAtForkAtTime",
                    vec![Term::sym(vehicle.constant()), Term::sym(fork.constant()), t.clone()],
                )];
                if let Some(signal) = signal {
                    atoms.push(Atom::new(
                        "signalsAtForkAtTime",
                        vec![
                            Term::sym(vehicle.constant()),
                            Term::sym(signal.as_str()),
                            Term::sym(fork.constant()),
                            t,
                        ],
                    ));
                }
                atoms
            }
            Self::Entrance { vehicle, fork, .. } => vec![Atom::new(
                "entersForkAtTime",
                vec![Term::sym(vehicle.constant()), Term::sym(fork.constant()), t],
            )],
            Self::EnterLane { vehicle, lane, .. } => vec![Atom::new(
                "entersLaneAtTime",
                vec![Term::sym(vehicle.constant()), Term::sym(lane.constant()), t],
            )],
            Self::ExitLane { vehicle, lane, .. } => vec![Atom::new(
                "leavesLaneAtTime",
                vec![Term::sym(vehicle.constant()), Term::sym(lane.constant()), t],
            )],
            Self::ExitIntersection { .. } => Vec::new(),
        }
    }
}
