//! # junction-monitor: Right-of-Way Arbitration Core
//!
//! Owns the live state of one monitored intersection and runs the
//! record → solve → dispatch cycle for every overlap event.
//!
//! ## Architecture
//!
//! - **Events** (`event.rs`): overlap notifications and the fact atoms they
//!   contribute, plus the per-agent phase machine.
//!
//! - **Ledger** (`ledger.rs`): per-agent append-only fact histories, evicted
//!   wholesale when an agent leaves the region.
//!
//! - **Actuation** (`actuation.rs`): the injected [`VehicleHandle`] seam and
//!   the handle registry.
//!
//! - **Dispatch** (`dispatch.rs`): selected model → stop/go commands, with
//!   every unactionable predicate reported as a [`DispatchSkip`].
//!
//! - **Artifacts** (`artifacts.rs`): best-effort geometry dump and solved
//!   program log.
//!
//! - **Monitor** (`monitor.rs`): the cycle itself. [`SharedMonitor`]
//!   (`shared.rs`) serializes cycles for multi-threaded hosts.

pub mod actuation;
pub mod artifacts;
pub mod dispatch;
pub mod event;
pub mod ledger;
pub mod monitor;
pub mod shared;

pub use actuation::{
    ActuationCommand, CommandLog, HandleRegistry, RecordingHandle, Uncontrollable, VehicleHandle,
};
pub use artifacts::ArtifactWriter;
pub use dispatch::{ActuationDispatcher, DispatchReport, DispatchSkip};
pub use event::{AgentPhase, OverlapEvent};
pub use ledger::{AgentRecord, EventLedger};
pub use monitor::{CycleReport, Monitor, Solution};
pub use shared::SharedMonitor;
