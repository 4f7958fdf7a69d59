//! # junction-core: Foundational Types for Junction
//!
//! Every other crate in the workspace depends on `junction-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Role-prefixed identifiers.** `VehicleId`, `ForkId`, `ExitId` and
//!    `LaneId` are distinct newtypes. Each renders as a logic constant with its
//!    role prefix (`v_`, `f_`, `e_`, `l_`) so vehicle and geometry names can
//!    never collide inside one program.
//!
//! 2. **One atom type.** Geometry facts, event facts and solved model atoms
//!    are all [`Atom`] values. Text rendering happens in exactly one place.
//!
//! 3. **Ticks, not seconds.** Simulation time only reaches the rule base
//!    through [`TimeDiscretizer`], so near-simultaneous events compare equal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `junction-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod atom;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod signal;
pub mod temporal;
pub mod vector;

// Re-export primary types for ergonomic imports.
pub use atom::{Atom, Term};
pub use config::MonitorConfig;
pub use digest::{sha256_fingerprint, Fingerprint};
pub use error::{GeometryError, JunctionError, ValidationError};
pub use identity::{ExitId, ForkId, LaneId, VehicleId};
pub use signal::TurnSignal;
pub use temporal::{Tick, TimeDiscretizer};
pub use vector::Vec3;
