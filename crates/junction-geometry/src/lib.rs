//! # junction-geometry: Static Intersection Topology
//!
//! Owns the entity store for one intersection and compiles it into logic
//! facts exactly once.
//!
//! ## Architecture
//!
//! - **Elements** (`element.rs`): plain data records for forks (entry
//!   points), exits and lanes, plus the closed [`Element`] variant.
//!
//! - **Bearing** (`bearing.rs`): the "is-on-right-of" tolerance band and the
//!   required turn-signal derivation. Both thresholds are empirical and are
//!   reproduced exactly because downstream rules are tuned against them.
//!
//! - **Intersection** (`intersection.rs`): arena-style store keyed by stable
//!   identifiers. Immutable after setup except for lane activation.
//!
//! - **Overlap** (`overlap.rs`): the injected capability answering whether
//!   two lanes' swept regions intersect.
//!
//! - **Compiler** (`compiler.rs`): topology → `isOnRightOf`, `laneFromTo`,
//!   `laneCorrectSignal` and `overlaps` facts.
//!
//! - **Description** (`description.rs`): YAML intersection layouts.

pub mod bearing;
pub mod compiler;
pub mod description;
pub mod element;
pub mod intersection;
pub mod overlap;

pub use bearing::{is_on_right_of, required_signal, Bearing, LaneShape};
pub use compiler::{GeometryCompiler, GeometryFacts};
pub use description::IntersectionDescription;
pub use element::{Element, ElementKind, EntryPoint, ExitPoint, ExitSlot, Lane};
pub use intersection::Intersection;
pub use overlap::{CorridorOverlap, DeclaredOverlaps, LaneOverlap};
