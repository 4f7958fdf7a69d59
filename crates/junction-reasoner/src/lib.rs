//! # junction-reasoner: Reasoning Engine Adapter
//!
//! Combines event facts, geometry facts and the static traffic rules into one
//! logic program, hands it to an answer-set oracle, and turns whatever comes
//! back into a [`SolveOutcome`] the monitor can act on without further
//! interpretation.
//!
//! ## Architecture
//!
//! - **Program** (`program.rs`): assembly in a fixed section order (events,
//!   geometry, rules) plus a fingerprint of the assembled text.
//!
//! - **Model** (`model.rs`): canonical answer sets and the four-way
//!   [`SolveOutcome`].
//!
//! - **Oracle** (`oracle.rs`): the [`ReasoningOracle`] seam. Solvers are
//!   external collaborators; this crate never assumes which one is plugged in.
//!
//! - **Adapter** (`adapter.rs`): caps model enumeration, contains oracle
//!   panics, canonicalizes models and logs every outcome.
//!
//! - **Stratified** (`stratified/`): an in-process evaluator for stratified
//!   normal programs with integrity constraints. Enough for the shipped rule
//!   base; anything it cannot decide is reported as undetermined.
//!
//! - **Clingo** (`clingo.rs`): runs the `clingo` executable and parses its
//!   JSON output.
//!
//! ## Crate Policy
//!
//! - Solving never returns `Err`. Every failure mode is a [`SolveOutcome`]
//!   variant.
//! - Model order never leaks: the selected model is the first in canonical
//!   order.

pub mod adapter;
pub mod clingo;
pub mod error;
pub mod model;
pub mod oracle;
pub mod program;
pub mod stratified;

pub use adapter::ReasoningAdapter;
pub use clingo::ClingoProcess;
pub use error::OracleError;
pub use model::{Model, SolveOutcome};
pub use oracle::ReasoningOracle;
pub use program::Program;
pub use stratified::{StratifiedOracle, DEFAULT_DERIVATION_BUDGET};
