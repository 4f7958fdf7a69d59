//! # Reasoning Engine Adapter
//!
//! Wraps one [`ReasoningOracle`] with the policies every solve must obey:
//!
//! - **Fixed cap.** The oracle is always asked for the configured number of
//!   models. The adapter never varies it.
//! - **Containment.** A panicking oracle yields
//!   [`SolveOutcome::Failure`]; the monitor keeps running.
//! - **Canonical selection.** Models are canonicalized before they leave the
//!   adapter (see [`SolveOutcome::canonicalize`]).
//! - **Logging.** Unsatisfiable and undetermined outcomes are warnings,
//!   failures are errors, and every model is logged at debug level.

use std::panic::{self, AssertUnwindSafe};

use junction_core::ValidationError;

use crate::model::SolveOutcome;
use crate::oracle::ReasoningOracle;
use crate::program::Program;

/// Policy wrapper around an answer-set oracle.
pub struct ReasoningAdapter {
    oracle: Box<dyn ReasoningOracle>,
    max_models: usize,
    solves: u64,
}

impl ReasoningAdapter {
    /// Wrap `oracle`, requesting at most `max_models` models per solve.
    pub fn new(oracle: Box<dyn ReasoningOracle>, max_models: usize) -> Result<Self, ValidationError> {
        if max_models == 0 {
            return Err(ValidationError::InvalidModelCap);
        }
        Ok(Self {
            oracle,
            max_models,
            solves: 0,
        })
    }

    /// The model cap passed to the oracle.
    pub fn max_models(&self) -> usize {
        self.max_models
    }

    /// Name of the wrapped oracle.
    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Number of solves performed so far.
    pub fn solves(&self) -> u64 {
        self.solves
    }

    /// Solve `program` and return its canonical outcome.
    pub fn solve(&mut self, program: &Program) -> SolveOutcome {
        self.solves += 1;
        let max_models = self.max_models;
        let oracle = &mut self.oracle;
        let raw = panic::catch_unwind(AssertUnwindSafe(|| oracle.solve(program, max_models)))
            .unwrap_or_else(|payload| SolveOutcome::Failure(panic_reason(payload.as_ref())));
        let outcome = raw.canonicalize(max_models);

        let fingerprint = program.fingerprint().short();
        match &outcome {
            SolveOutcome::Models(models) => {
                tracing::debug!(
                    solve = self.solves,
                    oracle = self.oracle.name(),
                    program = %fingerprint,
                    models = models.len(),
                    "program satisfiable"
                );
                for (index, model) in models.iter().enumerate() {
                    tracing::debug!(solve = self.solves, index, atoms = %model, "model");
                }
            }
            SolveOutcome::Unsatisfiable => {
                tracing::warn!(
                    solve = self.solves,
                    oracle = self.oracle.name(),
                    program = %fingerprint,
                    "program unsatisfiable; actuation unchanged"
                );
            }
            SolveOutcome::Undetermined => {
                tracing::warn!(
                    solve = self.solves,
                    oracle = self.oracle.name(),
                    program = %fingerprint,
                    "program undetermined; actuation unchanged"
                );
            }
            SolveOutcome::Failure(reason) => {
                tracing::error!(
                    solve = self.solves,
                    oracle = self.oracle.name(),
                    program = %fingerprint,
                    reason = %reason,
                    "oracle failure; actuation unchanged"
                );
            }
        }
        outcome
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("oracle panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("oracle panicked: {s}")
    } else {
        "oracle panicked".to_string()
    }
}

impl std::fmt::Debug for ReasoningAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningAdapter")
            .field("oracle", &self.oracle.name())
            .field("max_models", &self.max_models)
            .field("solves", &self.solves)
            .finish()
    }
}
