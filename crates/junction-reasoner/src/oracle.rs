//! # Reasoning Oracle Seam
//!
//! Any answer-set solver (in-process, subprocess or remote) plugs in here.

use crate::model::SolveOutcome;
use crate::program::Program;

/// An answer-set oracle.
///
/// Implementations report every failure as an outcome value. Panics are
/// tolerated: the [`ReasoningAdapter`](crate::ReasoningAdapter) contains
/// them and reports [`SolveOutcome::Failure`].
pub trait ReasoningOracle: Send {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Enumerate at most `max_models` answer sets of `program`.
    fn solve(&mut self, program: &Program, max_models: usize) -> SolveOutcome;
}

impl<T: ReasoningOracle + ?Sized> ReasoningOracle for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, program: &Program, max_models: usize) -> SolveOutcome {
        (**self).solve(program, max_models)
    }
}
