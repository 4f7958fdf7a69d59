//! # In-Process Stratified Oracle
//!
//! Evaluates normal logic programs whose negation is stratified. Such a
//! program has exactly one answer set, computed bottom-up stratum by
//! stratum; the traffic rule base is written in this fragment.
//!
//! ## Supported Language
//!
//! - Facts, rules and integrity constraints (`:- body.`).
//! - Default negation (`not p(X)`), with anonymous `_` allowed inside it.
//! - Comparisons `= != < <= > >=` between bound terms. Integers order before
//!   symbols; symbols order lexicographically.
//! - `%` comments; `#show` and `#program` directives are ignored.
//!
//! ## Outcomes
//!
//! | Condition | Outcome |
//! |---|---|
//! | Evaluation completes | `Models` with one model |
//! | Integrity constraint violated | `Unsatisfiable` |
//! | Negation through recursion | `Undetermined` |
//! | Derivation budget exceeded | `Undetermined` |
//! | Parse error or unsafe rule | `Failure` |

mod eval;
pub mod parser;
pub mod syntax;

pub use parser::{parse_ground_atom, parse_program};

use crate::model::{Model, SolveOutcome};
use crate::oracle::ReasoningOracle;
use crate::program::Program;

use eval::Evaluation;

/// Default cap on atoms derived by one evaluation.
pub const DEFAULT_DERIVATION_BUDGET: usize = 100_000;

/// In-process oracle for stratified programs.
#[derive(Debug, Clone)]
pub struct StratifiedOracle {
    budget: usize,
}

impl Default for StratifiedOracle {
    fn default() -> Self {
        Self {
            budget: DEFAULT_DERIVATION_BUDGET,
        }
    }
}

impl StratifiedOracle {
    /// An oracle with the default derivation budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derivation budget.
    pub fn with_budget(budget: usize) -> Self {
        Self { budget }
    }

    /// The derivation budget.
    pub fn budget(&self) -> usize {
        self.budget
    }
}

impl ReasoningOracle for StratifiedOracle {
    fn name(&self) -> &str {
        "stratified"
    }

    fn solve(&mut self, program: &Program, _max_models: usize) -> SolveOutcome {
        let rules = match parse_program(program.text()) {
            Ok(rules) => rules,
            Err(err) => return SolveOutcome::Failure(err.to_string()),
        };
        match eval::evaluate(&rules, self.budget) {
            Evaluation::Model(atoms) => SolveOutcome::Models(vec![Model::new(atoms)]),
            Evaluation::ConstraintViolated { line } => {
                tracing::debug!(line, "integrity constraint violated");
                SolveOutcome::Unsatisfiable
            }
            Evaluation::NotStratifiable { predicate } => {
                tracing::debug!(predicate = %predicate, "negation through recursion");
                SolveOutcome::Undetermined
            }
            Evaluation::BudgetExceeded { budget } => {
                tracing::debug!(budget, "derivation budget exceeded");
                SolveOutcome::Undetermined
            }
        }
    }
}
