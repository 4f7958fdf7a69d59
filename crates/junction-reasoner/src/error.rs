//! # Oracle Errors
//!
//! Internal failure reasons of the shipped oracles. They never cross the
//! oracle seam as `Err`: each oracle renders them into
//! [`SolveOutcome::Failure`](crate::SolveOutcome::Failure).

use thiserror::Error;

/// Reasons an oracle could not produce an answer.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The program text could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A rule uses a variable that no positive body literal binds.
    #[error("unsafe variable {variable} in rule at line {line}")]
    UnsafeRule {
        /// 1-based line number of the rule.
        line: usize,
        /// The offending variable.
        variable: String,
    },

    /// The solver process could not be started or fed.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Executable that was attempted.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The solver produced no usable output.
    #[error("solver produced no output (stderr: {0})")]
    EmptyOutput(String),

    /// The solver output was not the expected JSON document.
    #[error("malformed solver output: {0}")]
    Output(#[from] serde_json::Error),

    /// The solver reported a result this adapter does not recognize.
    #[error("unrecognized solver result {0:?}")]
    UnknownResult(String),
}
