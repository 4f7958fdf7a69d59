//! # Clingo Subprocess Oracle
//!
//! Runs `clingo --outf=2 <max_models>` with the program on stdin and reads
//! the JSON report it prints:
//!
//! ```json
//! {
//!   "Call": [{ "Witnesses": [{ "Value": ["hasRightOfWay(v_1)"] }] }],
//!   "Result": "SATISFIABLE"
//! }
//! ```
//!
//! Clingo signals its result through non-zero exit codes (10, 20, 30), so
//! the exit status is ignored and only the JSON `Result` is trusted.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::OracleError;
use crate::model::{Model, SolveOutcome};
use crate::oracle::ReasoningOracle;
use crate::program::Program;
use crate::stratified::parse_ground_atom;

#[derive(Debug, Deserialize)]
struct ClingoReport {
    #[serde(rename = "Result")]
    result: String,
    #[serde(rename = "Call", default)]
    calls: Vec<ClingoCall>,
}

#[derive(Debug, Deserialize)]
struct ClingoCall {
    #[serde(rename = "Witnesses", default)]
    witnesses: Vec<ClingoWitness>,
}

#[derive(Debug, Deserialize)]
struct ClingoWitness {
    #[serde(rename = "Value", default)]
    value: Vec<String>,
}

/// Parse clingo's `--outf=2` JSON report into an outcome.
pub fn parse_report(json: &str) -> Result<SolveOutcome, OracleError> {
    let report: ClingoReport = serde_json::from_str(json)?;
    match report.result.as_str() {
        "SATISFIABLE" | "OPTIMUM FOUND" => {
            let mut models = Vec::new();
            for witness in report.calls.iter().flat_map(|c| &c.witnesses) {
                let atoms = witness
                    .value
                    .iter()
                    .map(|text| parse_ground_atom(text))
                    .collect::<Result<Vec<_>, _>>()?;
                models.push(Model::new(atoms));
            }
            Ok(SolveOutcome::Models(models))
        }
        "UNSATISFIABLE" => Ok(SolveOutcome::Unsatisfiable),
        "UNKNOWN" => Ok(SolveOutcome::Undetermined),
        other => Err(OracleError::UnknownResult(other.to_string())),
    }
}

/// Oracle backed by the `clingo` executable.
#[derive(Debug, Clone)]
pub struct ClingoProcess {
    executable: PathBuf,
    extra_args: Vec<String>,
}

impl Default for ClingoProcess {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("clingo"),
            extra_args: Vec::new(),
        }
    }
}

impl ClingoProcess {
    /// Use `clingo` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Append extra command-line arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run(&self, program: &Program, max_models: usize) -> Result<SolveOutcome, OracleError> {
        let spawn_err = |source| OracleError::Spawn {
            program: self.executable.display().to_string(),
            source,
        };
        let mut child = Command::new(&self.executable)
            .arg("--outf=2")
            .arg(max_models.to_string())
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(program.text().as_bytes())
                .map_err(spawn_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OracleError::EmptyOutput(stderr.trim().to_string()));
        }
        tracing::trace!(status = ?output.status.code(), "clingo finished");
        parse_report(&stdout)
    }
}

impl ReasoningOracle for ClingoProcess {
    fn name(&self) -> &str {
        "clingo"
    }

    fn solve(&mut self, program: &Program, max_models: usize) -> SolveOutcome {
        self.run(program, max_models)
            .unwrap_or_else(|err| SolveOutcome::Failure(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::{Atom, Term};

    #[test]
    fn parses_satisfiable_report() {
        let json = r#"{
            "Solver": "clingo version 5.6.2",
            "Input": ["stdin"],
            "Call": [{ "Witnesses": [
                { "Value": ["hasRightOfWay(v_1)", "mustStopToYield(v_2)"] },
                { "Value": ["hasRightOfWay(v_2)", "mustStopToYield(v_1)"] }
            ] }],
            "Result": "SATISFIABLE",
            "Models": { "Number": 2, "More": "no" }
        }"#;
        let outcome = parse_report(json).unwrap().canonicalize(20);
        assert_eq!(outcome.models().len(), 2);
        let selected = outcome.selected().unwrap();
        assert!(selected.contains(&Atom::new("hasRightOfWay", vec![Term::sym("v_1")])));
    }

    #[test]
    fn parses_unsatisfiable_and_unknown() {
        let unsat = r#"{ "Call": [{}], "Result": "UNSATISFIABLE" }"#;
        assert_eq!(parse_report(unsat).unwrap(), SolveOutcome::Unsatisfiable);
        let unknown = r#"{ "Result": "UNKNOWN" }"#;
        assert_eq!(parse_report(unknown).unwrap(), SolveOutcome::Undetermined);
    }

    #[test]
    fn optimum_found_counts_as_models() {
        let json = r#"{ "Call": [{ "Witnesses": [{ "Value": ["p(1)"] }] }], "Result": "OPTIMUM FOUND" }"#;
        let outcome = parse_report(json).unwrap();
        assert_eq!(outcome.models().len(), 1);
    }

    #[test]
    fn rejects_unknown_result_and_bad_json() {
        assert!(matches!(
            parse_report(r#"{ "Result": "INTERRUPTED" }"#),
            Err(OracleError::UnknownResult(_))
        ));
        assert!(matches!(parse_report("not json"), Err(OracleError::Output(_))));
    }

    #[test]
    fn rejects_unparsable_atom() {
        let json = r#"{ "Call": [{ "Witnesses": [{ "Value": ["p(f(a))"] }] }], "Result": "SATISFIABLE" }"#;
        assert!(matches!(parse_report(json), Err(OracleError::Parse { .. })));
    }

    #[test]
    fn missing_executable_is_failure() {
        let mut oracle = ClingoProcess::new().with_executable("/nonexistent/clingo-binary");
        match oracle.solve(&Program::from_text("p."), 1) {
            SolveOutcome::Failure(reason) => assert!(reason.contains("failed to run")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
