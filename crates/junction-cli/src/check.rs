//! # Check-Rules Subcommand
//!
//! Parses a rule program with the in-process parser (which also enforces
//! rule safety) and evaluates it without any facts to confirm the in-process
//! oracle can stratify it. A program that only clingo can handle is reported
//! with a warning, not a failure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use junction_reasoner::stratified::parse_program;
use junction_reasoner::{Program, ReasoningOracle, SolveOutcome, StratifiedOracle};

/// Arguments for the `junction check-rules` subcommand.
#[derive(Args, Debug)]
pub struct CheckRulesArgs {
    /// Rule program to check.
    #[arg(value_name = "FILE")]
    pub rules: PathBuf,
}

/// Execute the check-rules subcommand.
///
/// Returns exit code: 0 when the program parses, 1 when it does not.
pub fn run_check_rules(args: &CheckRulesArgs) -> Result<u8> {
    let text = std::fs::read_to_string(&args.rules)
        .with_context(|| format!("failed to read rules {}", args.rules.display()))?;
    let (code, message) = check_rules(&text);
    println!("{}: {message}", args.rules.display());
    Ok(code)
}

/// Check rule text. Returns the exit code and a one-line verdict.
pub fn check_rules(text: &str) -> (u8, String) {
    let rules = match parse_program(text) {
        Ok(rules) => rules,
        Err(err) => return (1, format!("FAIL: {err}")),
    };
    let mut oracle = StratifiedOracle::new();
    match oracle.solve(&Program::from_text(text), 1) {
        SolveOutcome::Undetermined => (
            0,
            format!(
                "WARN: {} rule(s) parse, but the builtin oracle cannot evaluate them",
                rules.len()
            ),
        ),
        SolveOutcome::Failure(reason) => (1, format!("FAIL: {reason}")),
        _ => (0, format!("OK: {} rule(s)", rules.len())),
    }
}
