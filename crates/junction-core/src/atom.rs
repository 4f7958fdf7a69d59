//! # Fact Atoms
//!
//! One ground predicate instance, e.g. `arrivesAtForkAtTime(v_car7, f_north, 12)`.
//!
//! Atoms are immutable once built. Their derived ordering (predicate name,
//! then arguments) is the canonical order used wherever determinism matters:
//! model canonicalization, dispatch order, and log output.
//!
//! ## Text Format
//!
//! - [`Atom`]'s `Display` renders the bare atom: `p(a, 1)` or `p`.
//! - [`Atom::fact_line`] renders a program fact: `p(a, 1).`

use serde::{Deserialize, Serialize};

/// A ground argument: a symbolic constant or an integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    /// Integer constant (ticks).
    Int(i64),
    /// Symbolic constant (prefixed identifiers, signal names).
    Symbol(String),
}

impl Term {
    /// Build a symbolic term.
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// The symbol name, if this is a symbolic term.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// The integer value, if this is an integer term.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Symbol(_) => None,
        }
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Self::Symbol(value.to_string())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Self::Symbol(value)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Symbol(s) => f.write_str(s),
        }
    }
}

/// A ground predicate instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Atom {
    predicate: String,
    args: Vec<Term>,
}

impl Atom {
    /// Build an atom from a predicate name and arguments.
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
        }
    }

    /// Predicate name.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Arguments in order.
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Whether this atom has the given predicate name and arity.
    pub fn matches(&self, predicate: &str, arity: usize) -> bool {
        self.predicate == predicate && self.args.len() == arity
    }

    /// Render as a program fact terminated by a period.
    pub fn fact_line(&self) -> String {
        format!("{self}.")
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.predicate)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Render a sequence of atoms as program text, one fact per line.
pub fn render_facts<'a>(atoms: impl IntoIterator<Item = &'a Atom>) -> String {
    let mut out = String::new();
    for atom in atoms {
        out.push_str(&atom.fact_line());
        out.push('\n');
    }
    out
}
