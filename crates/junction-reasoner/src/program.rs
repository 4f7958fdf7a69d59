//! # Program Assembly
//!
//! A solvable program is the concatenation of three sections, always in this
//! order:
//!
//! 1. event facts from the ledger,
//! 2. geometry facts from the compiler,
//! 3. the static traffic rules.
//!
//! Order carries no meaning to a solver, but it keeps the persisted program
//! log readable and byte-stable for identical inputs.

use junction_core::{sha256_fingerprint, Fingerprint};

/// An assembled logic program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    text: String,
    fingerprint: Fingerprint,
}

fn push_section(out: &mut String, section: &str) {
    if section.is_empty() {
        return;
    }
    out.push_str(section);
    if !section.ends_with('\n') {
        out.push('\n');
    }
}

impl Program {
    /// Assemble events, geometry and rules into one program.
    pub fn assemble(events: &str, geometry: &str, rules: &str) -> Self {
        let mut text = String::with_capacity(events.len() + geometry.len() + rules.len() + 3);
        push_section(&mut text, events);
        push_section(&mut text, geometry);
        push_section(&mut text, rules);
        Self::from_text(text)
    }

    /// Wrap already-assembled program text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let fingerprint = sha256_fingerprint(&text);
        Self { text, fingerprint }
    }

    /// Program text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fingerprint of the program text.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}
