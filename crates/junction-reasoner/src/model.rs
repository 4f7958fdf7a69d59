//! # Models and Solve Outcomes
//!
//! A [`Model`] is one answer set: a canonically ordered, duplicate-free set
//! of ground atoms. A [`SolveOutcome`] is everything a solve can end in.
//!
//! ## Canonical Order
//!
//! Models compare by their sorted atom lists. [`SolveOutcome::canonicalize`]
//! sorts and deduplicates the model list, so [`SolveOutcome::selected`]
//! returns the same model for the same program no matter what order the
//! oracle enumerated answer sets in.

use junction_core::Atom;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// One answer set.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Model {
    atoms: Vec<Atom>,
}

impl Model {
    /// Build a model; atoms are sorted and deduplicated.
    pub fn new(atoms: impl IntoIterator<Item = Atom>) -> Self {
        let mut atoms: Vec<Atom> = atoms.into_iter().collect();
        atoms.sort();
        atoms.dedup();
        Self { atoms }
    }

    /// Atoms in canonical order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the model is empty.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Whether `atom` is true in this model.
    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.binary_search(atom).is_ok()
    }

    /// Atoms with the given predicate name and arity, in canonical order.
    pub fn with_predicate<'a>(
        &'a self,
        predicate: &'a str,
        arity: usize,
    ) -> impl Iterator<Item = &'a Atom> + 'a {
        self.atoms.iter().filter(move |a| a.matches(predicate, arity))
    }
}

impl FromIterator<Atom> for Model {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SolveOutcome
// ---------------------------------------------------------------------------

/// The result of one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// At least one answer set was found.
    Models(Vec<Model>),
    /// The program has no answer set.
    Unsatisfiable,
    /// The oracle could not decide within its limits.
    Undetermined,
    /// The oracle failed internally.
    Failure(String),
}

impl SolveOutcome {
    /// Sort, deduplicate and cap the model list. An empty model list is not
    /// a decision and becomes [`SolveOutcome::Undetermined`].
    pub fn canonicalize(self, max_models: usize) -> Self {
        match self {
            Self::Models(mut models) => {
                models.sort();
                models.dedup();
                models.truncate(max_models);
                if models.is_empty() {
                    Self::Undetermined
                } else {
                    Self::Models(models)
                }
            }
            other => other,
        }
    }

    /// The model actuation is derived from: the first in canonical order.
    pub fn selected(&self) -> Option<&Model> {
        match self {
            Self::Models(models) => models.first(),
            _ => None,
        }
    }

    /// All models (empty unless satisfiable).
    pub fn models(&self) -> &[Model] {
        match self {
            Self::Models(models) => models,
            _ => &[],
        }
    }

    /// Whether this outcome may change actuation.
    pub fn is_actionable(&self) -> bool {
        self.selected().is_some()
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Models(_) => "satisfiable",
            Self::Unsatisfiable => "unsatisfiable",
            Self::Undetermined => "undetermined",
            Self::Failure(_) => "failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::Term;
    use proptest::prelude::*;

    fn atom(p: &str, v: &str) -> Atom {
        Atom::new(p, vec![Term::sym(v)])
    }

    #[test]
    fn model_is_sorted_and_deduplicated() {
        let model = Model::new(vec![atom("b", "x"), atom("a", "y"), atom("b", "x")]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.to_string(), "a(y) b(x)");
        assert!(model.contains(&atom("b", "x")));
        assert!(!model.contains(&atom("b", "y")));
    }

    #[test]
    fn with_predicate_filters_by_arity() {
        let model = Model::new(vec![
            atom("hasRightOfWay", "v_1"),
            atom("mustStopToYield", "v_2"),
            Atom::new("hasRightOfWay", vec![Term::sym("v_3"), Term::from(1)]),
        ]);
        let go: Vec<_> = model.with_predicate("hasRightOfWay", 1).collect();
        assert_eq!(go, vec![&atom("hasRightOfWay", "v_1")]);
    }

    #[test]
    fn canonicalize_sorts_dedups_and_caps() {
        let m1 = Model::new(vec![atom("a", "1")]);
        let m2 = Model::new(vec![atom("a", "2")]);
        let m3 = Model::new(vec![atom("a", "3")]);
        let outcome = SolveOutcome::Models(vec![m3.clone(), m1.clone(), m2.clone(), m1.clone()])
            .canonicalize(2);
        assert_eq!(outcome, SolveOutcome::Models(vec![m1.clone(), m2]));
        assert_eq!(outcome.selected(), Some(&m1));
    }

    #[test]
    fn empty_model_list_is_undetermined() {
        assert_eq!(
            SolveOutcome::Models(vec![]).canonicalize(5),
            SolveOutcome::Undetermined
        );
    }

    #[test]
    fn non_model_outcomes_pass_through() {
        for outcome in [
            SolveOutcome::Unsatisfiable,
            SolveOutcome::Undetermined,
            SolveOutcome::Failure("boom".to_string()),
        ] {
            let canonical = outcome.clone().canonicalize(3);
            assert_eq!(canonical, outcome);
            assert!(canonical.selected().is_none());
            assert!(!canonical.is_actionable());
            assert!(canonical.models().is_empty());
        }
    }

    proptest! {
        /// Permuting the oracle's model order never changes the selection.
        #[test]
        fn selection_ignores_enumeration_order(
            names in proptest::collection::vec("[a-d]{1,2}", 1..6),
            rotate in 0usize..6,
        ) {
            let models: Vec<Model> = names
                .iter()
                .map(|n| Model::new(vec![atom("p", n)]))
                .collect();
            let mut permuted = models.clone();
            let k = rotate % permuted.len();
            permuted.rotate_left(k);
            permuted.reverse();

            let a = SolveOutcome::Models(models).canonicalize(20);
            let b = SolveOutcome::Models(permuted).canonicalize(20);
            prop_assert_eq!(a.selected(), b.selected());
            prop_assert_eq!(a, b);
        }
    }
}
