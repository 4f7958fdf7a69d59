//! Abstract syntax of normal logic programs.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use junction_core::Term;

/// A rule argument: a variable or a ground constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A named variable. Names starting with `_` are anonymous.
    Var(String),
    /// A ground term.
    Const(Term),
}

impl Arg {
    pub(crate) fn is_anonymous(&self) -> bool {
        matches!(self, Self::Var(name) if name.starts_with('_'))
    }
}

/// A possibly non-ground atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Predicate name.
    pub predicate: String,
    /// Arguments in order.
    pub args: Vec<Arg>,
}

impl Pattern {
    /// Relation key: predicate name and arity.
    pub fn key(&self) -> (String, usize) {
        (self.predicate.clone(), self.args.len())
    }

    fn named_vars(&self, out: &mut BTreeSet<String>) {
        for arg in &self.args {
            if let Arg::Var(name) = arg {
                if !name.starts_with('_') {
                    out.insert(name.clone());
                }
            }
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// Apply the operator under the solver's total term order: integers,
    /// then constants, then quoted strings.
    pub fn holds(&self, lhs: &Term, rhs: &Term) -> bool {
        let order = solver_order(lhs, rhs);
        match self {
            Self::Eq => order == Ordering::Equal,
            Self::Ne => order != Ordering::Equal,
            Self::Lt => order == Ordering::Less,
            Self::Le => order != Ordering::Greater,
            Self::Gt => order == Ordering::Greater,
            Self::Ge => order != Ordering::Less,
        }
    }
}

/// Quoted strings are stored as symbols with their quotes, which would sort
/// them before lowercase constants. Rank them last and compare their contents.
fn solver_order(lhs: &Term, rhs: &Term) -> Ordering {
    fn key(term: &Term) -> (u8, Option<i64>, &str) {
        match term {
            Term::Int(value) => (0, Some(*value), ""),
            Term::Symbol(name) => match name
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
            {
                Some(contents) => (2, None, contents),
                None => (1, None, name.as_str()),
            },
        }
    }
    key(lhs).cmp(&key(rhs))
}

/// One body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A positive atom.
    Pos(Pattern),
    /// Default negation: `not p(...)`.
    Neg(Pattern),
    /// A builtin comparison.
    Cmp(Arg, CmpOp, Arg),
}

/// A rule, fact (empty body) or integrity constraint (no head).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Head atom, absent for integrity constraints.
    pub head: Option<Pattern>,
    /// Body literals in source order.
    pub body: Vec<Literal>,
    /// 1-based source line of the rule.
    pub line: usize,
}

impl Rule {
    /// Named variables bound by positive body literals.
    pub fn bound_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for literal in &self.body {
            if let Literal::Pos(pattern) = literal {
                pattern.named_vars(&mut out);
            }
        }
        out
    }

    /// The first named variable not bound by a positive body literal, if any.
    pub fn unsafe_var(&self) -> Option<String> {
        let bound = self.bound_vars();
        let mut needed = BTreeSet::new();
        if let Some(head) = &self.head {
            head.named_vars(&mut needed);
            // Anonymous variables in the head are never bound.
            if let Some(Arg::Var(name)) = head.args.iter().find(|a| a.is_anonymous()) {
                return Some(name.clone());
            }
        }
        for literal in &self.body {
            match literal {
                Literal::Pos(_) => {}
                Literal::Neg(pattern) => pattern.named_vars(&mut needed),
                Literal::Cmp(lhs, _, rhs) => {
                    for arg in [lhs, rhs] {
                        if let Arg::Var(name) = arg {
                            needed.insert(name.clone());
                        }
                    }
                }
            }
        }
        needed.into_iter().find(|v| !bound.contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Arg {
        Arg::Var(name.to_string())
    }

    fn pat(p: &str, args: Vec<Arg>) -> Pattern {
        Pattern {
            predicate: p.to_string(),
            args,
        }
    }

    #[test]
    fn safe_rule_has_no_unsafe_var() {
        let rule = Rule {
            head: Some(pat("h", vec![var("X")])),
            body: vec![
                Literal::Pos(pat("b", vec![var("X"), var("Y")])),
                Literal::Neg(pat("c", vec![var("Y"), var("_")])),
                Literal::Cmp(var("X"), CmpOp::Ne, var("Y")),
            ],
            line: 1,
        };
        assert_eq!(rule.unsafe_var(), None);
    }

    #[test]
    fn head_var_must_be_bound_positively() {
        let rule = Rule {
            head: Some(pat("h", vec![var("Z")])),
            body: vec![Literal::Neg(pat("b", vec![var("Z")]))],
            line: 3,
        };
        assert_eq!(rule.unsafe_var(), Some("Z".to_string()));
    }

    #[test]
    fn comparison_vars_must_be_bound() {
        let rule = Rule {
            head: None,
            body: vec![
                Literal::Pos(pat("b", vec![var("X")])),
                Literal::Cmp(var("X"), CmpOp::Lt, var("Y")),
            ],
            line: 2,
        };
        assert_eq!(rule.unsafe_var(), Some("Y".to_string()));
    }

    #[test]
    fn symbols_sort_after_integers() {
        assert!(CmpOp::Lt.holds(&Term::from(99), &Term::sym("a")));
        assert!(CmpOp::Ge.holds(&Term::sym("b"), &Term::sym("a")));
        assert!(CmpOp::Eq.holds(&Term::from(2), &Term::from(2)));
    }

    #[test]
    fn strings_sort_after_constants() {
        let text = Term::sym("\"zebra\"");
        assert!(CmpOp::Gt.holds(&text, &Term::sym("a")));
        assert!(CmpOp::Lt.holds(&Term::sym("zz"), &text));
        assert!(CmpOp::Gt.holds(&text, &Term::from(i64::MAX)));
        assert!(CmpOp::Ne.holds(&text, &Term::sym("zebra")));
        assert!(CmpOp::Eq.holds(&text, &Term::sym("\"zebra\"")));
    }

    #[test]
    fn strings_compare_by_contents() {
        // A raw comparison would put `"a!"` first because '!' < '"'.
        assert!(CmpOp::Lt.holds(&Term::sym("\"a\""), &Term::sym("\"a!\"")));
        assert!(CmpOp::Le.holds(&Term::sym("\"ab\""), &Term::sym("\"b\"")));
    }
}
