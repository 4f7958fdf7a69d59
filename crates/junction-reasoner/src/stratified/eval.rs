//! Stratification and bottom-up fixpoint evaluation.

use std::collections::{BTreeMap, BTreeSet};

use junction_core::{Atom, Term};

use crate::stratified::syntax::{Arg, Literal, Pattern, Rule};

type Key = (String, usize);
type Bindings = BTreeMap<String, Term>;

/// How evaluation of one program ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Evaluation {
    /// The unique answer set.
    Model(Vec<Atom>),
    /// An integrity constraint has a satisfied body.
    ConstraintViolated { line: usize },
    /// Negation through recursion involving this predicate.
    NotStratifiable { predicate: String },
    /// More atoms were derived than the budget allows.
    BudgetExceeded { budget: usize },
}

#[derive(Default)]
struct Database {
    relations: BTreeMap<Key, BTreeSet<Vec<Term>>>,
    size: usize,
}

impl Database {
    fn tuples(&self, key: &Key) -> impl Iterator<Item = &Vec<Term>> {
        self.relations.get(key).into_iter().flat_map(|r| r.iter())
    }

    fn contains(&self, key: &Key, tuple: &[Term]) -> bool {
        self.relations.get(key).is_some_and(|r| r.contains(tuple))
    }

    fn insert(&mut self, key: Key, tuple: Vec<Term>) -> bool {
        let fresh = self.relations.entry(key).or_default().insert(tuple);
        if fresh {
            self.size += 1;
        }
        fresh
    }

    fn into_atoms(self) -> Vec<Atom> {
        self.relations
            .into_iter()
            .flat_map(|((predicate, _), tuples)| {
                tuples
                    .into_iter()
                    .map(move |args| Atom::new(predicate.clone(), args))
            })
            .collect()
    }
}

/// Assign every head predicate a stratum so that negative dependencies
/// point strictly downward.
fn stratify(rules: &[Rule]) -> Result<BTreeMap<Key, usize>, String> {
    let mut stratum: BTreeMap<Key, usize> = BTreeMap::new();
    for rule in rules {
        if let Some(head) = &rule.head {
            stratum.insert(head.key(), 0);
        }
        for literal in &rule.body {
            if let Literal::Pos(p) | Literal::Neg(p) = literal {
                stratum.entry(p.key()).or_insert(0);
            }
        }
    }
    let limit = stratum.len();

    let mut changed = true;
    while changed {
        changed = false;
        for rule in rules {
            let Some(head) = &rule.head else { continue };
            let key = head.key();
            let mut level = stratum.get(&key).copied().unwrap_or(0);
            for literal in &rule.body {
                let needed = match literal {
                    Literal::Pos(p) => stratum.get(&p.key()).copied().unwrap_or(0),
                    Literal::Neg(p) => stratum.get(&p.key()).copied().unwrap_or(0) + 1,
                    Literal::Cmp(..) => 0,
                };
                level = level.max(needed);
            }
            if level > limit {
                return Err(head.predicate.clone());
            }
            if stratum.get(&key) != Some(&level) {
                stratum.insert(key, level);
                changed = true;
            }
        }
    }
    Ok(stratum)
}

fn resolve(arg: &Arg, bindings: &Bindings) -> Option<Term> {
    match arg {
        Arg::Const(term) => Some(term.clone()),
        Arg::Var(name) => bindings.get(name).cloned(),
    }
}

fn unify(pattern: &Pattern, tuple: &[Term], bindings: &Bindings) -> Option<Bindings> {
    let mut out = bindings.clone();
    for (arg, term) in pattern.args.iter().zip(tuple) {
        match arg {
            Arg::Const(c) if c != term => return None,
            Arg::Const(_) => {}
            Arg::Var(name) => match out.get(name) {
                Some(bound) if bound != term => return None,
                Some(_) => {}
                None => {
                    out.insert(name.clone(), term.clone());
                }
            },
        }
    }
    Some(out)
}

/// Positive literals first, in source order, then the filters.
fn ordered_body(rule: &Rule) -> Vec<&Literal> {
    let (mut positive, filters): (Vec<&Literal>, Vec<&Literal>) = rule
        .body
        .iter()
        .partition(|l| matches!(l, Literal::Pos(_)));
    positive.extend(filters);
    positive
}

fn solve_body(body: &[&Literal], db: &Database, bindings: &Bindings, out: &mut Vec<Bindings>) {
    let Some((first, rest)) = body.split_first() else {
        out.push(bindings.clone());
        return;
    };
    match first {
        Literal::Pos(pattern) => {
            for tuple in db.tuples(&pattern.key()) {
                if let Some(extended) = unify(pattern, tuple, bindings) {
                    solve_body(rest, db, &extended, out);
                }
            }
        }
        Literal::Neg(pattern) => {
            let blocked = db
                .tuples(&pattern.key())
                .any(|tuple| unify(pattern, tuple, bindings).is_some());
            if !blocked {
                solve_body(rest, db, bindings, out);
            }
        }
        Literal::Cmp(lhs, op, rhs) => {
            if let (Some(l), Some(r)) = (resolve(lhs, bindings), resolve(rhs, bindings)) {
                if op.holds(&l, &r) {
                    solve_body(rest, db, bindings, out);
                }
            }
        }
    }
}

fn ground(head: &Pattern, bindings: &Bindings) -> Option<Vec<Term>> {
    head.args.iter().map(|arg| resolve(arg, bindings)).collect()
}

/// Evaluate `rules` stratum by stratum, then check integrity constraints.
pub(crate) fn evaluate(rules: &[Rule], budget: usize) -> Evaluation {
    let strata = match stratify(rules) {
        Ok(strata) => strata,
        Err(predicate) => return Evaluation::NotStratifiable { predicate },
    };

    let mut by_stratum: BTreeMap<usize, Vec<&Rule>> = BTreeMap::new();
    let mut constraints = Vec::new();
    for rule in rules {
        match &rule.head {
            Some(head) => by_stratum
                .entry(strata.get(&head.key()).copied().unwrap_or(0))
                .or_default()
                .push(rule),
            None => constraints.push(rule),
        }
    }

    let mut db = Database::default();
    for (level, stratum_rules) in &by_stratum {
        let bodies: Vec<Vec<&Literal>> = stratum_rules.iter().map(|r| ordered_body(r)).collect();
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let mut fresh: Vec<(Key, Vec<Term>)> = Vec::new();
            for (rule, body) in stratum_rules.iter().zip(&bodies) {
                let Some(head) = &rule.head else { continue };
                let key = head.key();
                let mut solutions = Vec::new();
                solve_body(body, &db, &Bindings::new(), &mut solutions);
                for bindings in &solutions {
                    if let Some(tuple) = ground(head, bindings) {
                        if !db.contains(&key, &tuple) {
                            fresh.push((key.clone(), tuple));
                        }
                    }
                }
            }
            if fresh.is_empty() {
                break;
            }
            for (key, tuple) in fresh {
                db.insert(key, tuple);
                if db.size > budget {
                    return Evaluation::BudgetExceeded { budget };
                }
            }
        }
        tracing::trace!(stratum = level, rounds, atoms = db.size, "stratum saturated");
    }

    for constraint in constraints {
        let body = ordered_body(constraint);
        let mut solutions = Vec::new();
        solve_body(&body, &db, &Bindings::new(), &mut solutions);
        if !solutions.is_empty() {
            return Evaluation::ConstraintViolated {
                line: constraint.line,
            };
        }
    }

    Evaluation::Model(db.into_atoms())
}
