//! # Geometry Compiler
//!
//! Turns the static topology of one [`Intersection`] into logic facts:
//!
//! ```text
//! isOnRightOf(f_R, f_L).          for every related fork pair
//! laneFromTo(l_L, f_F, e_E).      for every active lane
//! laneCorrectSignal(l_L, S).      for every active lane
//! overlaps(l_A, l_B).             every lane with itself, and both
//!                                 orientations of each intersecting pair
//! ```
//!
//! ## Determinism
//!
//! Forks and lanes are visited in identifier order and pairs as `i < j`, so
//! the same topology always compiles to byte-identical text.
//!
//! ## Compile Once
//!
//! [`GeometryCompiler`] caches the result against the intersection's
//! revision counter. Facts are recompiled only when topology changed.

use junction_core::atom::render_facts;
use junction_core::{sha256_fingerprint, Atom, Fingerprint, Term};

use crate::bearing::is_on_right_of;
use crate::element::{EntryPoint, Lane};
use crate::intersection::Intersection;
use crate::overlap::LaneOverlap;

/// The compiled, immutable geometry fact set of one intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryFacts {
    atoms: Vec<Atom>,
    text: String,
    fingerprint: Fingerprint,
}

impl GeometryFacts {
    /// Compile the facts for `intersection`.
    ///
    /// Infallible: degenerate geometry is rejected at registration, and an
    /// empty intersection yields an empty fact set.
    pub fn compile(intersection: &Intersection, overlap: &dyn LaneOverlap) -> Self {
        let forks: Vec<&EntryPoint> = intersection.forks().collect();
        let lanes: Vec<&Lane> = intersection.lanes().collect();
        let mut atoms = Vec::new();

        for (i, a) in forks.iter().enumerate() {
            for b in &forks[i + 1..] {
                let (right, left) = if is_on_right_of(&a.forward(), &b.forward()) {
                    (a, b)
                } else if is_on_right_of(&b.forward(), &a.forward()) {
                    (b, a)
                } else {
                    continue;
                };
                atoms.push(Atom::new(
                    "isOnRightOf",
                    vec![
                        Term::sym(right.id().constant()),
                        Term::sym(left.id().constant()),
                    ],
                ));
            }
        }

        for lane in &lanes {
            atoms.push(Atom::new(
                "laneFromTo",
                vec![
                    Term::sym(lane.id().constant()),
                    Term::sym(lane.fork().constant()),
                    Term::sym(lane.exit().constant()),
                ],
            ));
            atoms.push(Atom::new(
                "laneCorrectSignal",
                vec![
                    Term::sym(lane.id().constant()),
                    Term::sym(lane.required_signal().as_str()),
                ],
            ));
        }

        for (i, a) in lanes.iter().enumerate() {
            atoms.push(overlaps_atom(a, a));
            for b in &lanes[i + 1..] {
                if overlap.overlaps(a, b) {
                    atoms.push(overlaps_atom(a, b));
                    atoms.push(overlaps_atom(b, a));
                }
            }
        }

        let text = render_facts(&atoms);
        let fingerprint = sha256_fingerprint(&text);
        tracing::debug!(
            facts = atoms.len(),
            forks = forks.len(),
            lanes = lanes.len(),
            fingerprint = %fingerprint.short(),
            "compiled geometry facts"
        );
        Self {
            atoms,
            text,
            fingerprint,
        }
    }

    /// Compiled atoms in emission order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Rendered program text, one fact per line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fingerprint of [`GeometryFacts::text`].
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether no facts were produced.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

fn overlaps_atom(a: &Lane, b: &Lane) -> Atom {
    Atom::new(
        "overlaps",
        vec![Term::sym(a.id().constant()), Term::sym(b.id().constant())],
    )
}

/// Caching front-end for [`GeometryFacts::compile`].
#[derive(Debug, Default)]
pub struct GeometryCompiler {
    cached: Option<(u64, GeometryFacts)>,
}

impl GeometryCompiler {
    /// A compiler with nothing cached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return facts for `intersection`, compiling only if its revision
    /// differs from the cached one. The flag reports whether a compile ran.
    pub fn compile(
        &mut self,
        intersection: &Intersection,
        overlap: &dyn LaneOverlap,
    ) -> (&GeometryFacts, bool) {
        let revision = intersection.revision();
        if !matches!(&self.cached, Some((cached, _)) if *cached == revision) {
            self.cached = None;
        }
        let stale = self.cached.is_none();
        let (_, facts) = self
            .cached
            .get_or_insert_with(|| (revision, GeometryFacts::compile(intersection, overlap)));
        (facts, stale)
    }

    /// The cached facts, if any.
    pub fn cached(&self) -> Option<&GeometryFacts> {
        self.cached.as_ref().map(|(_, facts)| facts)
    }
}
