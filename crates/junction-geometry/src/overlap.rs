//! # Lane Overlap Probes
//!
//! Whether two lanes' swept regions intersect is decided by the host's
//! spatial machinery, not by this crate. [`LaneOverlap`] is the injected
//! capability; two implementations ship for hosts without one:
//!
//! - [`DeclaredOverlaps`]: an explicit, symmetric list of overlapping pairs.
//! - [`CorridorOverlap`]: each lane approximated as a straight corridor of
//!   fixed half-width between its fork and exit locations.

use std::collections::BTreeSet;

use junction_core::{LaneId, Vec3};

use crate::element::Lane;

/// Capability answering "do these two lanes' swept regions intersect?".
///
/// Implementations must be symmetric. The compiler only asks about
/// distinct lanes; every lane overlaps itself by definition.
pub trait LaneOverlap {
    /// Whether lanes `a` and `b` intersect.
    fn overlaps(&self, a: &Lane, b: &Lane) -> bool;
}

/// Explicitly declared overlapping lane pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredOverlaps {
    pairs: BTreeSet<(LaneId, LaneId)>,
}

impl DeclaredOverlaps {
    /// An empty declaration: no distinct lanes overlap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `a` and `b` overlap (order irrelevant).
    pub fn declare(&mut self, a: LaneId, b: LaneId) {
        if a <= b {
            self.pairs.insert((a, b));
        } else {
            self.pairs.insert((b, a));
        }
    }

    /// Builder form of [`DeclaredOverlaps::declare`].
    pub fn with(mut self, a: LaneId, b: LaneId) -> Self {
        self.declare(a, b);
        self
    }

    /// Number of declared pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl LaneOverlap for DeclaredOverlaps {
    fn overlaps(&self, a: &Lane, b: &Lane) -> bool {
        let (lo, hi) = if a.id() <= b.id() {
            (a.id(), b.id())
        } else {
            (b.id(), a.id())
        };
        self.pairs.contains(&(lo.clone(), hi.clone()))
    }
}

/// Straight-corridor approximation of lane footprints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorOverlap {
    half_width: f64,
}

impl CorridorOverlap {
    /// Corridors of the given half-width (world units).
    pub fn new(half_width: f64) -> Self {
        Self {
            half_width: half_width.abs(),
        }
    }

    /// Corridor half-width.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }
}

impl LaneOverlap for CorridorOverlap {
    fn overlaps(&self, a: &Lane, b: &Lane) -> bool {
        let gap = segment_distance(
            a.start().flatten(),
            a.end().flatten(),
            b.start().flatten(),
            b.end().flatten(),
        );
        gap <= 2.0 * self.half_width
    }
}

fn point_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(&ab);
    if len_sq <= f64::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

fn segments_cross(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    let d1 = da.cross_2d(&(b0 - a0));
    let d2 = da.cross_2d(&(b1 - a0));
    let d3 = db.cross_2d(&(a0 - b0));
    let d4 = db.cross_2d(&(a1 - b0));
    (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
}

/// Minimum planar distance between segments `a0→a1` and `b0→b1`.
fn segment_distance(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> f64 {
    if segments_cross(a0, a1, b0, b1) {
        return 0.0;
    }
    point_segment_distance(a0, b0, b1)
        .min(point_segment_distance(a1, b0, b1))
        .min(point_segment_distance(b0, a0, a1))
        .min(point_segment_distance(b1, a0, a1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::Intersection;
    use junction_core::{ExitId, ForkId};

    /// A four-way layout: forks sit 1000 units out on each arm, facing the
    /// centre; exits sit on the opposite side of each arm, facing outward.
    fn four_way() -> Intersection {
        let mut ix = Intersection::new();
        let arms = [
            ("west", Vec3::planar(-1000.0, -150.0), Vec3::planar(1.0, 0.0)),
            ("east", Vec3::planar(1000.0, 150.0), Vec3::planar(-1.0, 0.0)),
        ];
        for (name, at, fwd) in arms {
            ix.add_fork(ForkId::new(name).unwrap(), at, fwd).unwrap();
        }
        ix.add_exit(
            ExitId::new("east").unwrap(),
            Vec3::planar(1000.0, -150.0),
            Vec3::planar(1.0, 0.0),
        )
        .unwrap();
        ix.add_exit(
            ExitId::new("west").unwrap(),
            Vec3::planar(-1000.0, 150.0),
            Vec3::planar(-1.0, 0.0),
        )
        .unwrap();
        ix.add_exit(
            ExitId::new("north").unwrap(),
            Vec3::planar(150.0, -1000.0),
            Vec3::planar(0.0, -1.0),
        )
        .unwrap();
        ix.connect_all();
        ix
    }

    fn activate(ix: &mut Intersection, fork: &str, exit: &str) -> LaneId {
        ix.set_lane_active(&ForkId::new(fork).unwrap(), &ExitId::new(exit).unwrap(), true)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn declared_overlaps_are_symmetric() {
        let mut ix = four_way();
        let a = activate(&mut ix, "west", "east");
        let b = activate(&mut ix, "east", "west");
        let probe = DeclaredOverlaps::new().with(b.clone(), a.clone());
        let (la, lb) = (ix.lane(&a).unwrap(), ix.lane(&b).unwrap());
        assert!(probe.overlaps(la, lb));
        assert!(probe.overlaps(lb, la));
        assert_eq!(probe.len(), 1);
    }

    #[test]
    fn undeclared_pair_does_not_overlap() {
        let mut ix = four_way();
        let a = activate(&mut ix, "west", "east");
        let b = activate(&mut ix, "east", "west");
        let probe = DeclaredOverlaps::new();
        assert!(!probe.overlaps(ix.lane(&a).unwrap(), ix.lane(&b).unwrap()));
    }

    #[test]
    fn opposing_straight_lanes_are_separated_by_corridor_width() {
        let mut ix = four_way();
        let a = activate(&mut ix, "west", "east");
        let b = activate(&mut ix, "east", "west");
        let (la, lb) = (ix.lane(&a).unwrap(), ix.lane(&b).unwrap());
        // Lanes run 300 units apart.
        assert!(!CorridorOverlap::new(100.0).overlaps(la, lb));
        assert!(CorridorOverlap::new(150.0).overlaps(la, lb));
    }

    #[test]
    fn crossing_lanes_overlap_at_any_width() {
        let mut ix = four_way();
        let a = activate(&mut ix, "west", "east");
        let b = activate(&mut ix, "east", "north");
        let (la, lb) = (ix.lane(&a).unwrap(), ix.lane(&b).unwrap());
        assert!(CorridorOverlap::new(0.0).overlaps(la, lb));
        assert!(CorridorOverlap::new(0.0).overlaps(lb, la));
    }

    #[test]
    fn segment_distance_of_parallel_segments() {
        let d = segment_distance(
            Vec3::planar(0.0, 0.0),
            Vec3::planar(10.0, 0.0),
            Vec3::planar(0.0, 3.0),
            Vec3::planar(10.0, 3.0),
        );
        assert!((d - 3.0).abs() < 1e-12);
    }
}
