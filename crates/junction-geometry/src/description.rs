//! # Intersection Descriptions
//!
//! YAML layouts for hosts (and the CLI) that do not build an
//! [`Intersection`] programmatically:
//!
//! ```yaml
//! center: { x: 0, y: 0 }
//! extent: { x: 1800, y: 1800 }
//! yaw: 0
//! forks:
//!   - { id: south, location: { x: -1000, y: 0 }, forward: { x: 1, y: 0 } }
//! exits:
//!   - { id: north, location: { x: 1000, y: 0 }, forward: { x: 1, y: 0 } }
//! lanes:
//!   - { fork: south, exit: north }
//! corridor_half_width: 150
//! ```
//!
//! Forks and exits outside the monitored box are ignored, as are lanes
//! touching them. The box spans `center ± extent` in its own frame, which is
//! the world frame turned by `yaw` degrees about Z (counter-clockwise, default
//! 0 for an axis-aligned box). Every fork in range is connected to every exit
//! in range; only the listed lanes are activated.
//!
//! Overlaps come from `corridor_half_width` when set, otherwise from the
//! explicit `overlaps` pairs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use junction_core::{ExitId, ForkId, JunctionError, LaneId, Vec3};

use crate::intersection::Intersection;
use crate::overlap::{CorridorOverlap, DeclaredOverlaps, LaneOverlap};

/// Default half-extent of the monitored box along each axis.
pub const DEFAULT_EXTENT: f64 = 1800.0;

/// Half-extents of the monitored box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Extent {
    /// Half-extent along X.
    pub x: f64,
    /// Half-extent along Y.
    pub y: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            x: DEFAULT_EXTENT,
            y: DEFAULT_EXTENT,
        }
    }
}

/// One entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForkSpec {
    /// Fork name (without prefix).
    pub id: ForkId,
    /// World position.
    pub location: Vec3,
    /// Direction of travel into the intersection.
    pub forward: Vec3,
}

/// One exit point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExitSpec {
    /// Exit name (without prefix).
    pub id: ExitId,
    /// World position.
    pub location: Vec3,
    /// Direction of travel out of the intersection.
    pub forward: Vec3,
}

/// A lane to activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaneSpec {
    /// Source fork.
    pub fork: ForkId,
    /// Target exit.
    pub exit: ExitId,
}

/// A complete intersection layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntersectionDescription {
    /// Centre of the monitored box.
    pub center: Vec3,
    /// Half-extents of the monitored box.
    pub extent: Extent,
    /// Rotation of the monitored box about Z, in degrees.
    pub yaw: f64,
    /// Entry points.
    pub forks: Vec<ForkSpec>,
    /// Exit points.
    pub exits: Vec<ExitSpec>,
    /// Lanes to activate. Empty means none.
    pub lanes: Vec<LaneSpec>,
    /// Explicitly overlapping lane pairs, by bare lane name.
    pub overlaps: Vec<[LaneId; 2]>,
    /// Use straight-corridor overlap with this half-width instead of `overlaps`.
    pub corridor_half_width: Option<f64>,
}

impl IntersectionDescription {
    /// Parse a description from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, JunctionError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a description file.
    pub fn load(path: &Path) -> Result<Self, JunctionError> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded intersection description");
        Self::from_yaml_str(&text)
    }

    fn in_range(&self, location: &Vec3) -> bool {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        let dx = location.x - self.center.x;
        let dy = location.y - self.center.y;
        // Displacement in the box frame.
        let local_x = dx * cos + dy * sin;
        let local_y = dy * cos - dx * sin;
        local_x.abs() <= self.extent.x && local_y.abs() <= self.extent.y
    }

    /// Register every in-range element and activate the listed lanes.
    pub fn build(&self) -> Result<Intersection, JunctionError> {
        let mut ix = Intersection::new();
        for fork in &self.forks {
            if !self.in_range(&fork.location) {
                tracing::debug!(fork = %fork.id, "fork outside monitored extent; ignored");
                continue;
            }
            ix.add_fork(fork.id.clone(), fork.location, fork.forward)?;
        }
        for exit in &self.exits {
            if !self.in_range(&exit.location) {
                tracing::debug!(exit = %exit.id, "exit outside monitored extent; ignored");
                continue;
            }
            ix.add_exit(exit.id.clone(), exit.location, exit.forward)?;
        }
        ix.connect_all();

        for lane in &self.lanes {
            if ix.fork(&lane.fork).is_none() || ix.exit(&lane.exit).is_none() {
                let declared = self.forks.iter().any(|f| f.id == lane.fork)
                    && self.exits.iter().any(|e| e.id == lane.exit);
                if declared {
                    tracing::debug!(
                        fork = %lane.fork,
                        exit = %lane.exit,
                        "lane touches an ignored element; skipped"
                    );
                    continue;
                }
            }
            ix.set_lane_active(&lane.fork, &lane.exit, true)?;
        }
        Ok(ix)
    }

    /// The overlap probe this description selects.
    pub fn overlap_probe(&self) -> Box<dyn LaneOverlap + Send> {
        match self.corridor_half_width {
            Some(half_width) => Box::new(CorridorOverlap::new(half_width)),
            None => Box::new(
                self.overlaps
                    .iter()
                    .fold(DeclaredOverlaps::new(), |acc, [a, b]| {
                        acc.with(a.clone(), b.clone())
                    }),
            ),
        }
    }
}
