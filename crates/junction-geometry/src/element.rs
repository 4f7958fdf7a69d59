//! # Intersection Elements
//!
//! Plain data records for the three kinds of static geometry. They carry no
//! behavior beyond accessors; the [`Intersection`](crate::Intersection)
//! owns them and hands out references.

use junction_core::{ExitId, ForkId, LaneId, TurnSignal, Vec3};

use crate::bearing::LaneShape;

/// Kind tag recorded for every element when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// An entry point ("fork").
    Entry,
    /// An exit point.
    Exit,
    /// A lane between one fork and one exit.
    Lane,
}

impl ElementKind {
    /// Human-readable kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Lane => "lane",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to one registered element, resolved through its kind tag.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    /// An entry point.
    Entry(&'a EntryPoint),
    /// An exit point.
    Exit(&'a ExitPoint),
    /// A lane.
    Lane(&'a Lane),
}

impl Element<'_> {
    /// The kind tag of this element.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Entry(_) => ElementKind::Entry,
            Self::Exit(_) => ElementKind::Exit,
            Self::Lane(_) => ElementKind::Lane,
        }
    }
}

/// A reachable exit as seen from one fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSlot {
    /// The exit this slot leads to.
    pub exit: ExitId,
    /// Whether a lane is active for this pairing.
    pub active: bool,
    /// The backing lane while active.
    pub lane: Option<LaneId>,
}

impl ExitSlot {
    /// An inactive slot for `exit`.
    pub fn new(exit: ExitId) -> Self {
        Self {
            exit,
            active: false,
            lane: None,
        }
    }
}

/// An entry point where vehicles arrive and choose an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPoint {
    pub(crate) id: ForkId,
    pub(crate) location: Vec3,
    pub(crate) forward: Vec3,
    pub(crate) exits: Vec<ExitSlot>,
}

impl EntryPoint {
    /// Fork identifier.
    pub fn id(&self) -> &ForkId {
        &self.id
    }

    /// World position.
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Unit planar forward direction (direction of travel into the box).
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Exit slots in registration order.
    pub fn exits(&self) -> &[ExitSlot] {
        &self.exits
    }

    /// The slot leading to `exit`, if one exists.
    pub fn slot(&self, exit: &ExitId) -> Option<&ExitSlot> {
        self.exits.iter().find(|s| &s.exit == exit)
    }
}

/// A point where vehicles leave the intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitPoint {
    pub(crate) id: ExitId,
    pub(crate) location: Vec3,
    pub(crate) forward: Vec3,
}

impl ExitPoint {
    /// Exit identifier.
    pub fn id(&self) -> &ExitId {
        &self.id
    }

    /// World position.
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Unit planar forward direction (direction of travel out of the box).
    pub fn forward(&self) -> Vec3 {
        self.forward
    }
}

/// An active, directed path from one fork to one exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub(crate) id: LaneId,
    pub(crate) fork: ForkId,
    pub(crate) exit: ExitId,
    pub(crate) required_signal: TurnSignal,
    pub(crate) shape: LaneShape,
    pub(crate) start: Vec3,
    pub(crate) end: Vec3,
}

impl Lane {
    /// Lane identifier.
    pub fn id(&self) -> &LaneId {
        &self.id
    }

    /// Owning fork.
    pub fn fork(&self) -> &ForkId {
        &self.fork
    }

    /// Target exit.
    pub fn exit(&self) -> &ExitId {
        &self.exit
    }

    /// Indicator a vehicle must show to take this lane.
    pub fn required_signal(&self) -> TurnSignal {
        self.required_signal
    }

    /// Diagnostic shape classification.
    pub fn shape(&self) -> LaneShape {
        self.shape
    }

    /// Fork location (lane start).
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Exit location (lane end).
    pub fn end(&self) -> Vec3 {
        self.end
    }
}
