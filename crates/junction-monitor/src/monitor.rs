//! # Intersection Monitor
//!
//! The arbitration core for one intersection. Every overlap event runs one
//! complete cycle before the next is accepted:
//!
//! ```text
//! event ──▶ ledger.observe ──▶ solve (events ⊕ geometry ⊕ rules) ──▶ dispatch
//! ```
//!
//! Region exits are the exception: the agent is evicted and its handle
//! released in the same step, and no solve runs.
//!
//! ## Failure Containment
//!
//! Only construction can fail (bad configuration, geometry or rule file).
//! After that every operation is total: unsatisfiable, undetermined and
//! failed solves leave the last issued commands in force, and dispatch
//! problems become [`DispatchSkip`](crate::DispatchSkip) entries.
//!
//! ## Thread Safety
//!
//! `Monitor` is `Send` but takes `&mut self` everywhere. Hosts delivering
//! events from several threads wrap it in
//! [`SharedMonitor`](crate::SharedMonitor).

use std::collections::BTreeMap;
use std::path::Path;

use junction_core::{
    ExitId, ForkId, GeometryError, JunctionError, LaneId, MonitorConfig, TimeDiscretizer,
    TurnSignal, VehicleId,
};
use junction_geometry::{GeometryCompiler, GeometryFacts, Intersection, LaneOverlap};
use junction_reasoner::{Program, ReasoningAdapter, ReasoningOracle, SolveOutcome};

use crate::actuation::{ActuationCommand, HandleRegistry, VehicleHandle};
use crate::artifacts::ArtifactWriter;
use crate::dispatch::{ActuationDispatcher, DispatchReport};
use crate::event::OverlapEvent;
use crate::ledger::EventLedger;

// ---------------------------------------------------------------------------
// Solution / CycleReport
// ---------------------------------------------------------------------------

/// The result of one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// 1-based solve counter of this monitor.
    pub sequence: u64,
    /// The program that was solved.
    pub program: Program,
    /// What the oracle returned, canonicalized.
    pub outcome: SolveOutcome,
}

/// The result of one full record → solve → dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// The solve.
    pub solution: Solution,
    /// The dispatch (empty when the solve was not actionable).
    pub dispatch: DispatchReport,
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Right-of-way arbiter for one intersection.
pub struct Monitor {
    config: MonitorConfig,
    discretizer: TimeDiscretizer,
    intersection: Intersection,
    overlap: Box<dyn LaneOverlap + Send>,
    compiler: GeometryCompiler,
    rules: String,
    adapter: ReasoningAdapter,
    ledger: EventLedger,
    handles: HandleRegistry,
    artifacts: Option<ArtifactWriter>,
    last_commands: BTreeMap<VehicleId, ActuationCommand>,
}

impl Monitor {
    /// Build a monitor, reading the rule program from `config.rules_path`.
    pub fn new(
        config: MonitorConfig,
        intersection: Intersection,
        overlap: Box<dyn LaneOverlap + Send>,
        oracle: Box<dyn ReasoningOracle>,
    ) -> Result<Self, JunctionError> {
        let rules = load_rules(&config.rules_path)?;
        Self::with_rules(config, intersection, overlap, rules, oracle)
    }

    /// Build a monitor from in-memory rule text.
    pub fn with_rules(
        config: MonitorConfig,
        intersection: Intersection,
        overlap: Box<dyn LaneOverlap + Send>,
        rules: impl Into<String>,
        oracle: Box<dyn ReasoningOracle>,
    ) -> Result<Self, JunctionError> {
        config.validate()?;
        let discretizer = config.discretizer()?;
        let adapter = ReasoningAdapter::new(oracle, config.max_models)?;
        let artifacts = config
            .artifact_dir
            .as_deref()
            .map(|dir| ArtifactWriter::open(dir, &config.name));

        let mut compiler = GeometryCompiler::new();
        let (facts, _) = compiler.compile(&intersection, overlap.as_ref());
        tracing::info!(
            monitor = %config.name,
            forks = intersection.forks().count(),
            lanes = intersection.lanes().count(),
            facts = facts.len(),
            oracle = adapter.oracle_name(),
            "monitor initialized"
        );
        if let Some(writer) = &artifacts {
            writer.write_geometry(facts);
        }

        Ok(Self {
            config,
            discretizer,
            intersection,
            overlap,
            compiler,
            rules: rules.into(),
            adapter,
            ledger: EventLedger::new(),
            handles: HandleRegistry::new(),
            artifacts,
            last_commands: BTreeMap::new(),
        })
    }

    // -- accessors ----------------------------------------------------------

    /// The monitor's configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// The monitored intersection.
    pub fn intersection(&self) -> &Intersection {
        &self.intersection
    }

    /// The event ledger.
    pub fn ledger(&self) -> &EventLedger {
        &self.ledger
    }

    /// The live handle registry.
    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    /// Currently compiled geometry facts.
    pub fn geometry(&mut self) -> &GeometryFacts {
        let (facts, recompiled) = self
            .compiler
            .compile(&self.intersection, self.overlap.as_ref());
        if recompiled {
            if let Some(writer) = &self.artifacts {
                writer.write_geometry(facts);
            }
        }
        facts
    }

    /// The last command successfully issued to each live vehicle.
    pub fn last_commands(&self) -> &BTreeMap<VehicleId, ActuationCommand> {
        &self.last_commands
    }

    /// The artifact writer, when artifacts are enabled.
    pub fn artifacts(&self) -> Option<&ArtifactWriter> {
        self.artifacts.as_ref()
    }

    // -- setup --------------------------------------------------------------

    /// Register the actuation handle for `vehicle`, replacing any previous
    /// one.
    pub fn attach(&mut self, vehicle: VehicleId, handle: Box<dyn VehicleHandle>) {
        if self.handles.insert(vehicle.clone(), handle).is_some() {
            tracing::debug!(vehicle = %vehicle, "actuation handle replaced");
        }
    }

    /// Toggle a lane. Geometry facts are recompiled before the next solve.
    pub fn set_lane_active(
        &mut self,
        fork: &ForkId,
        exit: &ExitId,
        active: bool,
    ) -> Result<Option<LaneId>, GeometryError> {
        self.intersection.set_lane_active(fork, exit, active)
    }

    // -- events -------------------------------------------------------------

    /// A vehicle reached a fork.
    pub fn on_arrival(
        &mut self,
        vehicle: VehicleId,
        fork: ForkId,
        sim_time: f64,
        signal: Option<TurnSignal>,
    ) -> CycleReport {
        self.run_cycle(OverlapEvent::Arrival {
            vehicle,
            fork,
            sim_time,
            signal,
        })
    }

    /// A vehicle entered the intersection from its fork.
    pub fn on_entrance(&mut self, vehicle: VehicleId, fork: ForkId, sim_time: f64) -> CycleReport {
        self.run_cycle(OverlapEvent::Entrance {
            vehicle,
            fork,
            sim_time,
        })
    }

    /// A vehicle entered a lane.
    pub fn on_enter_lane(&mut self, vehicle: VehicleId, lane: LaneId, sim_time: f64) -> CycleReport {
        self.run_cycle(OverlapEvent::EnterLane {
            vehicle,
            lane,
            sim_time,
        })
    }

    /// A vehicle left a lane.
    pub fn on_exit_lane(&mut self, vehicle: VehicleId, lane: LaneId, sim_time: f64) -> CycleReport {
        self.run_cycle(OverlapEvent::ExitLane {
            vehicle,
            lane,
            sim_time,
        })
    }

    /// A vehicle left the monitored region: evict its history and release its
    /// handle. Returns whether the vehicle was known. No solve runs.
    pub fn on_exit_intersection(&mut self, vehicle: &VehicleId) -> bool {
        let phase = self.ledger.record(vehicle).and_then(|r| r.phase());
        let had_history = self.ledger.evict(vehicle);
        let had_handle = self.handles.remove(vehicle);
        self.last_commands.remove(vehicle);
        if had_history || had_handle {
            tracing::debug!(vehicle = %vehicle, from = ?phase, "agent departed; evicted");
        } else {
            tracing::debug!(vehicle = %vehicle, "departure of unknown agent ignored");
        }
        had_history || had_handle
    }

    /// Dispatch on event kind. Returns `None` for region exits.
    pub fn handle_event(&mut self, event: OverlapEvent) -> Option<CycleReport> {
        match event {
            OverlapEvent::ExitIntersection { vehicle } => {
                self.on_exit_intersection(&vehicle);
                None
            }
            other => Some(self.run_cycle(other)),
        }
    }

    fn run_cycle(&mut self, event: OverlapEvent) -> CycleReport {
        self.record(&event);
        let solution = self.solve();
        let dispatch = self.dispatch(&solution);
        CycleReport { solution, dispatch }
    }

    fn record(&mut self, event: &OverlapEvent) {
        if let Some((constant, expected)) = event.element() {
            match self.intersection.element(&constant).map(|e| e.kind()) {
                Some(kind) if kind == expected => {}
                Some(kind) => tracing::warn!(
                    event = event.kind(),
                    element = %constant,
                    expected = %expected,
                    actual = %kind,
                    "event names an element of the wrong kind; recorded anyway"
                ),
                None => tracing::warn!(
                    event = event.kind(),
                    element = %constant,
                    "event names an unknown element; recorded anyway"
                ),
            }
        }
        let tick = self
            .discretizer
            .discretize(event.sim_time().unwrap_or_default());
        tracing::debug!(
            vehicle = %event.vehicle(),
            event = event.kind(),
            tick = tick.value(),
            "event recorded"
        );
        self.ledger
            .observe(event.vehicle(), event.phase(), event.facts(tick));
    }

    // -- solve / dispatch ---------------------------------------------------

    /// Solve the current ledger against geometry and rules.
    pub fn solve(&mut self) -> Solution {
        let (facts, recompiled) = self
            .compiler
            .compile(&self.intersection, self.overlap.as_ref());
        if recompiled {
            tracing::info!(facts = facts.len(), fingerprint = %facts.fingerprint().short(), "geometry recompiled");
            if let Some(writer) = &self.artifacts {
                writer.write_geometry(facts);
            }
        }
        let program = Program::assemble(&self.ledger.serialize(), facts.text(), &self.rules);
        let outcome = self.adapter.solve(&program);
        if let Some(writer) = &mut self.artifacts {
            writer.append_program(&program);
        }
        Solution {
            sequence: self.adapter.solves(),
            program,
            outcome,
        }
    }

    /// Apply a solution's selected model. Non-actionable outcomes change
    /// nothing.
    pub fn dispatch(&mut self, solution: &Solution) -> DispatchReport {
        let Some(model) = solution.outcome.selected() else {
            tracing::debug!(
                sequence = solution.sequence,
                outcome = solution.outcome.label(),
                "no actionable model; commands unchanged"
            );
            return DispatchReport::default();
        };
        let report = ActuationDispatcher::dispatch(model, &mut self.handles);
        for (vehicle, command) in &report.issued {
            self.last_commands.insert(vehicle.clone(), *command);
        }
        report
    }
}

fn load_rules(path: &Path) -> Result<String, JunctionError> {
    std::fs::read_to_string(path).map_err(|source| JunctionError::Rules {
        path: path.to_path_buf(),
        source,
    })
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("name", &self.config.name)
            .field("agents", &self.ledger.len())
            .field("handles", &self.handles)
            .field("adapter", &self.adapter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::{CommandLog, RecordingHandle};
    use junction_core::{Atom, Term, Vec3};
    use junction_geometry::DeclaredOverlaps;
    use junction_reasoner::{Model, StratifiedOracle};

    const RULES: &str = "\
waiting(V, F, T) :- arrivesAtForkAtTime(V, F, T), not entered(V).
entered(V) :- entersForkAtTime(V, _, _).
mustStopToYield(V) :- waiting(V, F, T), waiting(W, G, T), isOnRightOf(G, F), V != W.
hasRightOfWay(V) :- waiting(V, _, _), not mustStopToYield(V).
";

    fn v(name: &str) -> VehicleId {
        VehicleId::new(name).unwrap()
    }

    fn f(name: &str) -> ForkId {
        ForkId::new(name).unwrap()
    }

    fn crossing() -> Intersection {
        let mut ix = Intersection::new();
        ix.add_fork(f("a"), Vec3::planar(-1000.0, 0.0), Vec3::planar(1.0, 0.0))
            .unwrap();
        ix.add_fork(f("b"), Vec3::planar(0.0, -1000.0), Vec3::planar(0.0, 1.0))
            .unwrap();
        ix.add_exit(
            ExitId::new("x").unwrap(),
            Vec3::planar(1000.0, 0.0),
            Vec3::planar(1.0, 0.0),
        )
        .unwrap();
        ix.connect_all();
        ix
    }

    fn monitor(oracle: Box<dyn ReasoningOracle>) -> Monitor {
        Monitor::with_rules(
            MonitorConfig::default(),
            crossing(),
            Box::new(DeclaredOverlaps::new()),
            RULES,
            oracle,
        )
        .unwrap()
    }

    fn attach(m: &mut Monitor, log: &CommandLog, name: &str) {
        m.attach(v(name), Box::new(RecordingHandle::new(v(name), log.clone())));
    }

    /// Always answers with the same outcome.
    struct Fixed(SolveOutcome);

    impl ReasoningOracle for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&mut self, _program: &Program, _max_models: usize) -> SolveOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn vehicle_on_the_right_goes_first() {
        let log = CommandLog::new();
        let mut m = monitor(Box::new(StratifiedOracle::new()));
        attach(&mut m, &log, "1");
        attach(&mut m, &log, "2");
        m.on_arrival(v("1"), f("a"), 1.05, None);
        let report = m.on_arrival(v("2"), f("b"), 1.45, None);

        // Both land in tick 2; f_a is on the right of f_b.
        assert_eq!(report.dispatch.command_for(&v("1")), Some(ActuationCommand::Go));
        assert_eq!(report.dispatch.command_for(&v("2")), Some(ActuationCommand::Stop));
        assert_eq!(m.last_commands().get(&v("2")), Some(&ActuationCommand::Stop));
    }

    #[test]
    fn exit_evicts_without_solving() {
        let log = CommandLog::new();
        let mut m = monitor(Box::new(StratifiedOracle::new()));
        attach(&mut m, &log, "1");
        m.on_arrival(v("1"), f("a"), 0.0, None);
        let solves = m.adapter.solves();
        assert!(m.on_exit_intersection(&v("1")));
        assert_eq!(m.adapter.solves(), solves);
        assert!(!m.ledger().contains(&v("1")));
        assert!(!m.handles().contains(&v("1")));
        assert!(m.last_commands().is_empty());
        assert!(!m.on_exit_intersection(&v("1")));
    }

    #[test]
    fn unsatisfiable_leaves_commands_unchanged() {
        let log = CommandLog::new();
        let go = Model::new(vec![Atom::new("hasRightOfWay", vec![Term::sym("v_1")])]);
        let mut m = monitor(Box::new(Fixed(SolveOutcome::Models(vec![go]))));
        attach(&mut m, &log, "1");
        m.on_arrival(v("1"), f("a"), 0.0, None);
        let before = m.last_commands().clone();
        assert_eq!(before.get(&v("1")), Some(&ActuationCommand::Go));

        for outcome in [
            SolveOutcome::Unsatisfiable,
            SolveOutcome::Undetermined,
            SolveOutcome::Failure("down".to_string()),
        ] {
            m.adapter = ReasoningAdapter::new(Box::new(Fixed(outcome)), 20).unwrap();
            let report = m.on_entrance(v("1"), f("a"), 1.0);
            assert!(report.dispatch.is_empty());
            assert_eq!(m.last_commands(), &before);
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn unknown_element_is_recorded() {
        let mut m = monitor(Box::new(StratifiedOracle::new()));
        m.on_arrival(v("1"), f("nowhere"), 0.0, None);
        let history = m.ledger().history(&v("1")).unwrap();
        assert_eq!(history[0].to_string(), "arrivesAtForkAtTime(v_1, f_nowhere, 0)");
    }

    #[test]
    fn solve_without_agents_is_empty_model() {
        let mut m = monitor(Box::new(StratifiedOracle::new()));
        let solution = m.solve();
        assert_eq!(solution.sequence, 1);
        assert!(solution.outcome.is_actionable());
        assert!(m.dispatch(&solution).is_empty());
    }

    #[test]
    fn lane_toggle_triggers_recompile() {
        let mut m = monitor(Box::new(StratifiedOracle::new()));
        let before = m.geometry().fingerprint();
        m.set_lane_active(&f("a"), &ExitId::new("x").unwrap(), true)
            .unwrap();
        let solution = m.solve();
        assert!(solution.program.text().contains("laneFromTo(l_a_to_x, f_a, e_x)."));
        assert_ne!(m.geometry().fingerprint(), before);
    }

    #[test]
    fn missing_rules_file_is_fatal() {
        let config = MonitorConfig::default().with_rules_path("/nonexistent/rules.cl");
        let err = Monitor::new(
            config,
            crossing(),
            Box::new(DeclaredOverlaps::new()),
            Box::new(StratifiedOracle::new()),
        )
        .unwrap_err();
        assert!(matches!(err, JunctionError::Rules { .. }));
    }

    #[test]
    fn invalid_config_is_fatal() {
        let config = MonitorConfig::default().with_max_models(0);
        let err = Monitor::with_rules(
            config,
            crossing(),
            Box::new(DeclaredOverlaps::new()),
            RULES,
            Box::new(StratifiedOracle::new()),
        )
        .unwrap_err();
        assert!(matches!(err, JunctionError::Validation(_)));
    }

    #[test]
    fn artifacts_written_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig::default().with_artifact_dir(dir.path());
        let mut m = Monitor::with_rules(
            config,
            crossing(),
            Box::new(DeclaredOverlaps::new()),
            RULES,
            Box::new(StratifiedOracle::new()),
        )
        .unwrap();
        m.on_arrival(v("1"), f("a"), 0.0, Some(TurnSignal::Right));
        let geometry = std::fs::read_to_string(dir.path().join("MonitorGeometry.cl")).unwrap();
        assert!(geometry.contains("isOnRightOf(f_a, f_b)."));
        let log = std::fs::read_to_string(dir.path().join("MonitorLog.cl")).unwrap();
        assert!(log.starts_with("% program 1 "));
        assert!(log.contains("signalsAtForkAtTime(v_1, right, f_a, 0)."));
    }
}
