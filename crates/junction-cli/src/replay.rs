//! # Replay Subcommand
//!
//! Feeds a recorded event file through a fresh monitor, one full cycle per
//! event, and prints what each solve decided. Every vehicle gets a
//! [`RecordingHandle`] the first time it appears, so the printed commands are
//! exactly what a host would have received.
//!
//! Event files are YAML lists of tagged events:
//!
//! ```yaml
//! - { kind: arrival, vehicle: car1, fork: south, sim_time: 1.05, signal: left }
//! - { kind: entrance, vehicle: car1, fork: south, sim_time: 2.0 }
//! - { kind: exit_intersection, vehicle: car1 }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use junction_core::{MonitorConfig, VehicleId};
use junction_geometry::IntersectionDescription;
use junction_monitor::{ActuationCommand, CommandLog, Monitor, OverlapEvent, RecordingHandle};
use junction_reasoner::{ClingoProcess, ReasoningOracle, StratifiedOracle};

/// Arguments for the `junction replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Intersection description (YAML).
    #[arg(long, value_name = "FILE")]
    pub intersection: PathBuf,

    /// Recorded overlap events (YAML list).
    #[arg(long, value_name = "FILE")]
    pub events: PathBuf,

    /// Rule program. Overrides the configured `rules_path`.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Write the geometry dump and program log into this directory.
    #[arg(long, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,

    /// Maximum models requested per solve.
    #[arg(short = 'n', long)]
    pub max_models: Option<usize>,

    /// Which reasoning oracle solves the programs.
    #[arg(long, value_enum, default_value_t = OracleKind::Builtin)]
    pub oracle: OracleKind,

    /// The clingo executable used with `--oracle clingo`.
    #[arg(long, value_name = "PATH", default_value = "clingo")]
    pub clingo: PathBuf,
}

/// Selectable reasoning oracles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OracleKind {
    /// The in-process stratified evaluator.
    Builtin,
    /// An external clingo process.
    Clingo,
}

impl OracleKind {
    /// Instantiate the oracle.
    pub fn build(self, clingo: &Path) -> Box<dyn ReasoningOracle> {
        match self {
            Self::Builtin => Box::new(StratifiedOracle::new()),
            Self::Clingo => Box::new(ClingoProcess::new().with_executable(clingo)),
        }
    }
}

/// One replayed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    /// 1-based position in the event file.
    pub index: usize,
    /// Event kind.
    pub kind: &'static str,
    /// The vehicle the event concerns.
    pub vehicle: VehicleId,
    /// Solve outcome label. `None` for region exits, which do not solve.
    pub outcome: Option<&'static str>,
    /// Commands issued by this cycle.
    pub issued: Vec<(VehicleId, ActuationCommand)>,
    /// Number of predicates dispatch could not act on.
    pub skipped: usize,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<3} {:<17} {:<10}", self.index, self.kind, self.vehicle.as_str())?;
        match self.outcome {
            None => write!(f, " evicted"),
            Some(outcome) => {
                write!(f, " {outcome}")?;
                for (vehicle, command) in &self.issued {
                    write!(f, " {vehicle}={command}")?;
                }
                if self.skipped > 0 {
                    write!(f, " ({} skipped)", self.skipped)?;
                }
                Ok(())
            }
        }
    }
}

/// Parse an event file.
pub fn load_events(path: &Path) -> Result<Vec<OverlapEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("malformed events {}", path.display()))
}

/// Build a monitor for the intersection described in `description`.
pub fn build_monitor(
    config: MonitorConfig,
    description: &Path,
    oracle: Box<dyn ReasoningOracle>,
) -> Result<Monitor> {
    let layout = IntersectionDescription::load(description)
        .with_context(|| format!("failed to load intersection {}", description.display()))?;
    let intersection = layout.build().context("invalid intersection description")?;
    Monitor::new(config, intersection, layout.overlap_probe(), oracle)
        .context("failed to initialize monitor")
}

/// Run `events` through `monitor` in order, attaching a recording handle to
/// every vehicle on first sight.
pub fn replay(monitor: &mut Monitor, events: Vec<OverlapEvent>, log: &CommandLog) -> Vec<ReplayStep> {
    let mut steps = Vec::with_capacity(events.len());
    for (i, event) in events.into_iter().enumerate() {
        let vehicle = event.vehicle().clone();
        let kind = event.kind();
        let departing = matches!(event, OverlapEvent::ExitIntersection { .. });
        if !departing && !monitor.handles().contains(&vehicle) {
            monitor.attach(
                vehicle.clone(),
                Box::new(RecordingHandle::new(vehicle.clone(), log.clone())),
            );
        }
        let step = match monitor.handle_event(event) {
            Some(report) => ReplayStep {
                index: i + 1,
                kind,
                vehicle,
                outcome: Some(report.solution.outcome.label()),
                issued: report.dispatch.issued,
                skipped: report.dispatch.skipped.len(),
            },
            None => ReplayStep {
                index: i + 1,
                kind,
                vehicle,
                outcome: None,
                issued: Vec::new(),
                skipped: 0,
            },
        };
        steps.push(step);
    }
    steps
}

/// Execute the replay subcommand.
///
/// Returns exit code: 0 once every event was replayed.
pub fn run_replay(args: &ReplayArgs, config: Option<&Path>) -> Result<u8> {
    let mut config = crate::resolve_config(config)?;
    if let Some(rules) = &args.rules {
        config = config.with_rules_path(rules);
    }
    if let Some(dir) = &args.artifacts {
        config = config.with_artifact_dir(dir);
    }
    if let Some(max_models) = args.max_models {
        config = config.with_max_models(max_models);
    }

    let mut monitor = build_monitor(config, &args.intersection, args.oracle.build(&args.clingo))?;
    let events = load_events(&args.events)?;
    tracing::info!(events = events.len(), oracle = ?args.oracle, "replaying");

    let log = CommandLog::new();
    for step in replay(&mut monitor, events, &log) {
        println!("{step}");
    }

    println!("\nFinal commands:");
    if monitor.last_commands().is_empty() {
        println!("  (none)");
    }
    for (vehicle, command) in monitor.last_commands() {
        println!("  {vehicle}: {command}");
    }
    println!("{} command(s) issued in total.", log.len());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSING: &str = r#"
forks:
  - { id: a, location: { x: -1000, y: 0 }, forward: { x: 1, y: 0 } }
  - { id: b, location: { x: 0, y: -1000 }, forward: { x: 0, y: 1 } }
exits:
  - { id: x, location: { x: 1000, y: 0 }, forward: { x: 1, y: 0 } }
"#;

    const RULES: &str = "\
entered(V) :- entersForkAtTime(V, _, _).
waiting(V, F, T) :- arrivesAtForkAtTime(V, F, T), not entered(V).
mustStopToYield(V) :- waiting(V, F, T), waiting(W, G, T), isOnRightOf(G, F), V != W.
hasRightOfWay(V) :- waiting(V, _, _), not mustStopToYield(V).
";

    const EVENTS: &str = r#"
- { kind: arrival, vehicle: car1, fork: a, sim_time: 1.05 }
- { kind: arrival, vehicle: car2, fork: b, sim_time: 1.45 }
- { kind: entrance, vehicle: car1, fork: a, sim_time: 3.0 }
- { kind: exit_intersection, vehicle: car1 }
"#;

    fn fixture() -> (tempfile::TempDir, Monitor) {
        let dir = tempfile::tempdir().unwrap();
        let layout = dir.path().join("crossing.yaml");
        let rules = dir.path().join("rules.cl");
        std::fs::write(&layout, CROSSING).unwrap();
        std::fs::write(&rules, RULES).unwrap();
        let config = MonitorConfig::default().with_rules_path(&rules);
        let monitor = build_monitor(config, &layout, OracleKind::Builtin.build(Path::new("clingo")))
            .unwrap();
        (dir, monitor)
    }

    #[test]
    fn replay_attaches_handles_and_reports_each_cycle() {
        let (_dir, mut monitor) = fixture();
        let events: Vec<OverlapEvent> = serde_yaml::from_str(EVENTS).unwrap();
        let log = CommandLog::new();
        let steps = replay(&mut monitor, events, &log);

        assert_eq!(steps.len(), 4);
        let car1 = VehicleId::new("car1").unwrap();
        let car2 = VehicleId::new("car2").unwrap();
        assert!(steps[1]
            .issued
            .contains(&(car2.clone(), ActuationCommand::Stop)));
        assert!(steps[1].issued.contains(&(car1.clone(), ActuationCommand::Go)));
        // car1 entered; car2 is now the only one waiting.
        assert_eq!(steps[2].issued, vec![(car2.clone(), ActuationCommand::Go)]);
        assert_eq!(steps[3].outcome, None);
        assert!(!monitor.handles().contains(&car1));
        assert_eq!(log.last_for(&car2), Some(ActuationCommand::Go));
    }

    #[test]
    fn steps_render_on_one_line() {
        let step = ReplayStep {
            index: 2,
            kind: "arrival",
            vehicle: VehicleId::new("car2").unwrap(),
            outcome: Some("satisfiable"),
            issued: vec![(VehicleId::new("car2").unwrap(), ActuationCommand::Stop)],
            skipped: 1,
        };
        let line = step.to_string();
        assert!(line.starts_with("#2"));
        assert!(line.contains("car2=stop"));
        assert!(line.ends_with("(1 skipped)"));
    }

    #[test]
    fn malformed_event_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.yaml");
        std::fs::write(&path, "- { kind: teleport, vehicle: car1 }\n").unwrap();
        let err = load_events(&path).unwrap_err();
        assert!(format!("{err:#}").contains("malformed events"));
    }
}
