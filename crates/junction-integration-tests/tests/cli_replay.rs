//! # CLI Replay
//!
//! Drives the `junction` subcommand handlers against the files shipped in
//! `demos/` and `rules/`.

use std::path::{Path, PathBuf};

use junction_cli::check::check_rules;
use junction_cli::geometry::compile_description;
use junction_cli::replay::{build_monitor, load_events, replay, OracleKind};
use junction_core::{MonitorConfig, VehicleId};
use junction_monitor::{ActuationCommand, CommandLog};

fn workspace_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(relative)
}

fn v(name: &str) -> VehicleId {
    VehicleId::new(name).unwrap()
}

#[test]
fn shipped_rules_pass_the_check() {
    let text = std::fs::read_to_string(workspace_file("rules/uncontrolled-intersection.cl")).unwrap();
    let (code, message) = check_rules(&text);
    assert_eq!(code, 0, "{message}");
    assert!(message.starts_with("OK:"));
}

#[test]
fn demo_crossing_compiles() {
    let facts = compile_description(&workspace_file("demos/crossing.yaml")).unwrap();
    let text = facts.text();
    assert!(text.contains("isOnRightOf(f_west, f_south)."));
    assert!(text.contains("laneFromTo(l_west_to_east, f_west, e_east)."));
    assert!(text.contains("overlaps(l_south_to_north, l_west_to_east)."));
    // Opposing straight lanes are 300 apart, inside two 200 half-widths.
    assert!(text.contains("overlaps(l_east_to_west, l_west_to_east)."));
    assert_eq!(facts, compile_description(&workspace_file("demos/crossing.yaml")).unwrap());
}

#[test]
fn demo_replay_end_to_end() {
    let artifacts = tempfile::tempdir().unwrap();
    let config = MonitorConfig::default()
        .with_rules_path(workspace_file("rules/uncontrolled-intersection.cl"))
        .with_artifact_dir(artifacts.path());
    let mut monitor = build_monitor(
        config,
        &workspace_file("demos/crossing.yaml"),
        OracleKind::Builtin.build(Path::new("clingo")),
    )
    .unwrap();
    let events = load_events(&workspace_file("demos/rush-hour.yaml")).unwrap();
    let log = CommandLog::new();
    let steps = replay(&mut monitor, events, &log);

    assert_eq!(steps.len(), 8);
    assert!(steps.iter().all(|s| s.outcome != Some("failure")));

    // Same tick: car1 comes from the right.
    assert!(steps[1].issued.contains(&(v("car1"), ActuationCommand::Go)));
    assert!(steps[1].issued.contains(&(v("car2"), ActuationCommand::Stop)));

    // car1 occupies the crossing lane, then clears it.
    assert!(steps[3].issued.contains(&(v("car2"), ActuationCommand::Stop)));
    assert!(steps[4].issued.contains(&(v("car2"), ActuationCommand::Go)));

    assert_eq!(steps[5].outcome, None);
    assert_eq!(steps[7].outcome, None);
    assert!(monitor.ledger().is_empty());
    assert!(monitor.handles().is_empty());

    let program_log = std::fs::read_to_string(artifacts.path().join("MonitorLog.cl")).unwrap();
    assert_eq!(program_log.matches("% program ").count(), 6);
}

#[test]
fn unreadable_intersection_is_an_error() {
    let result = build_monitor(
        MonitorConfig::default(),
        Path::new("/nonexistent/crossing.yaml"),
        OracleKind::Builtin.build(Path::new("clingo")),
    );
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("failed to load intersection"));
}
