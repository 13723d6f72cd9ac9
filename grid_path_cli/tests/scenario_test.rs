// Scenario runner tests: JSON in, reports out.
//
// The library tests drive `run_scenario()` directly. The last two tests run
// the `plan` binary on the bundled `scenarios/wall_gap.json` and on a
// generated unreachable scenario to check the exit codes and report file.

use std::path::PathBuf;
use std::process::Command;

use grid_path_cli::{RunOptions, Scenario, ScenarioReport, run_scenario};
use grid_path_searcher::{ClosedNodePolicy, ConfigError, Heuristic, MapError, WorldPoint};

fn wall_gap_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/wall_gap.json")
}

/// 5x5x5 unit map with the whole x = 2 plane blocked.
const FULL_WALL: &str = r#"{
    "map": {
        "resolution": 1.0,
        "lower_bound": [0.0, 0.0, 0.0],
        "upper_bound": [5.0, 5.0, 5.0],
        "voxel_counts": [5, 5, 5]
    },
    "boxes": [{ "min": [2.0, 0.0, 0.0], "max": [2.9, 5.0, 5.0] }],
    "queries": [{ "start": [0.5, 0.5, 0.5], "goal": [4.5, 4.5, 4.5] }]
}"#;

#[test]
fn bundled_scenario_threads_the_gap() {
    let scenario = Scenario::load(&wall_gap_path()).unwrap();
    let report = run_scenario(&scenario, &RunOptions::default()).unwrap();

    // 20 + 4 wall voxels; the stray point at (9, 9, 9) is dropped.
    assert_eq!(report.obstacles_marked, 24);
    assert_eq!(report.queries.len(), 2);

    let first = &report.queries[0];
    assert!(first.success);
    assert_eq!(first.heuristic, Heuristic::Diagonal);
    assert!(first.path.contains(&WorldPoint::new(2.5, 0.5, 0.5)));
    assert_eq!(first.path.first(), Some(&WorldPoint::new(0.5, 0.5, 0.5)));
    assert_eq!(first.path.last(), Some(&WorldPoint::new(4.5, 4.5, 4.5)));
    assert!(first.cost.is_some());

    let second = &report.queries[1];
    assert!(second.success);
    assert_eq!(second.heuristic, Heuristic::Dijkstra);
    assert!(second.path.contains(&WorldPoint::new(2.5, 0.5, 0.5)));
}

#[test]
fn full_wall_reports_failure() {
    let scenario = Scenario::from_json(FULL_WALL).unwrap();
    let report = run_scenario(&scenario, &RunOptions::default()).unwrap();
    assert_eq!(report.obstacles_marked, 25);

    let q = &report.queries[0];
    assert!(!q.success);
    assert!(q.path.is_empty());
    assert_eq!(q.cost, None);
    assert_eq!(q.visited, 2 * 5 * 5);
}

#[test]
fn options_override_heuristic_and_policy() {
    let scenario = Scenario::load(&wall_gap_path()).unwrap();
    let options = RunOptions {
        heuristic: Some(Heuristic::Euclidean),
        closed_policy: Some(ClosedNodePolicy::Reopen),
    };
    let report = run_scenario(&scenario, &options).unwrap();
    assert!(
        report
            .queries
            .iter()
            .all(|q| q.success && q.heuristic == Heuristic::Euclidean)
    );
}

#[test]
fn invalid_map_is_rejected_on_load() {
    let json = FULL_WALL.replace("\"resolution\": 1.0", "\"resolution\": 0.0");
    match Scenario::from_json(&json) {
        Err(ConfigError::Map(MapError::InvalidResolution(_))) => {}
        other => panic!("expected InvalidResolution, got {other:?}"),
    }
}

#[test]
fn plan_binary_writes_report_file() {
    let out = std::env::temp_dir().join(format!("plan_report_{}.json", std::process::id()));
    let status = Command::new(env!("CARGO_BIN_EXE_plan"))
        .arg(wall_gap_path())
        .arg("--output")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let json = std::fs::read_to_string(&out).unwrap();
    let report: ScenarioReport = serde_json::from_str(&json).unwrap();
    assert!(report.queries.iter().all(|q| q.success));
    std::fs::remove_file(&out).unwrap();
}

#[test]
fn plan_binary_exits_nonzero_when_a_goal_is_unreachable() {
    let input = std::env::temp_dir().join(format!("plan_wall_{}.json", std::process::id()));
    std::fs::write(&input, FULL_WALL).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_plan"))
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report: ScenarioReport = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!report.queries[0].success);
    std::fs::remove_file(&input).unwrap();
}

#[test]
fn plan_binary_names_an_unknown_heuristic() {
    let output = Command::new(env!("CARGO_BIN_EXE_plan"))
        .arg(wall_gap_path())
        .args(["--heuristic", "octagonal"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown heuristic 'octagonal'"),
        "stderr was: {stderr}"
    );
}
