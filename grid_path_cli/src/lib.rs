// Scenario runner behind the `plan` binary.
//
// A scenario is a JSON file bundling a map config, obstacle sources, and a
// list of path queries. `run_scenario()` builds a `SearchEngine`, feeds it
// the obstacles, runs every query in order, and returns one report per
// query. The binary (`main.rs`) only parses arguments, sets up logging, and
// writes the reports out.
//
// Obstacle boxes are rasterized to voxel centers and marked as points, the
// same way a point-cloud feed would arrive from a mapping pipeline.

use grid_path_searcher::{
    ClosedNodePolicy, ConfigError, Heuristic, MapError, PlannerConfig, SearchEngine, VoxelIndex,
    WorldPoint,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Axis-aligned box of obstacles, inclusive on both corners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleBox {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

/// One start/goal request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub start: WorldPoint,
    pub goal: WorldPoint,
    /// Falls back to the map config's heuristic.
    #[serde(default)]
    pub heuristic: Option<Heuristic>,
}

/// Everything needed for an offline planning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub map: PlannerConfig,
    #[serde(default)]
    pub obstacles: Vec<WorldPoint>,
    #[serde(default)]
    pub boxes: Vec<ObstacleBox>,
    pub queries: Vec<Query>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.map.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Command-line overrides applied on top of the scenario.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOptions {
    /// Use this selector for every query.
    pub heuristic: Option<Heuristic>,
    pub closed_policy: Option<ClosedNodePolicy>,
}

/// Outcome of one query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryReport {
    pub start: WorldPoint,
    pub goal: WorldPoint,
    pub heuristic: Heuristic,
    pub success: bool,
    /// Empty when `success` is false.
    pub path: Vec<WorldPoint>,
    pub cost: Option<f64>,
    pub expansions: usize,
    /// Number of Closed voxels when the search stopped.
    pub visited: usize,
    pub stale_corrections: usize,
    pub elapsed_ms: f64,
}

/// Results for a whole scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub obstacles_marked: usize,
    pub queries: Vec<QueryReport>,
}

/// Build the engine, load obstacles, and run every query.
pub fn run_scenario(scenario: &Scenario, options: &RunOptions) -> Result<ScenarioReport, MapError> {
    let mut config = scenario.map.clone();
    if let Some(policy) = options.closed_policy {
        config.closed_policy = policy;
    }
    let mut engine = SearchEngine::from_config(&config)?;

    let mut obstacles_marked = engine.mark_obstacles(scenario.obstacles.iter().copied());
    let dropped = scenario.obstacles.len() - obstacles_marked;
    if dropped > 0 {
        warn!("{dropped} obstacle points fall outside the map and were dropped");
    }
    for b in &scenario.boxes {
        let points = box_points(&engine, b);
        obstacles_marked += engine.mark_obstacles(points);
    }
    info!(
        "map ready: {} occupied voxels from {obstacles_marked} points",
        engine.map().occupancy().obstacle_count()
    );

    let queries = scenario
        .queries
        .iter()
        .map(|q| run_query(&mut engine, q, options))
        .collect();

    Ok(ScenarioReport {
        obstacles_marked,
        queries,
    })
}

fn run_query(engine: &mut SearchEngine, query: &Query, options: &RunOptions) -> QueryReport {
    let heuristic = options
        .heuristic
        .or(query.heuristic)
        .unwrap_or(engine.default_heuristic());
    let outcome = engine.search(query.start, query.goal, heuristic);
    let stats = engine.last_stats().clone();
    let path = engine.get_path().unwrap_or_default();

    QueryReport {
        start: query.start,
        goal: query.goal,
        heuristic,
        success: outcome.is_found(),
        path,
        cost: stats.path_cost,
        expansions: stats.expansions,
        visited: engine.visited_nodes().len(),
        stale_corrections: stats.stale_corrections,
        elapsed_ms: stats.elapsed.as_secs_f64() * 1000.0,
    }
}

/// Centers of every voxel whose center lies inside `b`.
fn box_points(engine: &SearchEngine, b: &ObstacleBox) -> Vec<WorldPoint> {
    let grid = engine.grid();
    let lo = grid.to_index(b.min);
    let hi = grid.to_index(b.max);
    let inside = |c: WorldPoint| {
        c.x >= b.min.x
            && c.y >= b.min.y
            && c.z >= b.min.z
            && c.x <= b.max.x
            && c.y <= b.max.y
            && c.z <= b.max.z
    };

    let mut points = Vec::new();
    for x in lo.x..=hi.x {
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                let c = grid.to_world(VoxelIndex::new(x, y, z));
                if inside(c) {
                    points.push(c);
                }
            }
        }
    }
    points
}
