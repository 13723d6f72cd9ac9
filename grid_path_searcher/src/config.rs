// Planner configuration.
//
// `PlannerConfig` holds the map geometry handed to `SearchEngine::initialize`
// plus the engine's tunables (default heuristic, closed-node policy, slow
// search warning threshold). It is plain serde data, loaded from JSON by the
// host; the CLI embeds it as the `map` section of a scenario file.
//
// Geometry fields are required. Tunables fall back to defaults when absent
// so a minimal config is just resolution, bounds, and voxel counts.
//
// See also: `search.rs` for `ClosedNodePolicy` and how the tunables are
// applied, `error.rs` for `ConfigError`.

use crate::error::{ConfigError, MapError};
use crate::grid::GridIndexSpace;
use crate::heuristic::Heuristic;
use crate::search::ClosedNodePolicy;
use crate::types::WorldPoint;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_slow_search_warn_ms() -> u64 {
    100
}

/// Map geometry and search tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Edge length of one voxel, in world units.
    pub resolution: f64,
    /// Lower corner of the map box (inclusive).
    pub lower_bound: WorldPoint,
    /// Upper corner of the map box (exclusive).
    pub upper_bound: WorldPoint,
    /// Voxel count along x, y, z.
    pub voxel_counts: [usize; 3],
    /// Selector used when a query does not name one.
    #[serde(default)]
    pub heuristic: Heuristic,
    /// What to do when a Closed node is reached more cheaply.
    #[serde(default)]
    pub closed_policy: ClosedNodePolicy,
    /// Searches slower than this are logged at warn level.
    #[serde(default = "default_slow_search_warn_ms")]
    pub slow_search_warn_ms: u64,
}

impl PlannerConfig {
    /// Config with explicit voxel counts. Tunables take their defaults.
    pub fn new(
        resolution: f64,
        lower: WorldPoint,
        upper: WorldPoint,
        voxel_counts: [usize; 3],
    ) -> Self {
        Self {
            resolution,
            lower_bound: lower,
            upper_bound: upper,
            voxel_counts,
            heuristic: Heuristic::default(),
            closed_policy: ClosedNodePolicy::default(),
            slow_search_warn_ms: default_slow_search_warn_ms(),
        }
    }

    /// Config whose voxel counts cover `[lower, upper)` at `resolution`,
    /// rounding partial voxels up.
    pub fn from_bounds(resolution: f64, lower: WorldPoint, upper: WorldPoint) -> Self {
        let count = |l: f64, u: f64| {
            // Shave a hair off so 5.0000000001 voxels does not become 6.
            let n = ((u - l) / resolution - 1e-9).ceil();
            if n.is_finite() && n > 0.0 { n as usize } else { 0 }
        };
        let counts = [
            count(lower.x, upper.x),
            count(lower.y, upper.y),
            count(lower.z, upper.z),
        ];
        Self::new(resolution, lower, upper, counts)
    }

    /// Check the geometry and build the coordinate mapping it describes.
    pub fn validate(&self) -> Result<GridIndexSpace, MapError> {
        GridIndexSpace::new(
            self.resolution,
            self.lower_bound,
            self.upper_bound,
            self.voxel_counts,
        )
    }

    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
