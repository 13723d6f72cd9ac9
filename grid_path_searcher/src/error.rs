// Error types for map setup, path queries, and config loading.
//
// Out-of-bounds coordinates and exhausted searches are not errors: the
// former are clamped or dropped (see `grid.rs`, `occupancy.rs`), the latter
// is reported as `SearchOutcome::Exhausted` (see `search.rs`).

use std::path::PathBuf;

/// Invalid map geometry passed to `initialize` or found in a config.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MapError {
    /// The voxel edge length must be finite and positive.
    #[error("resolution must be finite and positive, got {0}")]
    InvalidResolution(f64),

    /// Every axis needs at least one voxel.
    #[error("voxel counts must all be non-zero, got {x}x{y}x{z}")]
    EmptyAxis { x: usize, y: usize, z: usize },

    /// The lower corner must sit strictly below the upper corner.
    #[error("lower bound {lower} is not below upper bound {upper} on axis {axis}")]
    InvertedBounds { axis: char, lower: f64, upper: f64 },

    /// `x * y * z` does not fit in memory addressing.
    #[error("voxel count {x}x{y}x{z} overflows")]
    TooManyVoxels { x: usize, y: usize, z: usize },
}

/// Reading a path when there is no valid terminal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// No search has succeeded, or the most recent one was exhausted.
    #[error("no successful search to reconstruct a path from")]
    NoSuccessfulSearch,

    /// Obstacles changed after the last successful search.
    #[error("the obstacle map changed after the last successful search")]
    MapChanged,
}

/// Failure loading a `PlannerConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid map geometry: {0}")]
    Map(#[from] MapError),
}
