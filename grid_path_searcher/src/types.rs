// Core types shared across the searcher.
//
// Defines the integer voxel index (`VoxelIndex`), the continuous world
// coordinate (`WorldPoint`), the flat node handle (`NodeId`), and the
// per-node search status (`NodeStatus`).
//
// `VoxelIndex` components are signed so that neighbor offsets can step off
// the edge of the grid; bounds checks live in `grid.rs`. `WorldPoint`
// serializes as a plain `[x, y, z]` array so scenario files stay compact.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the voxel grid. Each component is in voxel units.
///
/// Valid indices satisfy `0 <= c < size` on every axis, but out-of-range
/// values are representable so neighbor enumeration can produce them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelIndex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelIndex {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Index shifted by a per-axis offset.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Chebyshev (L-infinity) distance in voxels.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
            .max((self.z - other.z).unsigned_abs())
    }

    /// True if `other` is one of the 26 voxels surrounding `self`.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

impl fmt::Display for VoxelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A point in continuous world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Per-axis absolute differences `[dx, dy, dz]`.
    pub fn abs_diff(self, other: Self) -> [f64; 3] {
        [
            (self.x - other.x).abs(),
            (self.y - other.y).abs(),
            (self.z - other.z).abs(),
        ]
    }

    /// Straight-line distance between two points.
    pub fn distance(self, other: Self) -> f64 {
        let [dx, dy, dz] = self.abs_diff(other);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for WorldPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<WorldPoint> for [f64; 3] {
    fn from(p: WorldPoint) -> Self {
        p.to_array()
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Search node handles
// ---------------------------------------------------------------------------

/// Flat offset of a voxel: `x * (Y * Z) + y * Z + z`. Shared key between the
/// occupancy buffer and the node store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Where a node sits in the A* lifecycle: Unvisited -> Open -> Closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    #[default]
    Unvisited,
    /// Discovered and waiting in the open list.
    Open,
    /// Expanded.
    Closed,
}
