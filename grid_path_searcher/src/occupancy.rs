// Dense boolean occupancy grid.
//
// Stored as a flat `Vec<bool>` keyed by the same offset as the node store
// (`x * (Y * Z) + y * Z + z`). A voxel that was never marked is free.
//
// Boundary contract: `mark_obstacle()` drops world points outside the map
// box instead of clamping them, and both `is_occupied()` and `is_free()`
// answer `false` for indices outside the grid.
//
// Every mutation bumps `generation()`; the search engine compares it against
// the generation recorded at its last success to refuse stale path reads.
//
// See also: `grid.rs` for the coordinate mapping, `search.rs` for the
// neighbor filter built on `is_free()`.

use crate::grid::GridIndexSpace;
use crate::types::{VoxelIndex, WorldPoint};

/// Blocked/free flag per voxel.
#[derive(Clone, Debug)]
pub struct OccupancyMap {
    grid: GridIndexSpace,
    /// Flat storage: offset = x * (Y * Z) + y * Z + z.
    blocked: Vec<bool>,
    occupied: usize,
    generation: u64,
}

impl OccupancyMap {
    /// Create a map of the grid's shape with every voxel free.
    pub fn new(grid: GridIndexSpace) -> Self {
        Self {
            blocked: vec![false; grid.voxel_count()],
            grid,
            occupied: 0,
            generation: 0,
        }
    }

    pub fn grid(&self) -> &GridIndexSpace {
        &self.grid
    }

    /// Flag the voxel containing `p`. Returns `false` (and changes nothing)
    /// if `p` lies outside the map box.
    pub fn mark_obstacle(&mut self, p: WorldPoint) -> bool {
        if !self.grid.contains(p) {
            return false;
        }
        let index = self.grid.to_index(p);
        self.mark_voxel(index)
    }

    /// Mark every point; returns how many fell inside the map.
    pub fn mark_obstacles<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = WorldPoint>,
    {
        points
            .into_iter()
            .filter(|&p| self.mark_obstacle(p))
            .count()
    }

    /// Flag a voxel by index. No-op (returns `false`) for out-of-bounds.
    pub fn mark_voxel(&mut self, index: VoxelIndex) -> bool {
        let Some(id) = self.grid.node_id(index) else {
            return false;
        };
        if !self.blocked[id.0] {
            self.blocked[id.0] = true;
            self.occupied += 1;
        }
        self.generation += 1;
        true
    }

    /// Return every voxel to free.
    pub fn clear(&mut self) {
        self.blocked.fill(false);
        self.occupied = 0;
        self.generation += 1;
    }

    pub fn is_occupied(&self, index: VoxelIndex) -> bool {
        self.grid
            .node_id(index)
            .is_some_and(|id| self.blocked[id.0])
    }

    pub fn is_free(&self, index: VoxelIndex) -> bool {
        self.grid
            .node_id(index)
            .is_some_and(|id| !self.blocked[id.0])
    }

    /// Number of occupied voxels.
    pub fn obstacle_count(&self) -> usize {
        self.occupied
    }

    /// Mutation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
