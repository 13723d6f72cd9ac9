// Owned map state handed to the search engine.
//
// Bundles the occupancy grid and the node store, both allocated from the
// same `GridIndexSpace` so their flat offsets line up. Built once by
// `init()`; `reset()` clears search bookkeeping without touching obstacles.

use crate::error::MapError;
use crate::grid::GridIndexSpace;
use crate::node_store::NodeStore;
use crate::occupancy::OccupancyMap;
use crate::types::WorldPoint;

/// Obstacles plus per-voxel search state for one map.
#[derive(Clone, Debug)]
pub struct MapState {
    occupancy: OccupancyMap,
    nodes: NodeStore,
}

impl MapState {
    /// Allocate a free map of `size` voxels spanning `[lower, upper)`.
    pub fn init(
        resolution: f64,
        lower: WorldPoint,
        upper: WorldPoint,
        size: [usize; 3],
    ) -> Result<Self, MapError> {
        let grid = GridIndexSpace::new(resolution, lower, upper, size)?;
        Ok(Self::from_grid(grid))
    }

    pub fn from_grid(grid: GridIndexSpace) -> Self {
        Self {
            nodes: NodeStore::new(&grid),
            occupancy: OccupancyMap::new(grid),
        }
    }

    /// Return all nodes to Unvisited. Obstacles are kept.
    pub fn reset(&mut self) {
        self.nodes.reset();
    }

    pub fn grid(&self) -> &GridIndexSpace {
        self.occupancy.grid()
    }

    pub fn occupancy(&self) -> &OccupancyMap {
        &self.occupancy
    }

    pub fn occupancy_mut(&mut self) -> &mut OccupancyMap {
        &mut self.occupancy
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeStore {
        &mut self.nodes
    }
}
