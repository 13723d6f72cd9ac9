// Per-voxel A* bookkeeping.
//
// One `SearchNode` per voxel, allocated once when the map is initialized and
// kept for the map's lifetime. Nodes live in a flat `Vec` addressed by
// `NodeId` (the same flat offset the occupancy grid uses); parent links are
// `Option<NodeId>` rather than references, so the store owns everything and
// reconstruction just walks indices.
//
// `reset()` returns every node to {Unvisited, +inf, +inf, no parent}. The
// engine calls it unconditionally at the start of each search.

use crate::grid::GridIndexSpace;
use crate::types::{NodeId, NodeStatus, VoxelIndex, WorldPoint};

/// Search state for a single voxel.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchNode {
    pub index: VoxelIndex,
    /// Center of the voxel. Fixed for the map's lifetime.
    pub center: WorldPoint,
    pub status: NodeStatus,
    /// Cost of the best known path from the start.
    pub g_score: f64,
    /// `g_score` plus the heuristic estimate to the goal.
    pub f_score: f64,
    pub parent: Option<NodeId>,
}

impl SearchNode {
    fn new(index: VoxelIndex, center: WorldPoint) -> Self {
        Self {
            index,
            center,
            status: NodeStatus::Unvisited,
            g_score: f64::INFINITY,
            f_score: f64::INFINITY,
            parent: None,
        }
    }

    fn reset(&mut self) {
        self.status = NodeStatus::Unvisited;
        self.g_score = f64::INFINITY;
        self.f_score = f64::INFINITY;
        self.parent = None;
    }
}

/// Dense array of search nodes, same shape as the occupancy grid.
#[derive(Clone, Debug)]
pub struct NodeStore {
    nodes: Vec<SearchNode>,
}

impl NodeStore {
    /// Allocate one unvisited node per voxel of `grid`.
    pub fn new(grid: &GridIndexSpace) -> Self {
        let nodes = (0..grid.voxel_count())
            .map(|flat| {
                let index = grid.index_of(NodeId(flat));
                SearchNode::new(index, grid.to_world(index))
            })
            .collect();
        Self { nodes }
    }

    /// Restore every node to its unvisited defaults.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics if `id` did not come from the grid this store was built for.
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(flat, node)| (NodeId(flat), node))
    }

    /// Centers of all nodes currently Closed, in flat-offset order.
    pub fn closed_centers(&self) -> Vec<WorldPoint> {
        self.nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Closed)
            .map(|n| n.center)
            .collect()
    }
}
