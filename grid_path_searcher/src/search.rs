// A* search over the 26-connected voxel grid.
//
// `SearchEngine` owns the `MapState` (obstacles + per-voxel nodes) and the
// open list, and runs one A* pass per `search()` call:
//
//   Ready -> Running -> { Succeeded, Exhausted }
//
// Start and goal world points are clamped into the grid. The node store is
// reset on every call, so searches are independent of each other but not of
// the obstacles marked so far. Edge cost is the Euclidean distance between
// voxel centers (face step = resolution, edge diagonal = resolution * sqrt 2,
// corner diagonal = resolution * sqrt 3).
//
// A Closed node that is reached again more cheaply is a stale-score anomaly;
// with a consistent heuristic (Diagonal, Euclidean, Dijkstra) it only comes
// from floating-point rounding between equal-cost routes. `ClosedNodePolicy`
// picks the response. `KeepClosed` records the better scores in place but
// keeps the parent the node was expanded with, so the reconstructed path
// always sums to the reported cost. `Reopen` adopts the new parent and puts
// the node back on the open list. Both count the event in `SearchStats`.
//
// There is no expansion cap or deadline: a search runs until it reaches the
// goal or the open list empties. Slow searches are only logged.
//
// See also: `open_list.rs` for the frontier, `heuristic.rs` for the
// estimators, `path.rs` for walking parent links.
//
// Not reentrant: one engine per thread, and obstacle updates must not
// interleave with a search (the `&mut self` receivers enforce both).

use crate::config::PlannerConfig;
use crate::error::{MapError, PathError};
use crate::grid::GridIndexSpace;
use crate::heuristic::Heuristic;
use crate::map_state::MapState;
use crate::open_list::OpenList;
use crate::path;
use crate::types::{NodeId, NodeStatus, VoxelIndex, WorldPoint};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::{Duration, Instant};

/// Lifecycle of the most recent search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// No search has run yet.
    Ready,
    Running,
    Succeeded,
    Exhausted,
}

/// Result of one `search()` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum SearchOutcome {
    /// The goal was expanded; `get_path()` is valid.
    Found,
    /// The open list emptied first, or an endpoint is occupied.
    Exhausted,
}

impl SearchOutcome {
    pub fn is_found(self) -> bool {
        self == SearchOutcome::Found
    }
}

/// Response to a cheaper path into an already-expanded node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedNodePolicy {
    /// Patch scores in place; keep the expansion-time parent and never
    /// re-expand.
    #[default]
    KeepClosed,
    /// Take the new parent, mark the node Open again and requeue it.
    Reopen,
}

/// Counters for the most recent search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Nodes popped from the open list.
    pub expansions: usize,
    /// Closed nodes whose g-score later improved.
    pub stale_corrections: usize,
    pub elapsed: Duration,
    /// Terminal g-score on success.
    pub path_cost: Option<f64>,
}

/// Up to 26 `(neighbor, edge cost)` pairs.
type Successors = SmallVec<[(NodeId, f64); 26]>;

/// A* engine bound to one map.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    map: MapState,
    open: OpenList,
    state: SearchState,
    terminal: Option<NodeId>,
    /// Occupancy generation at the last success.
    success_generation: u64,
    closed_policy: ClosedNodePolicy,
    default_heuristic: Heuristic,
    slow_search_warn: Duration,
    stats: SearchStats,
}

impl SearchEngine {
    /// Allocate a free map of `voxel_counts` voxels spanning
    /// `[lower, upper)`. Geometry is fixed afterwards.
    pub fn initialize(
        resolution: f64,
        lower: WorldPoint,
        upper: WorldPoint,
        voxel_counts: [usize; 3],
    ) -> Result<Self, MapError> {
        Self::from_config(&PlannerConfig::new(resolution, lower, upper, voxel_counts))
    }

    /// Build an engine from a full config, tunables included.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, MapError> {
        let grid = config.validate()?;
        let map = MapState::from_grid(grid);
        debug!(
            "[A*] map initialized: {}x{}x{} voxels at resolution {}",
            grid.size()[0],
            grid.size()[1],
            grid.size()[2],
            grid.resolution()
        );
        Ok(Self {
            open: OpenList::new(map.nodes().len()),
            map,
            state: SearchState::Ready,
            terminal: None,
            success_generation: 0,
            closed_policy: config.closed_policy,
            default_heuristic: config.heuristic,
            slow_search_warn: Duration::from_millis(config.slow_search_warn_ms),
            stats: SearchStats::default(),
        })
    }

    pub fn with_closed_policy(mut self, policy: ClosedNodePolicy) -> Self {
        self.closed_policy = policy;
        self
    }

    pub fn closed_policy(&self) -> ClosedNodePolicy {
        self.closed_policy
    }

    /// Selector from the config, for hosts that do not pick one per query.
    pub fn default_heuristic(&self) -> Heuristic {
        self.default_heuristic
    }

    pub fn grid(&self) -> &GridIndexSpace {
        self.map.grid()
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Counters from the most recent search.
    pub fn last_stats(&self) -> &SearchStats {
        &self.stats
    }

    // -----------------------------------------------------------------------
    // Obstacles
    // -----------------------------------------------------------------------

    /// Mark the voxel containing `p` as blocked. Points outside the map box
    /// are dropped; returns whether the point was accepted.
    pub fn mark_obstacle(&mut self, p: WorldPoint) -> bool {
        self.map.occupancy_mut().mark_obstacle(p)
    }

    /// Mark a batch of points; returns how many were inside the map.
    pub fn mark_obstacles<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = WorldPoint>,
    {
        let accepted = self.map.occupancy_mut().mark_obstacles(points);
        trace!("[A*] marked {accepted} obstacle points");
        accepted
    }

    /// Remove all obstacles.
    pub fn clear_obstacles(&mut self) {
        self.map.occupancy_mut().clear();
    }

    pub fn is_occupied(&self, index: VoxelIndex) -> bool {
        self.map.occupancy().is_occupied(index)
    }

    pub fn is_free(&self, index: VoxelIndex) -> bool {
        self.map.occupancy().is_free(index)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Run one A* pass from `start` to `goal` (world points, clamped into
    /// the grid).
    pub fn search(
        &mut self,
        start: WorldPoint,
        goal: WorldPoint,
        heuristic: Heuristic,
    ) -> SearchOutcome {
        let started = Instant::now();
        self.state = SearchState::Running;
        self.terminal = None;
        self.stats = SearchStats::default();

        let grid = *self.map.grid();
        let start_idx = grid.to_index(start);
        let goal_idx = grid.to_index(goal);
        debug!(
            "[A*] search {start} -> {goal} (voxels {start_idx} -> {goal_idx}, heuristic {heuristic})"
        );

        self.map.reset();
        self.open.clear();

        if self.is_occupied(start_idx) || self.is_occupied(goal_idx) {
            debug!("[A*] start or goal voxel is occupied");
            return self.finish(SearchOutcome::Exhausted, started);
        }
        // Both indices are clamped into the grid, so these always resolve.
        let (Some(start_id), Some(goal_id)) = (grid.node_id(start_idx), grid.node_id(goal_idx))
        else {
            return self.finish(SearchOutcome::Exhausted, started);
        };
        let goal_center = self.map.nodes().node(goal_id).center;

        {
            let node = self.map.nodes_mut().node_mut(start_id);
            node.g_score = 0.0;
            node.f_score = heuristic.evaluate(node.center, goal_center);
            node.status = NodeStatus::Open;
            let f = node.f_score;
            self.open.push(start_id, f);
        }

        while let Some((current, _)) = self.open.pop() {
            self.stats.expansions += 1;
            self.map.nodes_mut().node_mut(current).status = NodeStatus::Closed;

            if current == goal_id {
                self.terminal = Some(current);
                return self.finish(SearchOutcome::Found, started);
            }

            let current_g = self.map.nodes().node(current).g_score;
            for (neighbor, edge_cost) in self.successors(current) {
                self.relax(current, neighbor, current_g + edge_cost, heuristic, goal_center);
            }
        }

        self.finish(SearchOutcome::Exhausted, started)
    }

    /// Free voxels in the 3x3x3 block around `current`, with edge costs.
    fn successors(&self, current: NodeId) -> Successors {
        let nodes = self.map.nodes();
        let grid = self.map.grid();
        let here = nodes.node(current);
        let mut out = Successors::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let index = here.index.offset(dx, dy, dz);
                    if !self.map.occupancy().is_free(index) {
                        continue;
                    }
                    if let Some(id) = grid.node_id(index) {
                        out.push((id, here.center.distance(nodes.node(id).center)));
                    }
                }
            }
        }
        out
    }

    /// Offer `tentative_g` as a new cost-from-start for `neighbor`.
    fn relax(
        &mut self,
        current: NodeId,
        neighbor: NodeId,
        tentative_g: f64,
        heuristic: Heuristic,
        goal_center: WorldPoint,
    ) {
        let policy = self.closed_policy;
        let node = self.map.nodes_mut().node_mut(neighbor);
        match node.status {
            NodeStatus::Unvisited => {
                node.parent = Some(current);
                node.g_score = tentative_g;
                node.f_score = tentative_g + heuristic.evaluate(node.center, goal_center);
                node.status = NodeStatus::Open;
                let f = node.f_score;
                self.open.push(neighbor, f);
            }
            NodeStatus::Open => {
                if tentative_g < node.g_score {
                    node.parent = Some(current);
                    node.g_score = tentative_g;
                    node.f_score = tentative_g + heuristic.evaluate(node.center, goal_center);
                    let f = node.f_score;
                    // Re-keys the existing entry; no stale duplicate remains.
                    self.open.push(neighbor, f);
                }
            }
            NodeStatus::Closed => {
                if tentative_g < node.g_score {
                    debug!(
                        "[A*] closed node {} improved from {:.6} to {:.6}",
                        node.index, node.g_score, tentative_g
                    );
                    node.g_score = tentative_g;
                    node.f_score = tentative_g + heuristic.evaluate(node.center, goal_center);
                    // Descendants were scored through the old parent, so it
                    // only moves when the node gets expanded again.
                    if policy == ClosedNodePolicy::Reopen {
                        node.parent = Some(current);
                        node.status = NodeStatus::Open;
                        let f = node.f_score;
                        self.open.push(neighbor, f);
                    }
                    self.stats.stale_corrections += 1;
                }
            }
        }
    }

    fn finish(&mut self, outcome: SearchOutcome, started: Instant) -> SearchOutcome {
        let elapsed = started.elapsed();
        self.stats.elapsed = elapsed;
        let ms = elapsed.as_secs_f64() * 1000.0;
        match outcome {
            SearchOutcome::Found => {
                let cost = self
                    .terminal
                    .map(|id| self.map.nodes().node(id).g_score);
                self.stats.path_cost = cost;
                self.state = SearchState::Succeeded;
                self.success_generation = self.map.occupancy().generation();
                info!(
                    "[A*] success in {ms:.3} ms: {} expansions, path cost {:.4}",
                    self.stats.expansions,
                    cost.unwrap_or(f64::NAN)
                );
            }
            SearchOutcome::Exhausted => {
                self.state = SearchState::Exhausted;
                debug!(
                    "[A*] no path after {} expansions ({ms:.3} ms)",
                    self.stats.expansions
                );
            }
        }
        if self.stats.stale_corrections > 0 {
            debug!(
                "[A*] {} closed-node score corrections (policy {:?})",
                self.stats.stale_corrections, self.closed_policy
            );
        }
        if elapsed > self.slow_search_warn {
            warn!("[A*] search took {ms:.3} ms");
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    /// Terminal node of the last search, if it is still valid.
    fn terminal(&self) -> Result<NodeId, PathError> {
        let terminal = match (self.state, self.terminal) {
            (SearchState::Succeeded, Some(id)) => id,
            _ => return Err(PathError::NoSuccessfulSearch),
        };
        if self.map.occupancy().generation() != self.success_generation {
            return Err(PathError::MapChanged);
        }
        Ok(terminal)
    }

    /// Voxel centers from start to goal, inclusive.
    pub fn get_path(&self) -> Result<Vec<WorldPoint>, PathError> {
        let terminal = self.terminal()?;
        Ok(path::reconstruct(self.map.nodes(), terminal))
    }

    /// g-score of the goal node from the last successful search.
    pub fn path_cost(&self) -> Result<f64, PathError> {
        let terminal = self.terminal()?;
        Ok(self.map.nodes().node(terminal).g_score)
    }

    /// Centers of every voxel currently Closed.
    pub fn visited_nodes(&self) -> Vec<WorldPoint> {
        self.map.nodes().closed_centers()
    }
}
