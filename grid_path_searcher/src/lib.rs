// grid_path_searcher: A* path search over a 3D voxel occupancy grid.
//
// A host (navigation stack, simulator, the `plan` CLI) initializes a map
// once, streams obstacle points into it, and asks for collision-free paths
// between world points. Paths are sequences of voxel centers, 26-connected,
// with Euclidean step costs.
//
// Module overview:
// - `types.rs`:      VoxelIndex, WorldPoint, NodeId, NodeStatus.
// - `grid.rs`:       GridIndexSpace: world <-> voxel mapping with clamping.
// - `occupancy.rs`:  OccupancyMap: dense blocked/free flags.
// - `node_store.rs`: SearchNode / NodeStore: per-voxel A* bookkeeping.
// - `map_state.rs`:  MapState: occupancy + nodes with init/reset lifecycle.
// - `heuristic.rs`:  Heuristic selector (Euclidean, Manhattan, Diagonal,
//                    tie-broken Euclidean, Dijkstra).
// - `open_list.rs`:  Indexed binary min-heap with decrease-key.
// - `search.rs`:     SearchEngine: the A* loop and its state machine.
// - `path.rs`:       Path reconstruction from parent links, path metrics.
// - `config.rs`:     PlannerConfig: JSON-loadable geometry and tunables.
// - `error.rs`:      MapError, PathError, ConfigError.
//
// Logging goes through the `log` facade; this crate never installs a logger.
//
// Single-threaded and synchronous. A `SearchEngine` is not shared between
// threads; use one engine per thread.

pub mod config;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod map_state;
pub mod node_store;
pub mod occupancy;
pub mod open_list;
pub mod path;
pub mod search;
pub mod types;

pub use config::PlannerConfig;
pub use error::{ConfigError, MapError, PathError};
pub use heuristic::Heuristic;
pub use search::{ClosedNodePolicy, SearchEngine, SearchOutcome, SearchState, SearchStats};
pub use types::{NodeId, NodeStatus, VoxelIndex, WorldPoint};
