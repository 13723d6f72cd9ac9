// Path reconstruction and path metrics.
//
// `reconstruct()` follows `parent` links from the terminal node back to the
// start (the one node with no parent) and reverses the result. It is only
// reachable through `SearchEngine::get_path()`, which checks that the last
// search succeeded on the current obstacle map.
//
// Parent links only ever point at nodes with a strictly smaller g-score at
// the time they are written, so the walk cannot cycle.

use crate::grid::GridIndexSpace;
use crate::node_store::NodeStore;
use crate::types::{NodeId, WorldPoint};

/// Voxel centers from the start node to `terminal`, inclusive.
pub fn reconstruct(nodes: &NodeStore, terminal: NodeId) -> Vec<WorldPoint> {
    let mut path: Vec<WorldPoint> =
        std::iter::successors(Some(terminal), |&id| nodes.node(id).parent)
            .map(|id| nodes.node(id).center)
            .collect();
    path.reverse();
    path
}

/// Sum of straight-line distances between consecutive waypoints.
pub fn path_length(path: &[WorldPoint]) -> f64 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Whether every consecutive pair of waypoints sits in 26-adjacent voxels.
pub fn is_connected(grid: &GridIndexSpace, path: &[WorldPoint]) -> bool {
    path.windows(2)
        .all(|w| grid.to_index(w[0]).is_adjacent(grid.to_index(w[1])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoxelIndex;
    use approx::assert_relative_eq;

    fn grid() -> GridIndexSpace {
        GridIndexSpace::new(
            1.0,
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(4.0, 4.0, 4.0),
            [4, 4, 4],
        )
        .unwrap()
    }

    #[test]
    fn walks_parents_back_to_the_root() {
        let grid = grid();
        let mut nodes = NodeStore::new(&grid);
        let chain: Vec<NodeId> = [(0, 0, 0), (1, 1, 0), (2, 1, 0), (3, 2, 1)]
            .into_iter()
            .map(|(x, y, z)| grid.node_id(VoxelIndex::new(x, y, z)).unwrap())
            .collect();
        for pair in chain.windows(2) {
            nodes.node_mut(pair[1]).parent = Some(pair[0]);
        }

        let path = reconstruct(&nodes, chain[3]);
        assert_eq!(
            path,
            vec![
                WorldPoint::new(0.5, 0.5, 0.5),
                WorldPoint::new(1.5, 1.5, 0.5),
                WorldPoint::new(2.5, 1.5, 0.5),
                WorldPoint::new(3.5, 2.5, 1.5),
            ]
        );
        assert!(is_connected(&grid, &path));
        assert_relative_eq!(path_length(&path), 2f64.sqrt() + 1.0 + 3f64.sqrt());
    }

    #[test]
    fn root_alone_is_a_single_point() {
        let grid = grid();
        let nodes = NodeStore::new(&grid);
        let path = reconstruct(&nodes, NodeId(0));
        assert_eq!(path.len(), 1);
        assert_eq!(path_length(&path), 0.0);
    }

    #[test]
    fn gaps_are_not_connected() {
        let grid = grid();
        let path = [WorldPoint::new(0.5, 0.5, 0.5), WorldPoint::new(2.5, 0.5, 0.5)];
        assert!(!is_connected(&grid, &path));
    }
}
