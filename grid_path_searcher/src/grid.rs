// Mapping between continuous world coordinates and voxel indices.
//
// The workspace is the axis-aligned box `[lower, upper)` cut into
// `size_x * size_y * size_z` cubes of edge `resolution`. A voxel's flat
// offset is `x * (Y * Z) + y * Z + z`; the occupancy buffer and the node
// store both key on it, so the two stay in 1:1 correspondence.
//
// `to_index()` never fails: coordinates outside the map clamp to the nearest
// boundary voxel. Callers that need strict containment use `contains()`.
//
// See also: `occupancy.rs` (drops, rather than clamps, out-of-bounds
// obstacles), `node_store.rs` (one node per flat offset).

use crate::error::MapError;
use crate::types::{NodeId, VoxelIndex, WorldPoint};

/// Bidirectional world <-> voxel mapping with bounds clamping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridIndexSpace {
    resolution: f64,
    inv_resolution: f64,
    lower: WorldPoint,
    upper: WorldPoint,
    size: [usize; 3],
}

impl GridIndexSpace {
    /// Validate and build the mapping. `size` is the voxel count per axis.
    pub fn new(
        resolution: f64,
        lower: WorldPoint,
        upper: WorldPoint,
        size: [usize; 3],
    ) -> Result<Self, MapError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(MapError::InvalidResolution(resolution));
        }
        let [x, y, z] = size;
        if size.contains(&0) {
            return Err(MapError::EmptyAxis { x, y, z });
        }
        let axis_limit = i32::MAX as usize;
        let total = x.checked_mul(y).and_then(|xy| xy.checked_mul(z));
        if total.is_none() || size.iter().any(|&n| n > axis_limit) {
            return Err(MapError::TooManyVoxels { x, y, z });
        }
        for ((axis, l), u) in ['x', 'y', 'z']
            .into_iter()
            .zip(lower.to_array())
            .zip(upper.to_array())
        {
            if l.is_nan() || u.is_nan() || l >= u {
                return Err(MapError::InvertedBounds {
                    axis,
                    lower: l,
                    upper: u,
                });
            }
        }

        Ok(Self {
            resolution,
            inv_resolution: 1.0 / resolution,
            lower,
            upper,
            size,
        })
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn lower(&self) -> WorldPoint {
        self.lower
    }

    pub fn upper(&self) -> WorldPoint {
        self.upper
    }

    /// Voxel count along x, y, z.
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Total number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    /// Voxel enclosing `p`, clamped into the grid on every axis.
    pub fn to_index(&self, p: WorldPoint) -> VoxelIndex {
        VoxelIndex::new(
            self.axis_index(p.x, self.lower.x, self.size[0]),
            self.axis_index(p.y, self.lower.y, self.size[1]),
            self.axis_index(p.z, self.lower.z, self.size[2]),
        )
    }

    fn axis_index(&self, coord: f64, lower: f64, size: usize) -> i32 {
        let raw = ((coord - lower) * self.inv_resolution).floor();
        // NaN survives the clamp and casts to 0.
        raw.clamp(0.0, (size - 1) as f64) as i32
    }

    /// Center of the voxel at `index`. Not bounds-checked.
    pub fn to_world(&self, index: VoxelIndex) -> WorldPoint {
        WorldPoint::new(
            (f64::from(index.x) + 0.5) * self.resolution + self.lower.x,
            (f64::from(index.y) + 0.5) * self.resolution + self.lower.y,
            (f64::from(index.z) + 0.5) * self.resolution + self.lower.z,
        )
    }

    /// Snap a point to the center of its (clamped) voxel.
    pub fn round(&self, p: WorldPoint) -> WorldPoint {
        self.to_world(self.to_index(p))
    }

    /// Whether `p` lies in the half-open box `[lower, upper)`.
    pub fn contains(&self, p: WorldPoint) -> bool {
        p.x >= self.lower.x
            && p.y >= self.lower.y
            && p.z >= self.lower.z
            && p.x < self.upper.x
            && p.y < self.upper.y
            && p.z < self.upper.z
    }

    /// Check whether an index is within the grid.
    pub fn in_bounds(&self, index: VoxelIndex) -> bool {
        index.x >= 0
            && index.y >= 0
            && index.z >= 0
            && (index.x as usize) < self.size[0]
            && (index.y as usize) < self.size[1]
            && (index.z as usize) < self.size[2]
    }

    /// Flat offset of an index. Returns `None` if out of bounds.
    pub fn node_id(&self, index: VoxelIndex) -> Option<NodeId> {
        if self.in_bounds(index) {
            let [_, sy, sz] = self.size;
            let (x, y, z) = (index.x as usize, index.y as usize, index.z as usize);
            Some(NodeId(x * sy * sz + y * sz + z))
        } else {
            None
        }
    }

    /// Inverse of `node_id()`.
    pub fn index_of(&self, id: NodeId) -> VoxelIndex {
        let [_, sy, sz] = self.size;
        let x = id.0 / (sy * sz);
        let y = (id.0 / sz) % sy;
        let z = id.0 % sz;
        VoxelIndex::new(x as i32, y as i32, z as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn unit_grid(n: usize) -> GridIndexSpace {
        let upper = n as f64;
        GridIndexSpace::new(
            1.0,
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(upper, upper, upper),
            [n, n, n],
        )
        .unwrap()
    }

    fn offset_grid() -> GridIndexSpace {
        GridIndexSpace::new(
            0.25,
            WorldPoint::new(-2.0, -1.0, 0.5),
            WorldPoint::new(3.0, 2.0, 3.0),
            [20, 12, 10],
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_geometry() {
        let lo = WorldPoint::new(0.0, 0.0, 0.0);
        let hi = WorldPoint::new(1.0, 1.0, 1.0);
        assert!(matches!(
            GridIndexSpace::new(0.0, lo, hi, [1, 1, 1]),
            Err(MapError::InvalidResolution(_))
        ));
        assert!(matches!(
            GridIndexSpace::new(f64::NAN, lo, hi, [1, 1, 1]),
            Err(MapError::InvalidResolution(_))
        ));
        assert!(matches!(
            GridIndexSpace::new(1.0, lo, hi, [1, 0, 1]),
            Err(MapError::EmptyAxis { .. })
        ));
        assert!(matches!(
            GridIndexSpace::new(1.0, hi, lo, [1, 1, 1]),
            Err(MapError::InvertedBounds { axis: 'x', .. })
        ));
        assert!(matches!(
            GridIndexSpace::new(1.0, lo, hi, [usize::MAX, 2, 2]),
            Err(MapError::TooManyVoxels { .. })
        ));
    }

    #[test]
    fn to_index_floors_inside_bounds() {
        let grid = unit_grid(5);
        assert_eq!(grid.to_index(WorldPoint::new(0.0, 0.0, 0.0)), VoxelIndex::new(0, 0, 0));
        assert_eq!(grid.to_index(WorldPoint::new(0.99, 1.0, 4.5)), VoxelIndex::new(0, 1, 4));
    }

    #[test]
    fn to_index_clamps_out_of_range() {
        let grid = unit_grid(5);
        assert_eq!(
            grid.to_index(WorldPoint::new(-10.0, 2.5, 100.0)),
            VoxelIndex::new(0, 2, 4)
        );
        // The upper face itself belongs to no voxel and clamps to the last one.
        assert_eq!(grid.to_index(WorldPoint::new(5.0, 5.0, 5.0)), VoxelIndex::new(4, 4, 4));
        assert_eq!(grid.to_index(WorldPoint::new(f64::NAN, 1.5, 1.5)).x, 0);
    }

    #[test]
    fn to_world_is_voxel_center() {
        let grid = offset_grid();
        let c = grid.to_world(VoxelIndex::new(0, 0, 0));
        assert_relative_eq!(c.x, -1.875);
        assert_relative_eq!(c.y, -0.875);
        assert_relative_eq!(c.z, 0.625);
    }

    #[test]
    fn contains_is_half_open() {
        let grid = unit_grid(5);
        assert!(grid.contains(WorldPoint::new(0.0, 0.0, 0.0)));
        assert!(grid.contains(WorldPoint::new(4.999, 4.999, 4.999)));
        assert!(!grid.contains(WorldPoint::new(5.0, 1.0, 1.0)));
        assert!(!grid.contains(WorldPoint::new(1.0, -0.001, 1.0)));
    }

    #[test]
    fn flat_offset_layout_is_x_major() {
        let grid = GridIndexSpace::new(
            1.0,
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(4.0, 3.0, 2.0),
            [4, 3, 2],
        )
        .unwrap();
        assert_eq!(grid.node_id(VoxelIndex::new(0, 0, 1)), Some(NodeId(1)));
        assert_eq!(grid.node_id(VoxelIndex::new(0, 1, 0)), Some(NodeId(2)));
        assert_eq!(grid.node_id(VoxelIndex::new(1, 0, 0)), Some(NodeId(6)));
        assert_eq!(grid.node_id(VoxelIndex::new(3, 2, 1)), Some(NodeId(23)));
        assert_eq!(grid.node_id(VoxelIndex::new(4, 0, 0)), None);
        assert_eq!(grid.node_id(VoxelIndex::new(0, -1, 0)), None);
        for flat in 0..grid.voxel_count() {
            assert_eq!(grid.node_id(grid.index_of(NodeId(flat))), Some(NodeId(flat)));
        }
    }

    #[test]
    fn lower_faces_belong_to_their_voxel() {
        // Corners are exact multiples of 0.25, so no rounding is involved.
        let grid = offset_grid();
        let res = grid.resolution();
        let lo = grid.lower();
        let [sx, sy, sz] = grid.size();
        for ix in 0..sx as i32 {
            for iy in 0..sy as i32 {
                for iz in 0..sz as i32 {
                    let corner = WorldPoint::new(
                        lo.x + f64::from(ix) * res,
                        lo.y + f64::from(iy) * res,
                        lo.z + f64::from(iz) * res,
                    );
                    assert!(grid.contains(corner));
                    assert_eq!(grid.to_index(corner), VoxelIndex::new(ix, iy, iz));
                }
            }
        }
    }

    proptest! {
        #[test]
        fn round_trip_is_idempotent(
            x in -5.0f64..8.0,
            y in -5.0f64..8.0,
            z in -5.0f64..8.0,
        ) {
            let grid = offset_grid();
            let once = grid.round(WorldPoint::new(x, y, z));
            let twice = grid.round(once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn points_inside_a_voxel_resolve_to_it(
            ix in 0i32..20,
            iy in 0i32..12,
            iz in 0i32..10,
            fx in 0.01f64..0.99,
            fy in 0.01f64..0.99,
            fz in 0.01f64..0.99,
        ) {
            let grid = offset_grid();
            let res = grid.resolution();
            let lo = grid.lower();
            let p = WorldPoint::new(
                lo.x + (f64::from(ix) + fx) * res,
                lo.y + (f64::from(iy) + fy) * res,
                lo.z + (f64::from(iz) + fz) * res,
            );
            prop_assert_eq!(grid.to_index(p), VoxelIndex::new(ix, iy, iz));
        }
    }
}
