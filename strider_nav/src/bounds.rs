// Fixed cuboid bounds with a dense linear index.
//
// `CuboidBounds` owns the mapping between a 3D coordinate and its slot in a
// flat storage array (x inner, z mid, y outer), and classifies coordinates
// as in-range or out-of-range. Out-of-range is not an error anywhere in
// this crate — callers decide what it means (the surface treats it as open
// air).

use serde::{Deserialize, Serialize};

use crate::types::VoxelCoord;

/// An axis-aligned cuboid of fixed dimensions, immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuboidBounds {
    size_x: u32,
    size_y: u32,
    size_z: u32,
}

impl CuboidBounds {
    /// Create bounds of the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        assert!(
            size_x >= 1 && size_y >= 1 && size_z >= 1,
            "bounds dimensions must be at least 1"
        );
        Self {
            size_x,
            size_y,
            size_z,
        }
    }

    pub const fn size_x(&self) -> u32 {
        self.size_x
    }

    pub const fn size_y(&self) -> u32 {
        self.size_y
    }

    pub const fn size_z(&self) -> u32 {
        self.size_z
    }

    /// Total number of voxels in the cuboid.
    pub const fn volume(&self) -> usize {
        self.size_x as usize * self.size_y as usize * self.size_z as usize
    }

    /// Whether a coordinate lies inside the cuboid.
    pub const fn in_range(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    /// The dense linear index of a coordinate: x inner, z mid, y outer.
    /// `None` for out-of-range coordinates.
    pub fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if !self.in_range(coord) {
            return None;
        }
        let x = coord.x as usize;
        let y = coord.y as usize;
        let z = coord.z as usize;
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        Some(x + z * sx + y * sx * sz)
    }

    /// The coordinate for a dense linear index. `None` past the volume.
    pub fn coord(&self, index: usize) -> Option<VoxelCoord> {
        if index >= self.volume() {
            return None;
        }
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        let x = index % sx;
        let z = (index / sx) % sz;
        let y = index / (sx * sz);
        Some(VoxelCoord::new(x as i32, y as i32, z as i32))
    }
}
