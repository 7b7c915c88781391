// Spatial types shared across the crate.
//
// `VoxelCoord` is the working coordinate type; `PosKey` is its bijective
// 64-bit packing, used as the opaque vertex key handed to the connectivity
// substrate. `MoveShape` enumerates the twelve relative offsets an agent can
// attempt from a standing position.
//
// See also: `bounds.rs` for the dense in-bounds index (a different, smaller
// mapping), `surface.rs` which feeds `PosKey`s to `strider_conn`.

use std::fmt;

use serde::{Deserialize, Serialize};

use strider_conn::NodeKey;

/// A position in the voxel grid, in voxel units.
///
/// Right-handed: X east, Y up, Z south. The Y axis is the vertical one —
/// every standability and headroom rule in this crate walks up and down Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate `dy` voxels above (negative: below).
    pub const fn up(self, dy: i32) -> Self {
        Self::new(self.x, self.y + dy, self.z)
    }

    /// The coordinate directly below.
    pub const fn down(self) -> Self {
        self.up(-1)
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The bijective 64-bit key for this coordinate.
    pub const fn key(self) -> PosKey {
        PosKey::pack(self)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Bijective 64-bit packing of a `VoxelCoord`: 26 bits of x, 26 of z, 12 of
/// y, each a two's-complement field. Round-trips exactly for |x|, |z| up to
/// 2^25 and |y| up to 2^11, far beyond any configurable bounds. Opaque,
/// orderable, and hashable — the substrate never looks inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PosKey(u64);

impl PosKey {
    const X_MASK: u64 = (1 << 26) - 1;
    const Y_MASK: u64 = (1 << 12) - 1;
    const Z_MASK: u64 = (1 << 26) - 1;

    const fn pack(coord: VoxelCoord) -> Self {
        let x = (coord.x as u64) & Self::X_MASK;
        let y = (coord.y as u64) & Self::Y_MASK;
        let z = (coord.z as u64) & Self::Z_MASK;
        Self((x << 38) | (z << 12) | y)
    }

    /// Recover the coordinate this key was packed from.
    pub const fn coord(self) -> VoxelCoord {
        // Arithmetic shifts sign-extend each field.
        let x = (self.0 as i64 >> 38) as i32;
        let z = (((self.0 << 26) as i64) >> 38) as i32;
        let y = (((self.0 << 52) as i64) >> 52) as i32;
        VoxelCoord::new(x, y, z)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<PosKey> for NodeKey {
    fn from(key: PosKey) -> Self {
        Self(key.0)
    }
}

/// One of the twelve relative offsets an agent can attempt from a standing
/// position: the four horizontal directions, each descending, level, or
/// ascending one voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveShape {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl MoveShape {
    const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }

    pub const fn is_ascend(self) -> bool {
        self.dy == 1
    }

    pub const fn is_descend(self) -> bool {
        self.dy == -1
    }
}

/// All twelve move shapes, descending moves first, then level, then ascending.
pub const MOVE_SHAPES: [MoveShape; 12] = [
    MoveShape::new(1, -1, 0),
    MoveShape::new(-1, -1, 0),
    MoveShape::new(0, -1, 1),
    MoveShape::new(0, -1, -1),
    MoveShape::new(1, 0, 0),
    MoveShape::new(-1, 0, 0),
    MoveShape::new(0, 0, 1),
    MoveShape::new(0, 0, -1),
    MoveShape::new(1, 1, 0),
    MoveShape::new(-1, 1, 0),
    MoveShape::new(0, 1, 1),
    MoveShape::new(0, 1, -1),
];
