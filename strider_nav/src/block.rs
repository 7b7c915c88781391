// Per-block collision attributes, as consumed by the physics classifier.
//
// A `BlockAttrs` record describes the one slice of a block's collision
// geometry that matters for standing and walking: whether it collides at
// all, how tall its collision box is, and whether its top face is walkable
// across the whole voxel footprint. Records are interned by block type in
// the integration layer and shared across positions; this crate only ever
// copies them.
//
// The collision height is only meaningful while `collides` is true — the
// accessor enforces that in debug builds rather than inventing a value.

use serde::{Deserialize, Serialize};

use crate::blip::{Blips, FULL_BLOCK};

/// Collision attributes of one block state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAttrs {
    collides: bool,
    collision_height_blips: Blips,
    fully_walkable_top: bool,
}

impl BlockAttrs {
    /// The record held by untouched positions, and by everything outside the
    /// surface bounds.
    pub const AIR: Self = Self {
        collides: false,
        collision_height_blips: 0,
        fully_walkable_top: true,
    };

    /// The synthetic solid substituted when a caller places a block without
    /// naming a real type: full height, fully walkable on top.
    pub const PLACEHOLDER: Self = Self::solid();

    /// A full-height, fully walkable solid.
    pub const fn solid() -> Self {
        Self {
            collides: true,
            collision_height_blips: FULL_BLOCK,
            fully_walkable_top: true,
        }
    }

    /// A colliding block with a fully walkable top at `height` blips —
    /// slabs, snow layers, soul-sand-like blocks, and over-tall walkable
    /// shapes, depending on the height.
    pub const fn partial(height: Blips) -> Self {
        Self {
            collides: true,
            collision_height_blips: height,
            fully_walkable_top: true,
        }
    }

    /// A colliding block whose solid column is narrower than the voxel, so
    /// its top cannot be stood on — fences, walls, bars. Typically taller
    /// than a full block.
    pub const fn barrier(height: Blips) -> Self {
        Self {
            collides: true,
            collision_height_blips: height,
            fully_walkable_top: false,
        }
    }

    /// Whether this block collides with the agent at all.
    pub const fn collides(self) -> bool {
        self.collides
    }

    /// Height of the collision box, in blips. Only meaningful for colliding
    /// blocks; callers must check `collides()` first.
    pub fn collision_height_blips(self) -> Blips {
        debug_assert!(self.collides, "collision height queried on a non-colliding block");
        self.collision_height_blips
    }

    /// Whether an agent resting exactly on top of this block's collision box
    /// experiences no lateral obstruction from it.
    pub const fn fully_walkable_top(self) -> bool {
        self.fully_walkable_top
    }
}

impl Default for BlockAttrs {
    fn default() -> Self {
        Self::AIR
    }
}
