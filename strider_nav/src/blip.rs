// Fixed-point vertical unit shared by every height comparison.
//
// One block of height is FULL_BLOCK blips; all heights, allowances, and
// support levels in this crate are integer blip counts. Keeping the unit
// integral makes every physics comparison exact — there is no float epsilon
// anywhere in the classifier.

/// A count of blips. Sixteen blips make one block of height.
pub type Blips = i32;

/// One full block of height.
pub const FULL_BLOCK: Blips = 16;

/// Half a block — how far the agent steps up without jumping.
pub const HALF_BLOCK: Blips = FULL_BLOCK / 2;

/// Two full blocks.
pub const TWO_BLOCKS: Blips = 2 * FULL_BLOCK;

/// How far above its feet the agent reaches by jumping (1.25 blocks).
/// Strictly greater than the step allowance.
pub const JUMP: Blips = 20;

/// The agent's height, rounded up (1.8 blocks -> 29 blips). The overestimate
/// makes headroom tests conservative.
pub const PLAYER_HEIGHT: Blips = 29;

// The travel classifier assumes the agent is between 1.5 and 2 blocks tall:
// standing low in a voxel it fits under a two-block ceiling, standing high
// it protrudes into the third voxel.
const _: () = assert!(PLAYER_HEIGHT < TWO_BLOCKS);
const _: () = assert!(PLAYER_HEIGHT + HALF_BLOCK > TWO_BLOCKS);

// The highest possible two-voxel-up landing must not itself protrude into a
// fourth voxel layer, or the classifier would need an extra clearance row
// above the one it consults.
const _: () = {
    let max_feet = FULL_BLOCK - 1;
    let max_two_up_landing = max_feet + JUMP - TWO_BLOCKS;
    assert!(max_two_up_landing <= TWO_BLOCKS - PLAYER_HEIGHT);
};
