// Standing and travel physics over block attribute records.
//
// Everything here is a pure function of up to nine `BlockAttrs` records; no
// state, no I/O. Two questions are answered:
// - `residency`/`support_height`: at what height (if any) does an agent rest
//   when its feet occupy a given voxel, considering that the block underneath
//   may protrude upward past a full block (fence-like shapes)?
// - `classify_travel`: what happens when the agent walks sideways into the
//   adjacent column — blocked, a step, a jump, or a fall?
//
// The travel decision is one long ordered branch chain, kept that way on
// purpose: the outcome depends jointly on all nine neighboring records, so
// there is no per-block dispatch that could express it. First match wins.
//
// Preconditions are `debug_assert!`s. A violation is a logic defect in the
// caller, aborts in debug builds, and is never silently corrected.
//
// See also: `surface.rs`, which uses `can_stand` to maintain the standable
// set, and `blip.rs` for the height constants.

use serde::{Deserialize, Serialize};

use crate::blip::{Blips, FULL_BLOCK, HALF_BLOCK, JUMP, PLAYER_HEIGHT, TWO_BLOCKS};
use crate::block::BlockAttrs;

/// How (or whether) an agent's feet can occupy a voxel, given the voxel's own
/// record (`within`) and the record underneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residency {
    /// The underneath block's collision box reaches at or above a full block
    /// and projects into this voxel; support height is its height minus one
    /// full block.
    UnderneathProtrudes,
    /// The within block itself provides the floor; support height is its own
    /// collision height.
    StandardWithin,
    /// The within block is a full-height solid — the agent would be inside it.
    Suffocating,
    /// Nothing underneath reaches this voxel.
    Floating,
    /// The underneath block is tall enough but not walkable on top (fences).
    PreventedByUnderneath,
    /// The within block is not walkable on top.
    PreventedByWithin,
}

impl Residency {
    /// Whether this residency provides real support.
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::UnderneathProtrudes | Self::StandardWithin)
    }
}

/// Classify how an agent's feet relate to the voxel `within`, given the block
/// `underneath` it.
///
/// Fence-like blocks force the two-record signature: a block taller than a
/// full block changes the residency of the voxel above it.
pub fn residency(underneath: BlockAttrs, within: BlockAttrs) -> Residency {
    if within.collides() {
        if underneath.collides()
            && underneath.collision_height_blips() - FULL_BLOCK > within.collision_height_blips()
        {
            // Strictly greater: at equal heights the within block's own top
            // is the surface (a slab resting level with a fence top).
            if !underneath.fully_walkable_top() {
                return Residency::PreventedByUnderneath;
            }
            return Residency::UnderneathProtrudes;
        }
        if !within.fully_walkable_top() {
            return Residency::PreventedByWithin;
        }
        if within.collision_height_blips() >= FULL_BLOCK {
            return Residency::Suffocating;
        }
        Residency::StandardWithin
    } else {
        if !underneath.collides() {
            return Residency::Floating;
        }
        if !underneath.fully_walkable_top() {
            return Residency::PreventedByUnderneath;
        }
        if underneath.collision_height_blips() < FULL_BLOCK {
            return Residency::Floating;
        }
        Residency::UnderneathProtrudes
    }
}

/// The height, in blips above the voxel floor, at which the agent rests when
/// occupying `within` — or `None` when it cannot.
pub fn support_height(underneath: BlockAttrs, within: BlockAttrs) -> Option<Blips> {
    match residency(underneath, within) {
        Residency::StandardWithin => Some(within.collision_height_blips()),
        Residency::UnderneathProtrudes => {
            Some(underneath.collision_height_blips() - FULL_BLOCK)
        }
        _ => None,
    }
}

/// Whether an agent can stand with its feet in the voxel described by `at`:
/// the voxel itself and the head voxel above it must be clear of collision,
/// and the voxel below (possibly protruding upward) must provide support.
pub fn can_stand(below: BlockAttrs, at: BlockAttrs, above: BlockAttrs) -> bool {
    !at.collides() && !above.collides() && residency(below, at).is_valid()
}

/// Outcome of walking one voxel sideways.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Travel {
    /// No forward motion: a wall, an unreachable ledge, or missing headroom.
    Blocked,
    /// Blocked on foot, but a jump lands at the same voxel level — only onto
    /// blocks between half and one block tall.
    JumpToVoxelLevel,
    /// Blocked on foot, but a jump lands one voxel higher. The common jump.
    JumpToVoxelUp,
    /// Blocked on foot, but a jump lands two voxels higher. Only reachable
    /// from feet sunk near the top of their voxel (soul-sand-like support).
    JumpToVoxelTwoUp,
    /// Plain walking ends one voxel higher (stepping from sunken feet onto a
    /// taller floor).
    VoxelUp,
    /// Plain walking stays in the same voxel level.
    VoxelLevel,
    /// Nothing ahead or below collides; the agent walks off and falls.
    Fall,
}

impl Travel {
    /// Whether the move goes anywhere at all.
    pub const fn passable(self) -> bool {
        !matches!(self, Self::Blocked)
    }

    /// Whether the move needs a jump — a step-only agent cannot take it.
    pub const fn requires_jump(self) -> bool {
        matches!(
            self,
            Self::JumpToVoxelLevel | Self::JumpToVoxelUp | Self::JumpToVoxelTwoUp
        )
    }
}

/// The nine records consulted by `classify_travel`. The agent stands in the
/// left column with feet in `x` on top of `s`; it intends to move into the
/// right column.
///
/// ```text
///     e f        y+3
///     u a        y+2
///     . b        y+1   (the source head voxel is clear: the agent is in it)
///     x c        y     (feet)
///     s d        y-1
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TravelNeighborhood {
    /// Source column above the head voxel (y+2).
    pub u: BlockAttrs,
    /// Destination column at y+2 — the two-up landing voxel.
    pub a: BlockAttrs,
    /// Destination column at y+1 — the one-up landing voxel.
    pub b: BlockAttrs,
    /// Destination column at feet level.
    pub c: BlockAttrs,
    /// Destination column below feet level — the level-move support.
    pub d: BlockAttrs,
    /// Under the agent's feet — the current support reference.
    pub s: BlockAttrs,
    /// The voxel the agent's feet occupy.
    pub x: BlockAttrs,
    /// Source column at y+3 — clearance for the two-voxel jump.
    pub e: BlockAttrs,
    /// Destination column at y+3 — clearance for the two-voxel jump.
    pub f: BlockAttrs,
}

/// Classify walking forward from a support height of `feet` blips (within
/// the feet voxel) into the adjacent column. First match wins.
///
/// Callers must pass a `feet` that a direct `support_height(s, x)`
/// recomputation would produce, and may not call this while the head
/// protrudes into a colliding `u` — the agent could not be standing there.
pub fn classify_travel(feet: Blips, hood: TravelNeighborhood) -> Travel {
    debug_assert!(
        feet >= 0 && feet < FULL_BLOCK,
        "feet height {feet} outside a single voxel"
    );
    debug_assert_eq!(Some(feet), support_height(hood.s, hood.x));
    // The agent protrudes into `u` whenever its feet ride high enough in the
    // voxel. Strict comparison: the height constant is an overestimate.
    let already_within_u = feet > TWO_BLOCKS - PLAYER_HEIGHT;
    debug_assert!(!(already_within_u && hood.u.collides()));

    let could_jump_up_to = feet + JUMP;
    let could_step_up_to = feet + HALF_BLOCK;

    if could_jump_up_to >= TWO_BLOCKS && !hood.e.collides() && !hood.f.collides() {
        // Two voxels up is within jump reach and the clearance row is open;
        // a landing two up (e.g. a carpet on a full pillar) takes priority.
        if let Some(two_up) = support_height(hood.b, hood.a) {
            if two_up <= could_jump_up_to - TWO_BLOCKS {
                debug_assert!(already_within_u && two_up <= TWO_BLOCKS - PLAYER_HEIGHT);
                return Travel::JumpToVoxelTwoUp;
            }
        }
    }
    if already_within_u && hood.a.collides() {
        return Travel::Blocked; // too tall to pass under the far lintel
    }
    // `d` can never be tall enough to overrule a landing on `b`, so the
    // one-up landing is evaluated before the level one.
    if let Some(one_up) = support_height(hood.c, hood.b) {
        if one_up > TWO_BLOCKS - PLAYER_HEIGHT && (hood.e.collides() || hood.f.collides()) {
            return Travel::Blocked;
        }
        let relative_to_feet_voxel = one_up + FULL_BLOCK;
        if relative_to_feet_voxel > could_jump_up_to {
            return Travel::Blocked;
        }
        if relative_to_feet_voxel > could_step_up_to {
            return Travel::JumpToVoxelUp;
        }
        // A plain step this tall is only reachable from feet already riding
        // high, which in turn means `u` and `a` were already checked clear.
        debug_assert!(already_within_u && !hood.u.collides() && !hood.a.collides());
        return Travel::VoxelUp;
    }
    if hood.b.collides() {
        // Stepping on top of `b` has been ruled out, so a colliding `b`
        // leaves no way forward.
        return Travel::Blocked;
    }
    if let Some(level) = support_height(hood.d, hood.c) {
        if level > TWO_BLOCKS - PLAYER_HEIGHT && !already_within_u {
            // The landing would raise the head into `u`/`a` for the first
            // time mid-move.
            if hood.u.collides() {
                return Travel::Blocked;
            }
            if hood.a.collides() {
                return Travel::Blocked;
            }
        }
        if level > could_step_up_to {
            return Travel::JumpToVoxelLevel;
        }
        return Travel::VoxelLevel;
    }
    if hood.c.collides() {
        return Travel::Blocked;
    }
    if !hood.d.collides() {
        return Travel::Fall;
    }
    debug_assert!(!(hood.d.collision_height_blips() >= FULL_BLOCK && hood.d.fully_walkable_top()));
    if hood.d.collision_height_blips() < FULL_BLOCK + feet {
        Travel::Fall
    } else {
        Travel::Blocked
    }
}
