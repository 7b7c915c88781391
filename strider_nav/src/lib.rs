// strider_nav — incremental walkability for bounded voxel worlds.
//
// This crate answers two questions about a block world that changes one
// block at a time: can an agent physically move between two adjacent
// standing positions, and are two positions mutually reachable at all. It
// maintains the answer incrementally — each block change triggers a bounded
// local recomputation, never a full rebuild.
//
// Module overview:
// - `blip.rs`:    Fixed-point vertical unit and the height/allowance constants.
// - `block.rs`:   Per-block collision attributes (the three fields physics reads).
// - `physics.rs`: Pure standing/travel classification over attribute records.
// - `bounds.rs`:  Fixed cuboid bounds with the dense linear index.
// - `types.rs`:   VoxelCoord, the bijective PosKey, the twelve move shapes.
// - `surface.rs`: The navigable-surface maintainer tying it all together.
//
// The connectivity substrate lives in the companion crate `strider_conn`;
// the surface is generic over its `Connectivity` trait, so the provided
// `ComponentGraph` can be swapped for a worst-case-efficient structure
// without touching this crate.
//
// Pathfinding, block registries, and world synchronization are out of scope:
// integration layers feed block changes in and consume reachability and
// component aggregates out.

pub mod blip;
pub mod block;
pub mod bounds;
pub mod physics;
pub mod surface;
pub mod types;
