// Navigable-surface graph maintenance over a bounded voxel grid.
//
// `NavigableSurface` owns a dense snapshot of block attributes and keeps a
// graph of standable positions and legal moves consistent with it as blocks
// are placed and removed. Vertices and edges live in the injected
// connectivity substrate (`strider_conn`), addressed by the bijective
// `PosKey`; this module holds only keys and the snapshot.
//
// A block change at W can affect standability at W-1..W+1 (each position
// consults the voxel below, itself, and the voxel above) and the moves of
// feet positions from W-2 to W+1 (ascending moves read headroom two voxels
// above their source). `set_block` recomputes exactly those neighborhoods —
// three vertex checks and up to four rows of twelve move checks — and
// reconciles the substrate to match, so reachability queries never need a
// full rebuild.
//
// Updates run to completion synchronously on the calling thread: a caller
// that only interacts through the public operations never observes a
// half-applied block change. Drive it from one logical thread; there is no
// internal locking.
//
// See also: `physics.rs` for the standability rule, `strider_conn` for the
// substrate contract, `bounds.rs` for the snapshot index.

use log::trace;

use strider_conn::{Connectivity, NodeKey};

use crate::block::BlockAttrs;
use crate::bounds::CuboidBounds;
use crate::physics;
use crate::types::{MOVE_SHAPES, VoxelCoord};

/// Incrementally maintained graph of standable positions and legal moves.
///
/// `V` is the caller's per-vertex augmentation value; `G` the connectivity
/// substrate storing the graph. The surface is not serializable — it holds
/// the caller's generator closure; rebuild it from the block source instead.
pub struct NavigableSurface<V, G> {
    bounds: CuboidBounds,
    blocks: Vec<BlockAttrs>,
    graph: G,
    gen_vertex_augmentation: Box<dyn Fn(VoxelCoord) -> V>,
}

impl<V, G: Connectivity<V>> NavigableSurface<V, G> {
    /// Create an all-air surface of the given dimensions.
    ///
    /// `gen_vertex_augmentation` produces the value attached to a position's
    /// vertex; it is called exactly once each time a position turns
    /// standable.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    pub fn new(
        size_x: u32,
        size_y: u32,
        size_z: u32,
        graph: G,
        gen_vertex_augmentation: impl Fn(VoxelCoord) -> V + 'static,
    ) -> Self {
        let bounds = CuboidBounds::new(size_x, size_y, size_z);
        Self {
            blocks: vec![BlockAttrs::AIR; bounds.volume()],
            bounds,
            graph,
            gen_vertex_augmentation: Box::new(gen_vertex_augmentation),
        }
    }

    pub const fn bounds(&self) -> &CuboidBounds {
        &self.bounds
    }

    /// The connectivity substrate, for callers needing its wider query
    /// surface.
    pub const fn graph(&self) -> &G {
        &self.graph
    }

    /// Set the block at `pos` solid (the placeholder solid) or clear.
    ///
    /// Re-asserting the current state is a no-op, as is a position outside
    /// the bounds. Placing and removing flow through the same path because
    /// either can create and destroy standable positions and moves.
    pub fn set_block(&mut self, pos: VoxelCoord, place: bool) {
        let Some(index) = self.bounds.index(pos) else {
            trace!("ignoring block change outside bounds at {pos}");
            return;
        };
        if self.blocks[index].collides() == place {
            return;
        }
        self.blocks[index] = if place {
            BlockAttrs::PLACEHOLDER
        } else {
            BlockAttrs::AIR
        };
        // Standability can change wherever `pos` is the below, within, or
        // above voxel of a feet position.
        for dy in -1..=1 {
            self.refresh_vertex(pos.up(dy));
        }
        // Moves can change for any feet position whose twelve candidates
        // read `pos` — down to two below because ascending from there checks
        // headroom two voxels above its source.
        for dy in -2..=1 {
            self.refresh_moves(pos.up(dy));
        }
    }

    pub fn place_block(&mut self, pos: VoxelCoord) {
        self.set_block(pos, true);
    }

    pub fn remove_block(&mut self, pos: VoxelCoord) {
        self.set_block(pos, false);
    }

    /// Whether the block at `pos` collides. Outside the bounds is
    /// permanently open air.
    pub fn is_solid(&self, pos: VoxelCoord) -> bool {
        self.attrs(pos).collides()
    }

    /// Whether an agent can stand with its feet at `pos`, recomputed directly
    /// from the snapshot.
    pub fn can_stand(&self, feet: VoxelCoord) -> bool {
        physics::can_stand(self.attrs(feet.down()), self.attrs(feet), self.attrs(feet.up(1)))
    }

    /// Whether some sequence of legal moves joins the two positions.
    pub fn connected(&self, a: VoxelCoord, b: VoxelCoord) -> bool {
        self.graph.connected(a.key().into(), b.key().into())
    }

    /// The aggregate over every vertex value in `pos`'s component.
    pub fn component_augmentation(&self, pos: VoxelCoord) -> Option<&V> {
        self.graph.component_augmentation(pos.key().into())
    }

    /// The block record at `pos`; open air outside the bounds.
    fn attrs(&self, pos: VoxelCoord) -> BlockAttrs {
        self.bounds
            .index(pos)
            .map_or(BlockAttrs::AIR, |index| self.blocks[index])
    }

    fn refresh_vertex(&mut self, feet: VoxelCoord) {
        let key = NodeKey::from(feet.key());
        if self.can_stand(feet) {
            if self.graph.vertex_augmentation(key).is_none() {
                let value = (self.gen_vertex_augmentation)(feet);
                self.graph.set_vertex_augmentation(key, value);
                trace!("{feet} became standable");
            }
        } else if self.graph.remove_vertex_augmentation(key) {
            trace!("{feet} is no longer standable");
        }
    }

    /// Reconcile all twelve candidate moves out of `feet` with the substrate.
    /// Runs even when the source is not standable: stale edges must still be
    /// removed.
    fn refresh_moves(&mut self, feet: VoxelCoord) {
        let src_standable = self.can_stand(feet);
        for shape in MOVE_SHAPES {
            let dst = feet.offset(shape.dx, shape.dy, shape.dz);
            let mut legal = src_standable && self.can_stand(dst);
            if shape.is_descend() {
                // The head sweeps through one extra voxel above the landing.
                legal = legal && !self.is_solid(dst.up(2));
            }
            if shape.is_ascend() {
                legal = legal && !self.is_solid(feet.up(2));
            }
            let (from, to) = (NodeKey::from(feet.key()), NodeKey::from(dst.key()));
            if legal {
                if self.graph.add_edge(from, to) {
                    trace!("travel opened between {feet} and {dst}");
                }
            } else if self.graph.remove_edge(from, to) {
                trace!("travel closed between {feet} and {dst}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_conn::ComponentGraph;

    /// Surface with a min-of-keys component aggregate — the aggregate names
    /// a canonical position per component.
    fn surface(
        size_x: u32,
        size_y: u32,
        size_z: u32,
    ) -> NavigableSurface<u64, ComponentGraph<u64>> {
        let graph = ComponentGraph::new(|a: &u64, b: &u64| (*a).min(*b));
        NavigableSurface::new(size_x, size_y, size_z, graph, |pos| pos.key().as_u64())
    }

    fn at(x: i32, y: i32, z: i32) -> VoxelCoord {
        VoxelCoord::new(x, y, z)
    }

    #[test]
    fn empty_surface_has_no_standing_room() {
        let surface = surface(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert!(!surface.can_stand(at(x, y, z)));
                }
            }
        }
    }

    #[test]
    fn placed_block_creates_a_standable_position_above() {
        let mut surface = surface(4, 4, 4);
        surface.place_block(at(1, 0, 1));
        assert!(surface.is_solid(at(1, 0, 1)));
        assert!(surface.can_stand(at(1, 1, 1)));
        assert!(!surface.can_stand(at(1, 0, 1)));
        assert!(!surface.can_stand(at(1, 2, 1)));
    }

    #[test]
    fn adjacent_blocks_connect_their_tops() {
        let mut surface = surface(4, 4, 4);
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(1, 0, 0));
        assert!(surface.connected(at(0, 1, 0), at(1, 1, 0)));
    }

    #[test]
    fn removing_a_block_disconnects_its_top() {
        let mut surface = surface(4, 4, 4);
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(1, 0, 0));
        surface.remove_block(at(1, 0, 0));
        assert!(!surface.can_stand(at(1, 1, 0)));
        assert!(!surface.connected(at(0, 1, 0), at(1, 1, 0)));
        // The first column's position remains, connected to itself.
        assert!(surface.can_stand(at(0, 1, 0)));
        assert!(surface.connected(at(0, 1, 0), at(0, 1, 0)));
    }

    #[test]
    fn ceiling_revokes_standability() {
        let mut surface = surface(4, 6, 4);
        surface.place_block(at(1, 0, 1));
        assert!(surface.can_stand(at(1, 1, 1)));
        surface.place_block(at(1, 2, 1));
        assert!(!surface.can_stand(at(1, 1, 1)));
        surface.remove_block(at(1, 2, 1));
        assert!(surface.can_stand(at(1, 1, 1)));
    }

    #[test]
    fn set_block_is_idempotent() {
        let mut a = surface(5, 5, 5);
        let mut b = surface(5, 5, 5);
        for s in [&mut a, &mut b] {
            s.place_block(at(0, 0, 0));
            s.place_block(at(1, 0, 0));
            s.place_block(at(1, 1, 0));
        }
        // Re-issue the last operation on one of them.
        b.place_block(at(1, 1, 0));
        b.place_block(at(1, 1, 0));
        for x in 0..5 {
            for y in 0..5 {
                for z in 0..5 {
                    assert_eq!(a.can_stand(at(x, y, z)), b.can_stand(at(x, y, z)));
                }
            }
        }
        assert_eq!(
            a.connected(at(0, 1, 0), at(1, 2, 0)),
            b.connected(at(0, 1, 0), at(1, 2, 0))
        );
    }

    #[test]
    fn ascend_needs_headroom_above_the_source() {
        let mut surface = surface(4, 6, 4);
        // A floor block and a one-higher neighbor: feet at (0,1,0) and (1,2,0).
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(1, 0, 0));
        surface.place_block(at(1, 1, 0));
        assert!(surface.connected(at(0, 1, 0), at(1, 2, 0)));
        // A lid two above the lower feet blocks the ascend (and descend back).
        surface.place_block(at(0, 3, 0));
        assert!(surface.can_stand(at(0, 1, 0)));
        assert!(surface.can_stand(at(1, 2, 0)));
        assert!(!surface.connected(at(0, 1, 0), at(1, 2, 0)));
    }

    #[test]
    fn level_moves_need_no_extra_headroom() {
        let mut surface = surface(4, 6, 4);
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(1, 0, 0));
        // Lids exactly two above the feet positions leave a two-voxel gap,
        // which is enough for level travel.
        surface.place_block(at(0, 3, 0));
        surface.place_block(at(1, 3, 0));
        assert!(surface.connected(at(0, 1, 0), at(1, 1, 0)));
    }

    #[test]
    fn far_away_changes_leave_an_edge_alone() {
        let mut surface = surface(8, 8, 8);
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(1, 0, 0));
        assert!(surface.connected(at(0, 1, 0), at(1, 1, 0)));
        // Outside the 3-vertex / 4-row neighborhood of either endpoint.
        surface.place_block(at(6, 5, 6));
        surface.remove_block(at(6, 5, 6));
        surface.place_block(at(0, 6, 0));
        assert!(surface.connected(at(0, 1, 0), at(1, 1, 0)));
    }

    #[test]
    fn standability_matches_a_fresh_recomputation() {
        let mut surface = surface(5, 5, 5);
        let script = [
            (at(0, 0, 0), true),
            (at(1, 0, 0), true),
            (at(2, 0, 0), true),
            (at(1, 1, 0), true),
            (at(1, 0, 0), false),
            (at(2, 1, 0), true),
            (at(2, 1, 0), false),
            (at(0, 0, 0), false),
        ];
        for (pos, place) in script {
            surface.set_block(pos, place);
            for x in 0..5 {
                for y in 0..5 {
                    for z in 0..5 {
                        let feet = at(x, y, z);
                        let below = !surface.is_solid(feet) && !surface.is_solid(feet.up(1));
                        let expected = below && surface.is_solid(feet.down());
                        assert_eq!(
                            surface.can_stand(feet),
                            expected,
                            "standability drifted at {feet}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_bounds_changes_are_ignored() {
        let mut surface = surface(4, 4, 4);
        surface.place_block(at(-1, 0, 0));
        surface.place_block(at(0, 4, 0));
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert!(!surface.is_solid(at(x, y, z)));
                }
            }
        }
    }

    #[test]
    fn top_of_bounds_is_open_sky() {
        let mut surface = surface(4, 2, 4);
        // Feet at y=1: the head voxel at y=2 is outside the bounds, which
        // counts as open air.
        surface.place_block(at(1, 0, 1));
        assert!(surface.can_stand(at(1, 1, 1)));
    }

    #[test]
    fn component_augmentation_names_a_canonical_position() {
        let mut surface = surface(4, 4, 4);
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(1, 0, 0));
        let canonical = surface.component_augmentation(at(1, 1, 0)).copied();
        let expected = at(0, 1, 0)
            .key()
            .as_u64()
            .min(at(1, 1, 0).key().as_u64());
        assert_eq!(canonical, Some(expected));
        // Splitting the component gives each side its own canonical key.
        surface.remove_block(at(1, 0, 0));
        assert_eq!(
            surface.component_augmentation(at(0, 1, 0)).copied(),
            Some(at(0, 1, 0).key().as_u64())
        );
        assert_eq!(surface.component_augmentation(at(1, 1, 0)), None);
    }

    #[test]
    fn descend_needs_headroom_above_the_landing() {
        let mut surface = surface(4, 6, 4);
        surface.place_block(at(0, 0, 0));
        surface.place_block(at(0, 1, 0));
        surface.place_block(at(1, 0, 0));
        // Feet at (0,2,0) and (1,1,0): a descend from the ledge.
        assert!(surface.connected(at(0, 2, 0), at(1, 1, 0)));
        // A lid two above the landing blocks the descent.
        surface.place_block(at(1, 3, 0));
        assert!(surface.can_stand(at(1, 1, 0)));
        assert!(!surface.connected(at(0, 2, 0), at(1, 1, 0)));
    }
}
