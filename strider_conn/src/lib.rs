// Incremental connected-component tracking for undirected graphs.
//
// This crate is the connectivity substrate used by `strider_nav`: a graph of
// opaque `NodeKey` vertices whose edge set changes one edge at a time, with
// reachability queries and a per-component aggregate that summarizes every
// vertex value in a component.
//
// The crate deliberately knows nothing about voxels or navigation. Consumers
// talk to the `Connectivity<V>` trait; `ComponentGraph<V>` is the provided
// implementation:
// - Edge insertion merges the smaller component into the larger one, so total
//   merge work over a graph's lifetime is O(n log n) vertex moves.
// - Edge deletion runs an interleaved search from both endpoints and splits
//   off whichever side exhausts first, bounding the scan by the smaller side.
// - Each component caches the fold of its members' values under a combine
//   function supplied once at construction. The combine must be associative
//   and commutative: splits and merges recombine subsets in arbitrary order.
//
// Swapping in a worst-case-efficient structure (Euler-tour trees, top trees)
// means implementing `Connectivity<V>` on it; callers are generic over the
// trait and never name `ComponentGraph` directly.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Opaque vertex key. Callers derive it bijectively from whatever they
/// identify vertices by (positions, ids); this crate only compares and
/// hashes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(pub u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({:#x})", self.0)
    }
}

/// The connectivity-substrate contract.
///
/// Vertices exist implicitly: attaching an augmentation or adding an edge
/// creates them. All mutations are idempotent — re-adding a present edge or
/// re-removing an absent one is a no-op reported through the return value,
/// never an error.
pub trait Connectivity<V> {
    /// Attach (or replace) the value carried by a vertex.
    fn set_vertex_augmentation(&mut self, vertex: NodeKey, value: V);

    /// Detach a vertex's value. Returns whether a value was present.
    fn remove_vertex_augmentation(&mut self, vertex: NodeKey) -> bool;

    /// The value currently attached to a vertex, if any.
    fn vertex_augmentation(&self, vertex: NodeKey) -> Option<&V>;

    /// Add an undirected edge. Returns whether the edge set changed
    /// (`false` for self-edges and already-present edges).
    fn add_edge(&mut self, a: NodeKey, b: NodeKey) -> bool;

    /// Remove an undirected edge. Returns whether the edge set changed.
    fn remove_edge(&mut self, a: NodeKey, b: NodeKey) -> bool;

    /// Whether a path of edges joins the two keys. Reflexive: every key is
    /// connected to itself.
    fn connected(&self, a: NodeKey, b: NodeKey) -> bool;

    /// The fold of all augmentation values in the component containing
    /// `vertex`, under the combine function. `None` if the vertex is unknown
    /// or no vertex in its component carries a value.
    fn component_augmentation(&self, vertex: NodeKey) -> Option<&V>;
}

/// Internal component identifier. Never reused within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ComponentId(u64);

struct Vertex<V> {
    augmentation: Option<V>,
    /// Adjacent vertex keys. Inline capacity covers bounded-degree uses
    /// (the navigation graph tops out at twelve move shapes per vertex).
    neighbors: SmallVec<[NodeKey; 12]>,
    component: ComponentId,
}

struct Component<V> {
    members: FxHashSet<NodeKey>,
    /// Cached fold of the members' augmentation values.
    aggregate: Option<V>,
}

/// Incremental connected-component tracker with per-component aggregates.
pub struct ComponentGraph<V> {
    vertices: FxHashMap<NodeKey, Vertex<V>>,
    components: FxHashMap<ComponentId, Component<V>>,
    combine: Box<dyn Fn(&V, &V) -> V>,
    next_component: u64,
}

impl<V: Clone> ComponentGraph<V> {
    /// Create an empty graph. `combine` folds vertex values into component
    /// aggregates and must be associative and commutative.
    pub fn new(combine: impl Fn(&V, &V) -> V + 'static) -> Self {
        Self {
            vertices: FxHashMap::default(),
            components: FxHashMap::default(),
            combine: Box::new(combine),
            next_component: 0,
        }
    }

    /// Number of vertices currently tracked (bookkeeping entries included).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of connected components currently tracked.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    fn fresh_component_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_component);
        self.next_component += 1;
        id
    }

    fn ensure_vertex(&mut self, key: NodeKey) -> ComponentId {
        if let Some(vertex) = self.vertices.get(&key) {
            return vertex.component;
        }
        let id = self.fresh_component_id();
        let mut members = FxHashSet::default();
        members.insert(key);
        self.components.insert(
            id,
            Component {
                members,
                aggregate: None,
            },
        );
        self.vertices.insert(
            key,
            Vertex {
                augmentation: None,
                neighbors: SmallVec::new(),
                component: id,
            },
        );
        id
    }

    /// Drop a vertex that carries neither edges nor a value, along with its
    /// (necessarily singleton) component.
    fn collect_if_empty(&mut self, key: NodeKey) {
        let Some(vertex) = self.vertices.get(&key) else {
            return;
        };
        if vertex.neighbors.is_empty() && vertex.augmentation.is_none() {
            let id = vertex.component;
            self.vertices.remove(&key);
            self.components.remove(&id);
        }
    }

    /// Fold the augmentation values of a member set from scratch.
    fn fold_members(&self, members: &FxHashSet<NodeKey>) -> Option<V> {
        let mut acc: Option<V> = None;
        for key in members {
            let Some(value) = self.vertices.get(key).and_then(|v| v.augmentation.as_ref()) else {
                continue;
            };
            acc = Some(match acc {
                None => value.clone(),
                Some(folded) => (self.combine)(&folded, value),
            });
        }
        acc
    }

    fn refold_component(&mut self, id: ComponentId) {
        let Some(component) = self.components.get_mut(&id) else {
            return;
        };
        let members = std::mem::take(&mut component.members);
        let aggregate = self.fold_members(&members);
        if let Some(component) = self.components.get_mut(&id) {
            component.members = members;
            component.aggregate = aggregate;
        }
    }

    /// Merge two distinct components, moving the smaller member set into the
    /// larger one.
    fn merge_components(&mut self, x: ComponentId, y: ComponentId) {
        let size = |id: ComponentId| self.components.get(&id).map_or(0, |c| c.members.len());
        let (keep, absorb) = if size(x) >= size(y) { (x, y) } else { (y, x) };
        let Some(absorbed) = self.components.remove(&absorb) else {
            return;
        };
        for key in &absorbed.members {
            if let Some(vertex) = self.vertices.get_mut(key) {
                vertex.component = keep;
            }
        }
        let merged = {
            let Some(kept) = self.components.get(&keep) else {
                return;
            };
            match (kept.aggregate.as_ref(), absorbed.aggregate.as_ref()) {
                (None, None) => None,
                (Some(a), None) => Some(a.clone()),
                (None, Some(b)) => Some(b.clone()),
                (Some(a), Some(b)) => Some((self.combine)(a, b)),
            }
        };
        if let Some(kept) = self.components.get_mut(&keep) {
            kept.members.extend(absorbed.members);
            kept.aggregate = merged;
        }
    }

    /// After removing the edge (a, b): if the endpoints are now disconnected,
    /// return the vertex set of one complete side (whichever the interleaved
    /// search exhausts first — the smaller side, up to a constant factor).
    /// Returns `None` while another path still joins them.
    fn separated_side(&self, a: NodeKey, b: NodeKey) -> Option<FxHashSet<NodeKey>> {
        let mut seen_a = FxHashSet::default();
        let mut seen_b = FxHashSet::default();
        seen_a.insert(a);
        seen_b.insert(b);
        let mut frontier_a = VecDeque::from([a]);
        let mut frontier_b = VecDeque::from([b]);
        loop {
            match frontier_a.pop_front() {
                None => return Some(seen_a),
                Some(current) => {
                    for &next in self.neighbors_of(current) {
                        if seen_b.contains(&next) {
                            return None; // the searches met: still one component
                        }
                        if seen_a.insert(next) {
                            frontier_a.push_back(next);
                        }
                    }
                }
            }
            match frontier_b.pop_front() {
                None => return Some(seen_b),
                Some(current) => {
                    for &next in self.neighbors_of(current) {
                        if seen_a.contains(&next) {
                            return None;
                        }
                        if seen_b.insert(next) {
                            frontier_b.push_back(next);
                        }
                    }
                }
            }
        }
    }

    fn neighbors_of(&self, key: NodeKey) -> &[NodeKey] {
        self.vertices.get(&key).map_or(&[], |v| v.neighbors.as_slice())
    }

    /// Move `side` out of its current component into a fresh one and refold
    /// the aggregates on both sides of the split.
    fn split_off(&mut self, old: ComponentId, side: FxHashSet<NodeKey>) {
        let new_id = self.fresh_component_id();
        if let Some(component) = self.components.get_mut(&old) {
            for key in &side {
                component.members.remove(key);
            }
        }
        for key in &side {
            if let Some(vertex) = self.vertices.get_mut(key) {
                vertex.component = new_id;
            }
        }
        self.components.insert(
            new_id,
            Component {
                members: side,
                aggregate: None,
            },
        );
        self.refold_component(old);
        self.refold_component(new_id);
    }
}

impl<V: Clone> Connectivity<V> for ComponentGraph<V> {
    fn set_vertex_augmentation(&mut self, vertex: NodeKey, value: V) {
        let id = self.ensure_vertex(vertex);
        let had_previous = {
            let Some(entry) = self.vertices.get_mut(&vertex) else {
                return;
            };
            let had = entry.augmentation.is_some();
            entry.augmentation = Some(value);
            had
        };
        if had_previous {
            // No inverse under the combine: rebuild the fold from members.
            self.refold_component(id);
        } else {
            let folded = {
                let Some(value) = self
                    .vertices
                    .get(&vertex)
                    .and_then(|v| v.augmentation.as_ref())
                else {
                    return;
                };
                match self.components.get(&id).and_then(|c| c.aggregate.as_ref()) {
                    None => value.clone(),
                    Some(aggregate) => (self.combine)(aggregate, value),
                }
            };
            if let Some(component) = self.components.get_mut(&id) {
                component.aggregate = Some(folded);
            }
        }
    }

    fn remove_vertex_augmentation(&mut self, vertex: NodeKey) -> bool {
        let Some(entry) = self.vertices.get_mut(&vertex) else {
            return false;
        };
        let id = entry.component;
        let removed = entry.augmentation.take().is_some();
        self.collect_if_empty(vertex);
        if removed && self.components.contains_key(&id) {
            self.refold_component(id);
        }
        removed
    }

    fn vertex_augmentation(&self, vertex: NodeKey) -> Option<&V> {
        self.vertices.get(&vertex)?.augmentation.as_ref()
    }

    fn add_edge(&mut self, a: NodeKey, b: NodeKey) -> bool {
        if a == b {
            return false;
        }
        let comp_a = self.ensure_vertex(a);
        let comp_b = self.ensure_vertex(b);
        if self.neighbors_of(a).contains(&b) {
            return false;
        }
        if let Some(vertex) = self.vertices.get_mut(&a) {
            vertex.neighbors.push(b);
        }
        if let Some(vertex) = self.vertices.get_mut(&b) {
            vertex.neighbors.push(a);
        }
        if comp_a != comp_b {
            self.merge_components(comp_a, comp_b);
        }
        true
    }

    fn remove_edge(&mut self, a: NodeKey, b: NodeKey) -> bool {
        if a == b || !self.neighbors_of(a).contains(&b) {
            return false;
        }
        if let Some(vertex) = self.vertices.get_mut(&a) {
            vertex.neighbors.retain(|k| *k != b);
        }
        if let Some(vertex) = self.vertices.get_mut(&b) {
            vertex.neighbors.retain(|k| *k != a);
        }
        let id = match self.vertices.get(&a) {
            Some(vertex) => vertex.component,
            None => return true,
        };
        if let Some(side) = self.separated_side(a, b) {
            self.split_off(id, side);
        }
        self.collect_if_empty(a);
        self.collect_if_empty(b);
        true
    }

    fn connected(&self, a: NodeKey, b: NodeKey) -> bool {
        if a == b {
            return true;
        }
        match (self.vertices.get(&a), self.vertices.get(&b)) {
            (Some(x), Some(y)) => x.component == y.component,
            _ => false,
        }
    }

    fn component_augmentation(&self, vertex: NodeKey) -> Option<&V> {
        let id = self.vertices.get(&vertex)?.component;
        self.components.get(&id)?.aggregate.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_graph() -> ComponentGraph<u64> {
        ComponentGraph::new(|a: &u64, b: &u64| (*a).min(*b))
    }

    #[test]
    fn add_edge_reports_changes() {
        let mut graph = min_graph();
        assert!(graph.add_edge(NodeKey(1), NodeKey(2)));
        assert!(!graph.add_edge(NodeKey(1), NodeKey(2)));
        assert!(!graph.add_edge(NodeKey(2), NodeKey(1)));
        assert!(!graph.add_edge(NodeKey(3), NodeKey(3)));
    }

    #[test]
    fn connected_is_reflexive() {
        let graph = min_graph();
        assert!(graph.connected(NodeKey(7), NodeKey(7)));
        assert!(!graph.connected(NodeKey(7), NodeKey(8)));
    }

    #[test]
    fn edges_build_one_component() {
        let mut graph = min_graph();
        graph.add_edge(NodeKey(1), NodeKey(2));
        graph.add_edge(NodeKey(2), NodeKey(3));
        assert!(graph.connected(NodeKey(1), NodeKey(3)));
        assert_eq!(graph.component_count(), 1);
    }

    #[test]
    fn removing_a_bridge_splits() {
        let mut graph = min_graph();
        graph.add_edge(NodeKey(1), NodeKey(2));
        graph.add_edge(NodeKey(2), NodeKey(3));
        assert!(graph.remove_edge(NodeKey(2), NodeKey(3)));
        assert!(graph.connected(NodeKey(1), NodeKey(2)));
        assert!(!graph.connected(NodeKey(1), NodeKey(3)));
        assert!(!graph.remove_edge(NodeKey(2), NodeKey(3)));
    }

    #[test]
    fn removing_a_cycle_edge_keeps_connectivity() {
        let mut graph = min_graph();
        graph.add_edge(NodeKey(1), NodeKey(2));
        graph.add_edge(NodeKey(2), NodeKey(3));
        graph.add_edge(NodeKey(3), NodeKey(1));
        assert!(graph.remove_edge(NodeKey(1), NodeKey(2)));
        assert!(graph.connected(NodeKey(1), NodeKey(2)));
        assert_eq!(graph.component_count(), 1);
    }

    #[test]
    fn aggregate_follows_merges() {
        let mut graph = min_graph();
        graph.set_vertex_augmentation(NodeKey(10), 10);
        graph.set_vertex_augmentation(NodeKey(20), 20);
        assert_eq!(graph.component_augmentation(NodeKey(10)), Some(&10));
        assert_eq!(graph.component_augmentation(NodeKey(20)), Some(&20));
        graph.add_edge(NodeKey(10), NodeKey(20));
        assert_eq!(graph.component_augmentation(NodeKey(20)), Some(&10));
    }

    #[test]
    fn aggregate_follows_splits() {
        let mut graph = min_graph();
        graph.set_vertex_augmentation(NodeKey(5), 5);
        graph.set_vertex_augmentation(NodeKey(9), 9);
        graph.add_edge(NodeKey(5), NodeKey(9));
        graph.remove_edge(NodeKey(5), NodeKey(9));
        assert_eq!(graph.component_augmentation(NodeKey(5)), Some(&5));
        assert_eq!(graph.component_augmentation(NodeKey(9)), Some(&9));
    }

    #[test]
    fn replacing_augmentation_refolds() {
        let mut graph = min_graph();
        graph.set_vertex_augmentation(NodeKey(1), 1);
        graph.set_vertex_augmentation(NodeKey(2), 2);
        graph.add_edge(NodeKey(1), NodeKey(2));
        assert_eq!(graph.component_augmentation(NodeKey(2)), Some(&1));
        // Raising the minimum-carrying vertex must re-derive the fold, not
        // keep the stale minimum.
        graph.set_vertex_augmentation(NodeKey(1), 50);
        assert_eq!(graph.component_augmentation(NodeKey(2)), Some(&2));
    }

    #[test]
    fn removing_augmentation_refolds() {
        let mut graph = min_graph();
        graph.set_vertex_augmentation(NodeKey(1), 1);
        graph.set_vertex_augmentation(NodeKey(2), 2);
        graph.add_edge(NodeKey(1), NodeKey(2));
        assert!(graph.remove_vertex_augmentation(NodeKey(1)));
        assert_eq!(graph.component_augmentation(NodeKey(2)), Some(&2));
        assert!(!graph.remove_vertex_augmentation(NodeKey(1)));
    }

    #[test]
    fn bare_vertices_are_collected() {
        let mut graph = min_graph();
        graph.add_edge(NodeKey(1), NodeKey(2));
        assert_eq!(graph.vertex_count(), 2);
        graph.remove_edge(NodeKey(1), NodeKey(2));
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.component_count(), 0);
    }

    #[test]
    fn augmented_vertex_survives_edge_removal() {
        let mut graph = min_graph();
        graph.set_vertex_augmentation(NodeKey(1), 1);
        graph.add_edge(NodeKey(1), NodeKey(2));
        graph.remove_edge(NodeKey(1), NodeKey(2));
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.vertex_augmentation(NodeKey(1)), Some(&1));
    }

    #[test]
    fn split_assigns_each_side_its_own_fold() {
        let mut graph = min_graph();
        // Chain 1 - 2 - 3 - 4 with values equal to keys.
        for key in 1..=4 {
            graph.set_vertex_augmentation(NodeKey(key), key);
        }
        graph.add_edge(NodeKey(1), NodeKey(2));
        graph.add_edge(NodeKey(2), NodeKey(3));
        graph.add_edge(NodeKey(3), NodeKey(4));
        assert_eq!(graph.component_augmentation(NodeKey(4)), Some(&1));
        graph.remove_edge(NodeKey(2), NodeKey(3));
        assert_eq!(graph.component_augmentation(NodeKey(1)), Some(&1));
        assert_eq!(graph.component_augmentation(NodeKey(2)), Some(&1));
        assert_eq!(graph.component_augmentation(NodeKey(3)), Some(&3));
        assert_eq!(graph.component_augmentation(NodeKey(4)), Some(&3));
    }
}
