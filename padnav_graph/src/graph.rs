// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core graph implementation: indexed element snapshot plus lazy edge cache.

use alloc::{vec, vec::Vec};
use core::hash::Hash;
use hashbrown::{HashMap, HashSet};

use crate::host::{ElementDiscovery, GeometrySource};
use crate::types::{Direction, Discovered, NodeIndex};

/// Edge cache slot: outer `None` means "not computed yet", inner `None`
/// means "computed, no neighbor in that direction".
type EdgeSlot = Option<Option<NodeIndex>>;

/// Identity metadata captured at the last successful build.
///
/// Consulted only by the reuse guard; never exposed to navigation.
#[derive(Clone, Debug)]
pub(crate) struct Snapshot<K> {
    pub(crate) identity: HashSet<K>,
    pub(crate) count: usize,
    pub(crate) built_at_ms: u64,
}

/// The navigation graph: an ordered element snapshot with a lazily-populated
/// directional edge cache.
///
/// A graph is built from a discovery pass over root containers and stays
/// valid until [`NavGraph::invalidate`] is called or a rebuild replaces it.
/// While valid, the node array and the handle map are a bijection over the
/// surviving discovery result; indices are dense and stable for the lifetime
/// of the build.
///
/// Edges are not precomputed. Directional neighbors are resolved on demand by
/// [`resolve`](crate::adjacency::resolve) against *current* geometry and then
/// cached here per `(node, direction)`.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use padnav_graph::{Discovered, ElementCaps, ElementDiscovery, GeometrySource, NavGraph};
///
/// struct Host;
///
/// impl ElementDiscovery<u32> for Host {
///     fn discover(&self, _roots: &[u32]) -> Vec<Discovered<u32>> {
///         vec![
///             Discovered { handle: 10, clipping_ancestor: None, caps: ElementCaps::INTERACTIVE },
///             Discovered { handle: 11, clipping_ancestor: None, caps: ElementCaps::INTERACTIVE },
///         ]
///     }
/// }
///
/// impl GeometrySource<u32> for Host {
///     fn bounding_box(&self, handle: u32) -> Option<Rect> {
///         Some(Rect::new(0.0, (handle - 10) as f64 * 20.0, 10.0, 10.0))
///     }
/// }
///
/// let mut graph = NavGraph::new();
/// assert!(graph.build(&[1], &Host, &Host, 0));
/// assert_eq!(graph.len(), 2);
/// assert!(graph.index_of(10).is_some());
/// ```
pub struct NavGraph<K> {
    /// Surviving elements in discovery scan order.
    nodes: Vec<K>,
    /// Reverse map; bijective with `nodes` exactly while `valid`.
    by_handle: HashMap<K, NodeIndex>,
    /// Per-node, per-direction neighbor cache.
    edges: Vec<[EdgeSlot; 4]>,
    valid: bool,
    snapshot: Option<Snapshot<K>>,
}

impl<K> core::fmt::Debug for NavGraph<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let cached = self
            .edges
            .iter()
            .flat_map(|slots| slots.iter())
            .filter(|s| s.is_some())
            .count();
        f.debug_struct("NavGraph")
            .field("nodes", &self.nodes.len())
            .field("edges_cached", &cached)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

impl<K> Default for NavGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> NavGraph<K> {
    /// Create an empty, invalid graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            by_handle: HashMap::new(),
            edges: Vec::new(),
            valid: false,
            snapshot: None,
        }
    }

    /// Number of navigable elements in the current build.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the current build has no navigable elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the graph holds a usable build.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the graph unusable and drop all nodes and cached edges.
    ///
    /// The reuse snapshot is dropped too, so the next request is forced
    /// through a full rebuild.
    pub fn invalidate(&mut self) {
        self.nodes.clear();
        self.by_handle.clear();
        self.edges.clear();
        self.snapshot = None;
        self.valid = false;
    }

    /// The default focus target: the first node in scan order.
    pub fn first(&self) -> Option<NodeIndex> {
        if self.valid && !self.nodes.is_empty() {
            Some(NodeIndex::new(0))
        } else {
            None
        }
    }

    pub(crate) fn snapshot(&self) -> Option<&Snapshot<K>> {
        self.snapshot.as_ref()
    }

    pub(crate) fn cached_edge(&self, origin: NodeIndex, dir: Direction) -> EdgeSlot {
        // An out-of-range origin reads back as "uncomputed"; the resolver
        // recomputes, which is the safe answer for either case.
        self.edges.get(origin.idx()).and_then(|slots| slots[dir.index()])
    }

    pub(crate) fn store_edge(&mut self, origin: NodeIndex, dir: Direction, neighbor: Option<NodeIndex>) {
        if let Some(slots) = self.edges.get_mut(origin.idx()) {
            slots[dir.index()] = Some(neighbor);
        }
    }
}

impl<K: Copy + Eq + Hash> NavGraph<K> {
    /// Build the graph from the given root containers.
    ///
    /// Calls the discovery adapter exactly once. Candidates whose geometry is
    /// currently unavailable are skipped, never treated as zero-sized. Returns
    /// `false` when zero candidates survive; the graph is then empty and
    /// invalid, which is the normal "no navigable elements" state and is not
    /// distinguished from having had no roots at all.
    pub fn build<D, G>(&mut self, roots: &[K], discovery: &D, geometry: &G, now_ms: u64) -> bool
    where
        D: ElementDiscovery<K>,
        G: GeometrySource<K>,
    {
        let candidates = discovery.discover(roots);
        self.build_from(&candidates, geometry, now_ms)
    }

    /// Build the graph from an already-obtained discovery result.
    ///
    /// Same semantics as [`build`](Self::build) minus the discovery call;
    /// used when the caller already holds a fresh candidate list (for
    /// example, after consulting the reuse guard with it).
    pub fn build_from<G>(&mut self, candidates: &[Discovered<K>], geometry: &G, now_ms: u64) -> bool
    where
        G: GeometrySource<K>,
    {
        self.invalidate();

        for candidate in candidates {
            if geometry.bounding_box(candidate.handle).is_none() {
                continue;
            }
            let index = NodeIndex::new(self.nodes.len());
            self.nodes.push(candidate.handle);
            self.by_handle.insert(candidate.handle, index);
        }

        if self.nodes.is_empty() {
            return false;
        }

        debug_assert_eq!(
            self.nodes.len(),
            self.by_handle.len(),
            "duplicate handles in discovery result"
        );

        self.edges = vec![[None; 4]; self.nodes.len()];
        self.snapshot = Some(Snapshot {
            identity: self.nodes.iter().copied().collect(),
            count: self.nodes.len(),
            built_at_ms: now_ms,
        });
        self.valid = true;
        true
    }

    /// Index of the given handle in the current build, if present.
    pub fn index_of(&self, handle: K) -> Option<NodeIndex> {
        if self.valid {
            self.by_handle.get(&handle).copied()
        } else {
            None
        }
    }

    /// Handle stored at the given index, if in range.
    pub fn handle(&self, index: NodeIndex) -> Option<K> {
        if self.valid {
            self.nodes.get(index.idx()).copied()
        } else {
            None
        }
    }

    /// Iterate over `(index, handle)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, K)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, &h)| (NodeIndex::new(i), h))
    }
}
