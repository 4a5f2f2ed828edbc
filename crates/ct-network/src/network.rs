//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`, so
//! iteration over a node's outgoing edges is a contiguous memory scan —
//! ideal for Dijkstra's inner loop and the per-edge congestion pass.
//!
//! # Multigraph
//!
//! Parallel edges between the same `(from, to)` pair are permitted and keep
//! distinct `EdgeId`s.  The shortest-path search naturally picks whichever
//! parallel edge is currently cheapest; [`RoadNetwork::edge_weight_ms`]
//! exposes the same minimum directly.
//!
//! # Mutability
//!
//! Topology and all static attributes (`edge_length_m`, `edge_lanes`,
//! `edge_class`, `edge_free_flow_ms`) are fixed once [`build`]
//! (`RoadNetworkBuilder::build`) returns.  The single dynamic attribute is
//! `edge_travel_ms`, which the congestion model overwrites wholesale each
//! tick.  Structural edits go through [`retain_edges`]
//! (`RoadNetwork::retain_edges`) and are only valid before the clock starts.

use ct_core::{EdgeId, GeoPoint, NodeId};

use crate::{NetworkError, NetworkResult};

// ── RoadClass ─────────────────────────────────────────────────────────────────

/// Coarse road classification carried over from the upstream ETL's
/// `highway=*` tags.  Read only by scenario transforms (e.g. closing every
/// motorway); simulation logic never branches on it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    #[default]
    Unclassified,
}

impl RoadClass {
    /// Parse an ETL tag value.  Unknown values map to `Unclassified`
    /// rather than failing — the attribute is informational.
    pub fn parse(s: &str) -> RoadClass {
        match s.trim() {
            "motorway"    => RoadClass::Motorway,
            "trunk"       => RoadClass::Trunk,
            "primary"     => RoadClass::Primary,
            "secondary"   => RoadClass::Secondary,
            "tertiary"    => RoadClass::Tertiary,
            "residential" => RoadClass::Residential,
            "service"     => RoadClass::Service,
            _             => RoadClass::Unclassified,
        }
    }
}

// ── EdgeView ──────────────────────────────────────────────────────────────────

/// A read-only view of one edge's attributes, handed to edge predicates
/// (scenario transforms, reporting) so they don't index eight parallel
/// arrays by hand.
#[derive(Copy, Clone, Debug)]
pub struct EdgeView {
    pub id:           EdgeId,
    pub from:         NodeId,
    pub to:           NodeId,
    pub length_m:     f32,
    pub lanes:        u16,
    pub class:        RoadClass,
    pub free_flow_ms: u32,
    pub travel_ms:    u32,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format.
///
/// All fields are `pub` for direct indexed access on hot paths (the
/// congestion model writes `edge_travel_ms` in place).  Do not construct
/// directly; use [`RoadNetworkBuilder`] or the CSV loader.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.  Informational.
    pub node_pos: Vec<GeoPoint>,

    /// Optional point-of-interest tag per node (hospital, transit stop, …).
    /// Informational; never read by simulation logic.
    pub node_poi: Vec<Option<String>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Redundant with CSR but required for
    /// route reconstruction and the congestion pass.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f32>,

    /// Lane count of each edge (≥ 1; the loader defaults missing or
    /// malformed values to 1).
    pub edge_lanes: Vec<u16>,

    /// Road classification, read only by scenario transforms.
    pub edge_class: Vec<RoadClass>,

    /// Free-flow (uncongested) travel time in milliseconds.  Fixed at
    /// build time, never mutated.
    pub edge_free_flow_ms: Vec<u32>,

    /// Current (congestion-adjusted) travel time in milliseconds.  The only
    /// field the simulation mutates; always ≥ `edge_free_flow_ms`.  Used as
    /// the Dijkstra edge cost.
    pub edge_travel_ms: Vec<u32>,
}

impl RoadNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` is a valid node of this network.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Validate a node identifier at an API boundary.
    #[inline]
    pub fn check_node(&self, node: NodeId) -> NetworkResult<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(NetworkError::UnknownNode(node))
        }
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.  `node` must
    /// be valid; hot-path callers validate once at the boundary.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges, counting parallels).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Heads of all out-edges of `node`.  A head reached by parallel edges
    /// appears once per edge.
    ///
    /// # Errors
    /// [`NetworkError::UnknownNode`] if `node` is not in the network.
    pub fn neighbors(&self, node: NodeId) -> NetworkResult<impl Iterator<Item = NodeId> + '_> {
        self.check_node(node)?;
        Ok(self.out_edges(node).map(|e| self.edge_to[e.index()]))
    }

    /// `true` if at least one directed edge `from → to` exists.
    /// Both nodes must be valid.
    #[inline]
    pub fn is_adjacent(&self, from: NodeId, to: NodeId) -> bool {
        self.out_edges(from).any(|e| self.edge_to[e.index()] == to)
    }

    /// Current travel time of the cheapest parallel edge `from → to`,
    /// in milliseconds.
    ///
    /// # Errors
    /// [`NetworkError::UnknownNode`] for a missing endpoint;
    /// [`NetworkError::NoEdge`] if no edge connects the pair.
    pub fn edge_weight_ms(&self, from: NodeId, to: NodeId) -> NetworkResult<u32> {
        self.check_node(from)?;
        self.check_node(to)?;
        self.out_edges(from)
            .filter(|e| self.edge_to[e.index()] == to)
            .map(|e| self.edge_travel_ms[e.index()])
            .min()
            .ok_or(NetworkError::NoEdge { from, to })
    }

    /// Assemble an [`EdgeView`] for `edge`.
    #[inline]
    pub fn edge_view(&self, edge: EdgeId) -> EdgeView {
        let i = edge.index();
        EdgeView {
            id:           edge,
            from:         self.edge_from[i],
            to:           self.edge_to[i],
            length_m:     self.edge_length_m[i],
            lanes:        self.edge_lanes[i],
            class:        self.edge_class[i],
            free_flow_ms: self.edge_free_flow_ms[i],
            travel_ms:    self.edge_travel_ms[i],
        }
    }

    /// Number of edges currently slowed above free flow.
    pub fn congested_edge_count(&self) -> usize {
        self.edge_travel_ms
            .iter()
            .zip(&self.edge_free_flow_ms)
            .filter(|(t, ff)| t > ff)
            .count()
    }

    // ── Structural edits (pre-run only) ───────────────────────────────────

    /// Keep only edges for which `keep` returns `true`; rebuild the CSR
    /// arrays.  Returns the number of edges removed.
    ///
    /// Edge IDs are NOT stable across this call — any `EdgeId` held from
    /// before is invalidated.  Node IDs are unaffected.  Only valid before
    /// the simulation clock starts; calling it mid-run would leave agents
    /// with routes over edges that no longer exist.
    pub fn retain_edges<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(EdgeView) -> bool,
    {
        let before = self.edge_count();
        let kept: Vec<RawEdge> = (0..before)
            .map(|i| self.edge_view(EdgeId(i as u32)))
            .filter(|view| keep(*view))
            .map(|view| RawEdge {
                from:         view.from,
                to:           view.to,
                length_m:     view.length_m,
                lanes:        view.lanes,
                class:        view.class,
                free_flow_ms: view.free_flow_ms,
                travel_ms:    view.travel_ms,
            })
            .collect();

        let removed = before - kept.len();
        assemble_edges(self.node_count(), kept, self);
        removed
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node and constructs the CSR arrays; each edge's
/// current travel time starts at its free-flow time.
///
/// # Example
///
/// ```
/// use ct_core::GeoPoint;
/// use ct_network::{RoadClass, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(18.52, 73.85));
/// let c = b.add_node(GeoPoint::new(18.53, 73.86));
/// b.add_two_way(a, c, 1_200.0, 2, RoadClass::Primary, 90_000); // 1.2 km, 90 s
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    pois:      Vec<Option<String>>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:         NodeId,
    to:           NodeId,
    length_m:     f32,
    lanes:        u16,
    class:        RoadClass,
    free_flow_ms: u32,
    travel_ms:    u32,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), pois: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading from the network artifact.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            pois:      Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.pois.push(None);
        id
    }

    /// Add a node carrying an informational POI tag.
    pub fn add_poi_node(&mut self, pos: GeoPoint, tag: impl Into<String>) -> NodeId {
        let id = self.add_node(pos);
        self.pois[id.index()] = Some(tag.into());
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// - `length_m`: physical length in metres (positive).
    /// - `lanes`: lane count (≥ 1).
    /// - `free_flow_ms`: uncongested travel time in milliseconds (positive).
    pub fn add_edge(
        &mut self,
        from:         NodeId,
        to:           NodeId,
        length_m:     f32,
        lanes:        u16,
        class:        RoadClass,
        free_flow_ms: u32,
    ) {
        debug_assert!(from.index() < self.nodes.len() && to.index() < self.nodes.len());
        debug_assert!(length_m > 0.0 && lanes >= 1 && free_flow_ms > 0);
        self.raw_edges.push(RawEdge {
            from,
            to,
            length_m,
            lanes,
            class,
            free_flow_ms,
            travel_ms: free_flow_ms,
        });
    }

    /// Convenience: add edges in **both directions** for an undirected road
    /// segment (the common case for most road types).
    pub fn add_two_way(
        &mut self,
        a:            NodeId,
        b:            NodeId,
        length_m:     f32,
        lanes:        u16,
        class:        RoadClass,
        free_flow_ms: u32,
    ) {
        self.add_edge(a, b, length_m, lanes, class, free_flow_ms);
        self.add_edge(b, a, length_m, lanes, class, free_flow_ms);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let mut net = RoadNetwork {
            node_pos:          self.nodes,
            node_poi:          self.pois,
            node_out_start:    Vec::new(),
            edge_from:         Vec::new(),
            edge_to:           Vec::new(),
            edge_length_m:     Vec::new(),
            edge_lanes:        Vec::new(),
            edge_class:        Vec::new(),
            edge_free_flow_ms: Vec::new(),
            edge_travel_ms:    Vec::new(),
        };
        assemble_edges(node_count, self.raw_edges, &mut net);
        net
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── CSR assembly ──────────────────────────────────────────────────────────────

/// Sort `raw` by source node and rebuild `net`'s CSR and edge arrays.
/// Shared by `RoadNetworkBuilder::build` and `RoadNetwork::retain_edges`.
fn assemble_edges(node_count: usize, mut raw: Vec<RawEdge>, net: &mut RoadNetwork) {
    let edge_count = raw.len();
    raw.sort_unstable_by_key(|e| (e.from.0, e.to.0));

    net.edge_from         = raw.iter().map(|e| e.from).collect();
    net.edge_to           = raw.iter().map(|e| e.to).collect();
    net.edge_length_m     = raw.iter().map(|e| e.length_m).collect();
    net.edge_lanes        = raw.iter().map(|e| e.lanes).collect();
    net.edge_class        = raw.iter().map(|e| e.class).collect();
    net.edge_free_flow_ms = raw.iter().map(|e| e.free_flow_ms).collect();
    net.edge_travel_ms    = raw.iter().map(|e| e.travel_ms).collect();

    // Build CSR row pointer (node_out_start).
    let mut node_out_start = vec![0u32; node_count + 1];
    for e in &raw {
        node_out_start[e.from.index() + 1] += 1;
    }
    for i in 1..=node_count {
        node_out_start[i] += node_out_start[i - 1];
    }
    debug_assert_eq!(node_out_start[node_count] as usize, edge_count);
    net.node_out_start = node_out_start;
}
