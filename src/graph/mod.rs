//! # Building Routing Graph
//!
//! One `RoomGraph` per building: loading from an external definition,
//! dynamic insertion of arbitrary points, Dijkstra shortest-path, and
//! cleanup of the transient nodes a query leaves behind.
//!
//! The graph is an arena — a map from id to node, with edges stored as id
//! lists and resolved via lookup. Weights are never stored; every edge
//! weighs its endpoints' geodesic distance. That keeps the splice/cleanup
//! round trip trivially consistent: reconnecting two nodes restores the
//! exact original weight because the weight was never anything but their
//! positions.

pub mod geometry;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::Read;

use geo::Point;
use hashbrown::HashMap;
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::model::{Node, NodeId, NodeType};
use crate::{Error, Result};

/// Reserved id for the transient node representing the query origin.
pub(crate) const TEMP_START_ID: &str = "temp_start";

// ============================================================================
// Definition records
// ============================================================================

/// One record of the external graph definition.
///
/// Neighbor ids must resolve within the same collection; `type` may not be
/// `temp`, which is reserved for transient splice nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub longitude: f64,
    pub latitude: f64,
    pub floor: i32,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub edges: Vec<NodeId>,
}

// ============================================================================
// RoomGraph
// ============================================================================

/// The routing graph of a single building.
#[derive(Debug)]
pub struct RoomGraph {
    nodes: HashMap<NodeId, Node>,
}

impl RoomGraph {
    /// Build a graph from definition records.
    ///
    /// Validation happens after the full list is parsed: a neighbor id that
    /// does not resolve is rejected (`Error::DanglingEdge`), never silently
    /// dropped — a graph with dangling edges would misroute. One-sided edges
    /// between known nodes are mirrored to keep adjacency undirected.
    pub fn load(records: Vec<NodeRecord>) -> Result<Self> {
        let mut nodes: HashMap<NodeId, Node> = HashMap::with_capacity(records.len());
        for rec in records {
            if rec.kind == NodeType::Temp {
                return Err(Error::ReservedNodeType(rec.id.to_string()));
            }
            if nodes.contains_key(rec.id.as_str()) {
                return Err(Error::DuplicateNode(rec.id.to_string()));
            }
            let mut node = Node::new(rec.id, rec.longitude, rec.latitude, rec.floor, rec.kind);
            node.neighbors = rec.edges.into_iter().collect();
            nodes.insert(node.id.clone(), node);
        }

        for node in nodes.values() {
            for neighbor in &node.neighbors {
                if !nodes.contains_key(neighbor.as_str()) {
                    return Err(Error::DanglingEdge {
                        node: node.id.to_string(),
                        neighbor: neighbor.to_string(),
                    });
                }
            }
        }

        let missing: Vec<(NodeId, NodeId)> = nodes
            .values()
            .flat_map(|node| {
                node.neighbors
                    .iter()
                    .filter(|nb| !nodes[nb.as_str()].is_neighbor(node.id.as_str()))
                    .map(|nb| (nb.clone(), node.id.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        for (at, add) in missing {
            if let Some(node) = nodes.get_mut(at.as_str()) {
                node.link(add);
            }
        }

        debug!(nodes = nodes.len(), "room graph loaded");
        Ok(Self { nodes })
    }

    /// Build a graph from a JSON array of definition records.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::load(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Self::load(serde_json::from_reader(reader)?)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    // ========================================================================
    // Dynamic point insertion
    // ========================================================================

    /// Splice a transient node for `point` onto the closest eligible edge.
    ///
    /// Eligible edges have no `Stairs` endpoint — stairs must be traversed,
    /// not jumped onto mid-flight. The closest edge is chosen by geodesic
    /// distance from `point` to its clamped planar projection. The `Temp`
    /// node lands at the projected position on the first endpoint's floor;
    /// the original direct edge is removed and replaced by the two halves.
    ///
    /// With `room_id` given, an ad-hoc `Room` node is additionally created
    /// at the exact unprojected `point`, connected only to the `Temp` node.
    /// That serves destination rooms that are not themselves graph nodes;
    /// without `room_id` the call projects the user's current position as a
    /// search source.
    ///
    /// Returns `false` (no node created) when the graph has no eligible
    /// edge — for instance a single isolated node.
    pub fn insert_projected_node(
        &mut self,
        point: Point<f64>,
        room_id: Option<&str>,
        temp_id: &str,
    ) -> bool {
        let mut best: Option<(NodeId, NodeId, Point<f64>)> = None;
        let mut best_dist = f64::INFINITY;

        for node in self.nodes.values() {
            if node.kind == NodeType::Stairs {
                continue;
            }
            for nb_id in &node.neighbors {
                let Some(nb) = self.nodes.get(nb_id.as_str()) else {
                    continue;
                };
                if nb.kind == NodeType::Stairs {
                    continue;
                }
                let candidate =
                    geometry::closest_point_on_segment(node.position, nb.position, point);
                let dist = geometry::distance_m(point, candidate);
                if dist < best_dist {
                    best_dist = dist;
                    best = Some((node.id.clone(), nb_id.clone(), candidate));
                }
            }
        }

        let Some((a_id, b_id, projected)) = best else {
            return false;
        };
        let floor = self.nodes[a_id.as_str()].floor;

        let mut neighbors: SmallVec<[NodeId; 4]> = SmallVec::new();
        neighbors.push(a_id.clone());
        neighbors.push(b_id.clone());

        let temp = NodeId::from(temp_id);
        if let Some(a) = self.nodes.get_mut(a_id.as_str()) {
            a.unlink(b_id.as_str());
            a.link(temp.clone());
        }
        if let Some(b) = self.nodes.get_mut(b_id.as_str()) {
            b.unlink(a_id.as_str());
            b.link(temp.clone());
        }

        if let Some(room_id) = room_id {
            let mut room = Node::new(room_id, point.x(), point.y(), floor, NodeType::Room);
            room.link(temp.clone());
            neighbors.push(room.id.clone());
            self.nodes.insert(room.id.clone(), room);
        }

        debug!(temp = temp_id, between = %a_id, and = %b_id, "spliced projected node");
        self.nodes.insert(
            temp.clone(),
            Node {
                id: temp,
                position: projected,
                floor,
                kind: NodeType::Temp,
                neighbors,
            },
        );
        true
    }

    // ========================================================================
    // Shortest path
    // ========================================================================

    /// Dijkstra from an arbitrary starting point to `target_id`.
    ///
    /// The start is spliced in as a transient node, searched from, and fully
    /// unspliced before returning; the first path entry is that transient
    /// node so callers see where the route meets the graph. An unreachable
    /// or unknown target yields an empty path — callers treat empty as "no
    /// route", it is never an error.
    pub fn shortest_path(&mut self, start: Point<f64>, target_id: &str) -> Vec<Node> {
        if !self.insert_projected_node(start, None, TEMP_START_ID) {
            return Vec::new();
        }
        let path = self.dijkstra(TEMP_START_ID, target_id);
        self.remove_temp(TEMP_START_ID);
        debug!(target = target_id, hops = path.len(), "shortest path computed");
        path
    }

    fn dijkstra(&self, start_id: &str, target_id: &str) -> Vec<Node> {
        let mut dist: HashMap<NodeId, f64> = HashMap::new();
        let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
        let mut seq = 0u64;

        dist.insert(NodeId::from(start_id), 0.0);
        heap.push(HeapEntry {
            dist: 0.0,
            seq,
            id: NodeId::from(start_id),
        });

        while let Some(entry) = heap.pop() {
            // Correct to stop at the pop (not first discovery) because
            // geodesic weights are never negative.
            if entry.id.as_str() == target_id {
                break;
            }
            let best = dist.get(entry.id.as_str()).copied().unwrap_or(f64::INFINITY);
            if entry.dist > best {
                continue; // superseded heap entry
            }
            let Some(node) = self.nodes.get(entry.id.as_str()) else {
                continue;
            };
            for nb_id in &node.neighbors {
                let Some(nb) = self.nodes.get(nb_id.as_str()) else {
                    continue;
                };
                let next = entry.dist + geometry::distance_m(node.position, nb.position);
                let known = dist.get(nb_id.as_str()).copied().unwrap_or(f64::INFINITY);
                if next < known {
                    dist.insert(nb_id.clone(), next);
                    prev.insert(nb_id.clone(), node.id.clone());
                    seq += 1;
                    heap.push(HeapEntry {
                        dist: next,
                        seq,
                        id: nb_id.clone(),
                    });
                }
            }
        }

        // Walk the predecessor chain backward; a chain that never reaches
        // the start means the target is unreachable (or unknown).
        let mut ids: Vec<&str> = Vec::new();
        let mut at = target_id;
        loop {
            ids.push(at);
            if at == start_id {
                break;
            }
            match prev.get(at) {
                Some(p) => at = p.as_str(),
                None => return Vec::new(),
            }
        }
        ids.reverse();

        let mut path = Vec::with_capacity(ids.len());
        for id in ids {
            match self.nodes.get(id) {
                Some(node) => path.push(node.clone()),
                None => return Vec::new(),
            }
        }
        path
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Remove every transient node and restore the original topology.
    ///
    /// Each `Temp` node carries its two through-neighbors in its first two
    /// edge slots (the pair it was spliced between); they regain their
    /// direct mutual edge. Any ad-hoc `Room` node left with no edges after
    /// its `Temp` disappears is removed with it. Runs after every routing
    /// query, including failed ones, so no state leaks across queries.
    pub fn cleanup(&mut self) {
        let temp_ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.kind == NodeType::Temp)
            .map(|n| n.id.clone())
            .collect();
        for id in &temp_ids {
            self.remove_temp(id.as_str());
        }
        if !temp_ids.is_empty() {
            debug!(removed = temp_ids.len(), "graph cleanup");
        }
    }

    /// Unsplice a single transient node, re-linking its through-pair.
    fn remove_temp(&mut self, id: &str) {
        let Some(temp) = self.nodes.remove(id) else {
            return;
        };

        if temp.neighbors.len() >= 2 {
            let a_id = temp.neighbors[0].clone();
            let b_id = temp.neighbors[1].clone();
            // Only re-link toward endpoints that still exist; a neighboring
            // temp removed earlier in the same cleanup must not resurrect.
            let a_exists = self.nodes.contains_key(a_id.as_str());
            let b_exists = self.nodes.contains_key(b_id.as_str());
            if let Some(a) = self.nodes.get_mut(a_id.as_str()) {
                a.unlink(id);
                if b_exists {
                    a.link(b_id.clone());
                }
            }
            if let Some(b) = self.nodes.get_mut(b_id.as_str()) {
                b.unlink(id);
                if a_exists {
                    b.link(a_id);
                }
            }
        } else if let Some(only) = temp.neighbors.first() {
            if let Some(n) = self.nodes.get_mut(only.as_str()) {
                n.unlink(id);
            }
        }

        for extra in temp.neighbors.iter().skip(2) {
            let remove = match self.nodes.get_mut(extra.as_str()) {
                Some(n) => {
                    n.unlink(id);
                    n.kind == NodeType::Room && n.neighbors.is_empty()
                }
                None => false,
            };
            if remove {
                self.nodes.remove(extra.as_str());
            }
        }
    }
}

// ============================================================================
// Heap ordering
// ============================================================================

/// Priority-queue entry: min-heap on distance, ties broken by discovery
/// order so equal-cost searches are deterministic.
struct HeapEntry {
    dist: f64,
    seq: u64,
    id: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the smallest distance
        // (then the earliest discovery) on top.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
