//! Node in the routing graph.

use std::borrow::Borrow;

use geo::Point;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier, unique within one building graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lets map lookups take plain `&str` keys.
impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Role of a node in the building fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Room,
    Hallway,
    Stairs,
    Elevator,
    Exit,
    /// Transient splice node. Exists only for the duration of one routing
    /// query and never appears in a graph definition.
    Temp,
}

/// A node in the routing graph.
///
/// Edges are undirected and carry no weight: if A lists B then B lists A
/// (except transiently mid-splice), and the weight of A–B is the geodesic
/// distance between their positions, computed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Geographic position; `x` is longitude, `y` is latitude (degrees).
    pub position: Point<f64>,
    pub floor: i32,
    pub kind: NodeType,
    /// Ids of adjacent nodes.
    pub neighbors: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        longitude: f64,
        latitude: f64,
        floor: i32,
        kind: NodeType,
    ) -> Self {
        Self {
            id: id.into(),
            position: Point::new(longitude, latitude),
            floor,
            kind,
            neighbors: SmallVec::new(),
        }
    }

    pub fn is_neighbor(&self, id: &str) -> bool {
        self.neighbors.iter().any(|n| n.as_str() == id)
    }

    /// Add an edge toward `id` unless one is already present.
    pub(crate) fn link(&mut self, id: NodeId) {
        if !self.is_neighbor(id.as_str()) {
            self.neighbors.push(id);
        }
    }

    /// Remove the edge toward `id`, if any.
    pub(crate) fn unlink(&mut self, id: &str) {
        self.neighbors.retain(|n| n.as_str() != id);
    }
}
