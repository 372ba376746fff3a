//! # Route Orchestration
//!
//! `Router` owns one `RoomGraph` per registered building, picks the graph
//! owning a destination id, and exposes the computed path as a pull-based
//! waypoint queue.
//!
//! Every graph sits behind a `parking_lot::Mutex`, and `request_route`
//! holds the selected graph's lock across the entire
//! insert → search → cleanup sequence. That sequence is the atomic unit of
//! graph mutation: hosts with concurrent callbacks get the required mutual
//! exclusion without any discipline on their side.

use std::collections::VecDeque;

use geo::Point;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::graph::{geometry, RoomGraph};
use crate::model::{Node, NodeType, Room};

/// Outcome of a route request. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A route was computed and queued.
    Routed { waypoints: usize },
    /// No registered building owns the destination id — route unavailable.
    NoBuilding,
    /// The destination could not be reached from the origin; callers fall
    /// back to straight-line guidance.
    Unreachable,
}

struct Building {
    prefix: String,
    graph: Mutex<RoomGraph>,
}

/// Multi-building router with a pull-based waypoint queue.
pub struct Router {
    buildings: Vec<Building>,
    route: Mutex<VecDeque<Node>>,
    arrival_radius_m: f64,
}

impl Router {
    pub fn new() -> Self {
        Self {
            buildings: Vec::new(),
            route: Mutex::new(VecDeque::new()),
            arrival_radius_m: 5.0,
        }
    }

    /// Distance at which a waypoint counts as reached (meters).
    pub fn with_arrival_radius(mut self, meters: f64) -> Self {
        self.arrival_radius_m = meters;
        self
    }

    /// Register a building graph under the room-id prefix that selects it.
    pub fn add_building(&mut self, prefix: impl Into<String>, graph: RoomGraph) {
        self.buildings.push(Building {
            prefix: prefix.into(),
            graph: Mutex::new(graph),
        });
    }

    // ========================================================================
    // Route requests
    // ========================================================================

    /// Compute a route from `origin` to `destination` and replace the
    /// waypoint queue with it.
    ///
    /// The destination's id prefix selects the owning building graph; a
    /// destination no building claims yields [`RouteOutcome::NoBuilding`].
    /// The destination is spliced into the graph (unless it already is a
    /// graph node), the shortest path is searched from the origin, and
    /// every graph this router owns is cleaned afterward — also on failure,
    /// so no transient state survives into the next query.
    ///
    /// The synthetic origin node is not queued: it is where the user
    /// already stands, not a place to walk to.
    pub fn request_route(&self, origin: Point<f64>, destination: &Room) -> RouteOutcome {
        let mut route = self.route.lock();
        route.clear();

        let Some(building) = self
            .buildings
            .iter()
            .find(|b| destination.id.as_str().starts_with(&b.prefix))
        else {
            warn!(room = %destination.id, "no building graph owns destination");
            return RouteOutcome::NoBuilding;
        };

        let mut path = {
            let mut graph = building.graph.lock();
            if graph.node(destination.id.as_str()).is_none() {
                let temp_id = format!("{}_temp", destination.id);
                graph.insert_projected_node(
                    destination.position(),
                    Some(destination.id.as_str()),
                    &temp_id,
                );
            }
            graph.shortest_path(origin, destination.id.as_str())
        };

        for building in &self.buildings {
            building.graph.lock().cleanup();
        }

        if path.is_empty() {
            debug!(room = %destination.id, "destination unreachable from origin");
            return RouteOutcome::Unreachable;
        }
        if path.first().is_some_and(|n| n.kind == NodeType::Temp) {
            path.remove(0);
        }

        route.extend(path);
        debug!(room = %destination.id, waypoints = route.len(), "route queued");
        RouteOutcome::Routed {
            waypoints: route.len(),
        }
    }

    // ========================================================================
    // Waypoint queue
    // ========================================================================

    /// Remove and return the next waypoint. `None` once the queue is
    /// exhausted — from there the destination room itself is the target.
    pub fn pop(&self) -> Option<Node> {
        self.route.lock().pop_front()
    }

    /// The next waypoint without consuming it. Never mutates; repeated
    /// peeks return the same node.
    pub fn peek(&self) -> Option<Node> {
        self.route.lock().front().cloned()
    }

    /// Snapshot of all remaining waypoints, for route-line rendering.
    pub fn current_path(&self) -> Vec<Node> {
        self.route.lock().iter().cloned().collect()
    }

    /// Pop the head waypoint if `position` is within the arrival radius of
    /// it. Call on every position fix; returns the reached waypoint.
    pub fn advance_if_arrived(&self, position: Point<f64>) -> Option<Node> {
        let mut route = self.route.lock();
        let head = route.front()?;
        if geometry::distance_m(position, head.position) < self.arrival_radius_m {
            route.pop_front()
        } else {
            None
        }
    }

    /// Geodesic length of the remaining route, starting from `position`.
    pub fn remaining_distance_m(&self, position: Point<f64>) -> f64 {
        let route = self.route.lock();
        let mut total = 0.0;
        let mut prev = position;
        for node in route.iter() {
            total += geometry::distance_m(prev, node.position);
            prev = node.position;
        }
        total
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
