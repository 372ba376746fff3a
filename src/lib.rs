//! # wayfinder — Indoor Wayfinding Core
//!
//! Guides a pedestrian inside a building to a target room by combining a
//! static indoor-routing graph with dynamic shortest-path queries, and a
//! barometric detector that turns noisy pressure samples into confirmed
//! floor-change events.
//!
//! ## Design Principles
//!
//! 1. **Graph as arena**: nodes keyed by string id, edges stored as id lists
//!    and resolved via lookup — no pointers, so transient splice nodes can
//!    never dangle
//! 2. **Weights derived, never stored**: every edge weight is the geodesic
//!    distance between its endpoint positions, computed on demand
//! 3. **Queries leave no trace**: every routing query restores the graph it
//!    mutated; `cleanup()` runs even after failed requests
//! 4. **Events are values**: floor changes and waypoints are returned to the
//!    caller, not pushed through observable singletons
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wayfinder::{FloorTracker, PressureSample, Room, RoomGraph, Router};
//! use geo::Point;
//!
//! # fn example() -> wayfinder::Result<()> {
//! // Load a building graph and register it under its room-id prefix.
//! let graph = RoomGraph::from_json(include_str!("../assets/graph_a.json"))?;
//! let mut router = Router::new();
//! router.add_building("A", graph);
//!
//! // Route from the user's position to a resolved room.
//! let destination = Room::new("A2310", 22.1419, 65.6177, 2);
//! router.request_route(Point::new(22.1410, 65.6170), &destination);
//! while let Some(waypoint) = router.pop() {
//!     println!("head to {}", waypoint.id);
//! }
//!
//! // Independently, feed barometer samples and watch for floor changes.
//! let mut tracker = FloorTracker::new(0);
//! if let Some(change) = tracker.process_sample(PressureSample::new(0, 1013.2)) {
//!     println!("now on floor {}", change.floor);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Components
//!
//! | Component | Module | Role |
//! |-----------|--------|------|
//! | `RoomGraph` | [`graph`] | one building: load, project, search, cleanup |
//! | `Router` | [`router`] | building selection + pull-based waypoint queue |
//! | `FloorTracker` | [`floor`] | pressure ring buffer + dwell state machine |
//! | `RoomDirectory` | [`directory`] | local room cache of the resolver |

// ============================================================================
// Modules
// ============================================================================

pub mod directory;
pub mod floor;
pub mod graph;
pub mod model;
pub mod router;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Node, NodeId, NodeType, Room};

// ============================================================================
// Re-exports: Graph
// ============================================================================

pub use graph::{NodeRecord, RoomGraph};

// ============================================================================
// Re-exports: Router
// ============================================================================

pub use router::{RouteOutcome, Router};

// ============================================================================
// Re-exports: Floor tracking
// ============================================================================

pub use floor::{FloorChange, FloorConfig, FloorDirection, FloorTracker, PressureSample};

// ============================================================================
// Re-exports: Directory
// ============================================================================

pub use directory::RoomDirectory;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node '{node}' references unknown neighbor '{neighbor}'")]
    DanglingEdge { node: String, neighbor: String },

    #[error("duplicate node id '{0}' in graph definition")]
    DuplicateNode(String),

    #[error("node '{0}' uses the reserved type 'temp'")]
    ReservedNodeType(String),

    #[error("invalid definition: {0}")]
    Definition(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
