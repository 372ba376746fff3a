//! # Routing Model
//!
//! Clean DTOs shared by the graph engine, the router, and the directory.
//!
//! Design rule: this module is pure data — no I/O, no locks, no search
//! state. Positions are `geo::Point<f64>` with `x` = longitude and
//! `y` = latitude, in degrees.

pub mod node;
pub mod room;

pub use node::{Node, NodeId, NodeType};
pub use room::Room;
