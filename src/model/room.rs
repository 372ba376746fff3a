//! A resolved destination room.

use geo::Point;
use serde::{Deserialize, Serialize};

use super::NodeId;

/// A room as returned by the room resolver (directory cache or an external
/// lookup). This is the only destination shape the router consumes — raw
/// user-entered text never reaches routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: NodeId,
    pub longitude: f64,
    pub latitude: f64,
    pub floor: i32,
}

impl Room {
    pub fn new(id: impl Into<NodeId>, longitude: f64, latitude: f64, floor: i32) -> Self {
        Self {
            id: id.into(),
            longitude,
            latitude,
            floor,
        }
    }

    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}
