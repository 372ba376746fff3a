//! # Room Directory
//!
//! The local-cache half of the room resolver: a JSON list of rooms loaded
//! once, answering exact-id lookups and the substring search behind the
//! search-bar pick list. Online lookup for rooms missing from the cache is
//! a separate collaborator — the router only ever sees resolved [`Room`]s.

use std::io::Read;

use tracing::debug;

use crate::model::Room;
use crate::Result;

pub struct RoomDirectory {
    rooms: Vec<Room>,
}

impl RoomDirectory {
    /// Load the directory from a JSON array of
    /// `{ "id", "longitude", "latitude", "floor" }` records.
    pub fn from_json(json: &str) -> Result<Self> {
        let rooms: Vec<Room> = serde_json::from_str(json)?;
        debug!(rooms = rooms.len(), "room directory loaded");
        Ok(Self { rooms })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let rooms: Vec<Room> = serde_json::from_reader(reader)?;
        debug!(rooms = rooms.len(), "room directory loaded");
        Ok(Self { rooms })
    }

    /// Exact-id lookup.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id.as_str() == id)
    }

    /// Case-insensitive substring search over room ids, in directory order.
    pub fn search(&self, query: &str) -> Vec<&Room> {
        let query = query.to_lowercase();
        self.rooms
            .iter()
            .filter(|r| r.id.as_str().to_lowercase().contains(&query))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
