//! The room catalog the engine draws session rooms from.

use parking_lot::RwLock;

use delve_core::{RoomCategory, RoomDefinition, RoomId};

/// Read access to room templates.
///
/// The engine only reads; editing templates is an admin concern.
pub trait RoomCatalog: Send + Sync {
    /// Every room currently eligible for session generation.
    fn list_active_rooms(&self) -> Vec<RoomDefinition>;

    /// Look up a room by id, active or not.
    fn get_room(&self, id: RoomId) -> Option<RoomDefinition>;
}

/// A catalog held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    rooms: RwLock<Vec<RoomDefinition>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `rooms`.
    pub fn from_rooms(rooms: impl IntoIterator<Item = RoomDefinition>) -> Self {
        Self {
            rooms: RwLock::new(rooms.into_iter().collect()),
        }
    }

    /// A small stock dungeon: three fights and three searches.
    pub fn starter() -> Self {
        Self::from_rooms([
            RoomDefinition::new("Goblin Warren", RoomCategory::Combat)
                .with_description("A pack of goblins looks up from their fire."),
            RoomDefinition::new("Skeleton Crypt", RoomCategory::Combat)
                .with_description("Bones rattle and rise from the alcoves."),
            RoomDefinition::new("Troll Bridge", RoomCategory::Combat)
                .with_description("A troll blocks the only way across."),
            RoomDefinition::new("Dusty Library", RoomCategory::Search)
                .with_description("Shelves of rotting books, and something glinting."),
            RoomDefinition::new("Abandoned Armory", RoomCategory::Search)
                .with_description("Racks of rusted weapons line the walls."),
            RoomDefinition::new("Mysterious Chest", RoomCategory::Search)
                .with_description("An iron-bound chest sits alone in the room."),
        ])
    }

    /// Add or replace a room.
    pub fn insert(&self, room: RoomDefinition) {
        let mut rooms = self.rooms.write();
        match rooms.iter_mut().find(|r| r.id == room.id) {
            Some(existing) => *existing = room,
            None => rooms.push(room),
        }
    }

    /// Toggle whether a room takes part in new sessions. Returns `false` if
    /// the room does not exist.
    pub fn set_active(&self, id: RoomId, active: bool) -> bool {
        match self.rooms.write().iter_mut().find(|r| r.id == id) {
            Some(room) => {
                room.active = active;
                true
            }
            None => false,
        }
    }

    /// Every room, active or not.
    pub fn list_all(&self) -> Vec<RoomDefinition> {
        self.rooms.read().clone()
    }
}

impl RoomCatalog for InMemoryCatalog {
    fn list_active_rooms(&self) -> Vec<RoomDefinition> {
        self.rooms.read().iter().filter(|r| r.active).cloned().collect()
    }

    fn get_room(&self, id: RoomId) -> Option<RoomDefinition> {
        self.rooms.read().iter().find(|r| r.id == id).cloned()
    }
}
