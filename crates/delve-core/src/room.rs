use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::RoomId;

/// What a room is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    /// A monster waits inside.
    Combat,
    /// The room is worth searching.
    Search,
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combat => f.pad("combat"),
            Self::Search => f.pad("search"),
        }
    }
}

impl FromStr for RoomCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "combat" => Ok(Self::Combat),
            "search" => Ok(Self::Search),
            _ => Err(CoreError::UnknownRoomCategory(s.to_string())),
        }
    }
}

/// A reusable room template that generated sessions draw from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDefinition {
    /// Unique identifier.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Flavor text shown when the player enters.
    #[serde(default)]
    pub description: String,
    /// Combat or search.
    pub category: RoomCategory,
    /// Only active rooms take part in session generation.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RoomDefinition {
    /// Create an active room with a fresh id and no description.
    pub fn new(name: impl Into<String>, category: RoomCategory) -> Self {
        Self {
            id: RoomId::new(),
            name: name.into(),
            description: String::new(),
            category,
            active: true,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
