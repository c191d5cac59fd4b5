use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{ActionId, SessionId};

/// What the player chose to do in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Fight whatever is in the room.
    Combat,
    /// Search the room.
    Search,
    /// Leave the room without engaging.
    Flee,
}

impl ActionType {
    /// All action types, in declaration order.
    pub const ALL: [ActionType; 3] = [Self::Combat, Self::Search, Self::Flee];
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combat => f.pad("combat"),
            Self::Search => f.pad("search"),
            Self::Flee => f.pad("flee"),
        }
    }
}

impl FromStr for ActionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "combat" | "fight" => Ok(Self::Combat),
            "search" => Ok(Self::Search),
            "flee" => Ok(Self::Flee),
            _ => Err(CoreError::UnknownActionType(s.to_string())),
        }
    }
}

/// The resolved result of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Won the fight.
    Victory,
    /// Lost the fight.
    Defeat,
    /// Found treasure.
    FoundTreasure,
    /// Found a healing potion.
    FoundPotion,
    /// Set off a trap.
    TriggeredTrap,
    /// Got away.
    Escaped,
}

impl ActionOutcome {
    /// The action type this outcome can result from.
    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Victory | Self::Defeat => ActionType::Combat,
            Self::FoundTreasure | Self::FoundPotion | Self::TriggeredTrap => ActionType::Search,
            Self::Escaped => ActionType::Flee,
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::FoundTreasure => "found treasure",
            Self::FoundPotion => "found potion",
            Self::TriggeredTrap => "triggered trap",
            Self::Escaped => "escaped",
        };
        f.pad(s)
    }
}

/// One resolved player decision. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier.
    pub id: ActionId,
    /// The session this action belongs to.
    pub session_id: SessionId,
    /// What the player chose.
    pub action_type: ActionType,
    /// What happened.
    pub outcome: ActionOutcome,
    /// Change applied to the score.
    pub points_change: i32,
    /// Change drawn for health, before clamping.
    pub health_change: i32,
    /// 1-based room position the action was taken in.
    pub room_number: u32,
    /// When the action was resolved.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_action_type() {
        assert_eq!("combat".parse::<ActionType>(), Ok(ActionType::Combat));
        assert_eq!("Fight".parse::<ActionType>(), Ok(ActionType::Combat));
        assert_eq!("FLEE".parse::<ActionType>(), Ok(ActionType::Flee));
        assert_eq!(
            "dance".parse::<ActionType>(),
            Err(CoreError::UnknownActionType("dance".to_string()))
        );
    }

    #[test]
    fn display_parses_back() {
        for t in ActionType::ALL {
            assert_eq!(t.to_string().parse::<ActionType>(), Ok(t));
        }
    }

    #[test]
    fn outcomes_map_to_their_action() {
        assert_eq!(ActionOutcome::Defeat.action_type(), ActionType::Combat);
        assert_eq!(ActionOutcome::FoundPotion.action_type(), ActionType::Search);
        assert_eq!(ActionOutcome::Escaped.action_type(), ActionType::Flee);
    }
}
