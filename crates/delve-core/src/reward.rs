//! The reward table: admin-tuned bounds on every randomized point and health
//! delta the engine can hand out.
//!
//! Exactly one table is active at a time. The engine reads a snapshot of it
//! for every resolution and never writes to it; edits arrive out of band and
//! go through [`RewardTable::apply_update`].

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::session::MAX_HEALTH;

/// An inclusive `(min, max)` pair with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct RewardRange {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawRange {
    min: i32,
    max: i32,
}

impl TryFrom<RawRange> for RewardRange {
    type Error = CoreError;

    fn try_from(raw: RawRange) -> CoreResult<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl RewardRange {
    /// Create a range, rejecting `min > max`.
    pub fn new(min: i32, max: i32) -> CoreResult<Self> {
        Self::for_field("range", min, max)
    }

    /// Create a range, naming `field` in the error if `min > max`.
    pub fn for_field(field: &'static str, min: i32, max: i32) -> CoreResult<Self> {
        if min > max {
            return Err(CoreError::InvalidRange { field, min, max });
        }
        Ok(Self { min, max })
    }

    /// A degenerate range that always yields `value`.
    pub fn fixed(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Lower bound (inclusive).
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound (inclusive).
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Whether every draw from this range yields the same value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// The range as a std inclusive range, for sampling.
    pub fn as_inclusive(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }
}

impl fmt::Display for RewardRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// Bounds on every randomized delta, plus session shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Points awarded for winning a fight.
    pub combat_victory_points: RewardRange,
    /// Points lost for losing a fight (a non-positive range).
    pub combat_defeat_points: RewardRange,
    /// Health lost for losing a fight (a non-positive range).
    pub combat_defeat_health_loss: RewardRange,
    /// Points for finding treasure while searching.
    pub treasure_points: RewardRange,
    /// Health restored by a potion found while searching.
    pub potion_health_gain: RewardRange,
    /// Points lost to a trap.
    pub trap_points: RewardRange,
    /// Health lost to a trap.
    pub trap_health_loss: RewardRange,
    /// Points lost for fleeing a room.
    pub flee_points: RewardRange,
    /// Number of rooms in every generated session.
    pub room_count: u32,
    /// Health a fresh session starts with.
    pub starting_health: i32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            combat_victory_points: RewardRange { min: 80, max: 120 },
            combat_defeat_points: RewardRange { min: -60, max: -40 },
            combat_defeat_health_loss: RewardRange { min: -40, max: -20 },
            treasure_points: RewardRange { min: 60, max: 90 },
            potion_health_gain: RewardRange { min: 30, max: 50 },
            trap_points: RewardRange { min: -35, max: -15 },
            trap_health_loss: RewardRange { min: -30, max: -10 },
            flee_points: RewardRange { min: -20, max: -10 },
            room_count: 5,
            starting_health: 100,
        }
    }
}

/// A reward table value outside the range admin tooling allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminViolation {
    /// The field (and bound) that is out of range, e.g. `trap_points.min`.
    pub field: String,
    /// The offending value.
    pub value: i64,
    /// The range admin tooling accepts for this field.
    pub allowed: RangeInclusive<i64>,
}

impl fmt::Display for AdminViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} (allowed {}..={})",
            self.field,
            self.value,
            self.allowed.start(),
            self.allowed.end()
        )
    }
}

impl RewardTable {
    /// Check the invariants the engine relies on.
    ///
    /// Range ordering is already guaranteed by [`RewardRange`]; this covers the
    /// session shape.
    pub fn validate(&self) -> CoreResult<()> {
        if self.room_count == 0 {
            return Err(CoreError::InvalidRoomCount(self.room_count));
        }
        if !(1..=MAX_HEALTH).contains(&self.starting_health) {
            return Err(CoreError::InvalidStartingHealth(self.starting_health));
        }
        Ok(())
    }

    /// Overwrite every field of `self` with the matching field of `other`.
    ///
    /// The destructuring below is exhaustive, so adding a field to the table
    /// without copying it here fails to compile.
    pub fn apply_update(&mut self, other: &RewardTable) {
        let RewardTable {
            combat_victory_points,
            combat_defeat_points,
            combat_defeat_health_loss,
            treasure_points,
            potion_health_gain,
            trap_points,
            trap_health_loss,
            flee_points,
            room_count,
            starting_health,
        } = *other;

        self.combat_victory_points = combat_victory_points;
        self.combat_defeat_points = combat_defeat_points;
        self.combat_defeat_health_loss = combat_defeat_health_loss;
        self.treasure_points = treasure_points;
        self.potion_health_gain = potion_health_gain;
        self.trap_points = trap_points;
        self.trap_health_loss = trap_health_loss;
        self.flee_points = flee_points;
        self.room_count = room_count;
        self.starting_health = starting_health;
    }

    /// All eight ranges, labelled by field name.
    pub fn ranges(&self) -> [(&'static str, RewardRange); 8] {
        [
            ("combat_victory_points", self.combat_victory_points),
            ("combat_defeat_points", self.combat_defeat_points),
            ("combat_defeat_health_loss", self.combat_defeat_health_loss),
            ("treasure_points", self.treasure_points),
            ("potion_health_gain", self.potion_health_gain),
            ("trap_points", self.trap_points),
            ("trap_health_loss", self.trap_health_loss),
            ("flee_points", self.flee_points),
        ]
    }

    /// Values outside the limits the admin console enforces.
    ///
    /// The engine runs fine on tables that violate these; they exist so that
    /// tooling can warn before a table is published.
    pub fn admin_violations(&self) -> Vec<AdminViolation> {
        let mut out = Vec::new();
        for (field, range) in self.ranges() {
            let allowed = admin_limit(field);
            for (bound, value) in [("min", range.min), ("max", range.max)] {
                let value = i64::from(value);
                if !allowed.contains(&value) {
                    out.push(AdminViolation {
                        field: format!("{field}.{bound}"),
                        value,
                        allowed: allowed.clone(),
                    });
                }
            }
        }
        let room_count = i64::from(self.room_count);
        if !(1..=50).contains(&room_count) {
            out.push(AdminViolation {
                field: "room_count".to_string(),
                value: room_count,
                allowed: 1..=50,
            });
        }
        let starting_health = i64::from(self.starting_health);
        if !(50..=200).contains(&starting_health) {
            out.push(AdminViolation {
                field: "starting_health".to_string(),
                value: starting_health,
                allowed: 50..=200,
            });
        }
        out
    }
}

fn admin_limit(field: &str) -> RangeInclusive<i64> {
    match field {
        "combat_victory_points" | "treasure_points" => 50..=1000,
        "combat_defeat_health_loss" | "trap_health_loss" => -100..=0,
        "potion_health_gain" => 20..=100,
        _ => -1000..=0,
    }
}
