//! Outcome resolution.
//!
//! Maps an action and the active reward table to an outcome and a pair of
//! deltas. The shape of the result is fixed by the branch taken; only the
//! magnitudes are random, drawn inclusively from the table's ranges.
//!
//! Combat is a fair coin. Search splits a single uniform draw into three
//! equal thirds: treasure, potion, trap. Flee always escapes.

use rand::Rng;

use delve_core::{ActionOutcome, ActionType, RewardRange, RewardTable};

use crate::error::EngineResult;

/// The result of resolving one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// What happened.
    pub outcome: ActionOutcome,
    /// Score delta.
    pub points_change: i32,
    /// Health delta, before the session clamps it.
    pub health_change: i32,
}

/// Resolve `action` against `table` using `rng`.
pub fn resolve<R: Rng + ?Sized>(action: ActionType, table: &RewardTable, rng: &mut R) -> Resolution {
    match action {
        ActionType::Combat => resolve_combat(table, rng),
        ActionType::Search => resolve_search(table, rng),
        ActionType::Flee => Resolution {
            outcome: ActionOutcome::Escaped,
            points_change: draw(table.flee_points, rng),
            health_change: 0,
        },
    }
}

/// Resolve an action given by name. Unknown names are an invalid argument.
pub fn resolve_named<R: Rng + ?Sized>(
    action: &str,
    table: &RewardTable,
    rng: &mut R,
) -> EngineResult<Resolution> {
    let action: ActionType = action.parse()?;
    Ok(resolve(action, table, rng))
}

fn resolve_combat<R: Rng + ?Sized>(table: &RewardTable, rng: &mut R) -> Resolution {
    if rng.random_bool(0.5) {
        Resolution {
            outcome: ActionOutcome::Victory,
            points_change: draw(table.combat_victory_points, rng),
            health_change: 0,
        }
    } else {
        Resolution {
            outcome: ActionOutcome::Defeat,
            points_change: draw(table.combat_defeat_points, rng),
            health_change: draw(table.combat_defeat_health_loss, rng),
        }
    }
}

fn resolve_search<R: Rng + ?Sized>(table: &RewardTable, rng: &mut R) -> Resolution {
    let roll: f64 = rng.random();
    if roll < 1.0 / 3.0 {
        Resolution {
            outcome: ActionOutcome::FoundTreasure,
            points_change: draw(table.treasure_points, rng),
            health_change: 0,
        }
    } else if roll < 2.0 / 3.0 {
        Resolution {
            outcome: ActionOutcome::FoundPotion,
            points_change: 0,
            health_change: draw(table.potion_health_gain, rng),
        }
    } else {
        Resolution {
            outcome: ActionOutcome::TriggeredTrap,
            points_change: draw(table.trap_points, rng),
            health_change: draw(table.trap_health_loss, rng),
        }
    }
}

fn draw<R: Rng + ?Sized>(range: RewardRange, rng: &mut R) -> i32 {
    rng.random_range(range.as_inclusive())
}
