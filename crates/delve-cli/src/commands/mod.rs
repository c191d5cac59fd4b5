pub mod play;
pub mod rewards;
pub mod simulate;

use std::path::Path;
use std::sync::Arc;

use delve_core::{RewardTable, RoomDefinition};
use delve_engine::{EngineConfig, InMemoryCatalog, InMemoryStore, RewardStore, SessionManager};

/// Load a reward table from a JSON file, or fall back to the built-in one.
fn load_rewards(path: Option<&Path>) -> Result<RewardTable, String> {
    let Some(path) = path else {
        return Ok(RewardTable::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let table: RewardTable = serde_json::from_str(&text)
        .map_err(|e| format!("invalid reward table in {}: {e}", path.display()))?;
    log::info!("loaded reward table from {}", path.display());
    Ok(table)
}

/// Load a room catalog from a JSON array of rooms, or fall back to the
/// built-in dungeon.
fn load_rooms(path: Option<&Path>) -> Result<InMemoryCatalog, String> {
    let Some(path) = path else {
        return Ok(InMemoryCatalog::starter());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let rooms: Vec<RoomDefinition> = serde_json::from_str(&text)
        .map_err(|e| format!("invalid room catalog in {}: {e}", path.display()))?;
    log::info!("loaded {} rooms from {}", rooms.len(), path.display());
    Ok(InMemoryCatalog::from_rooms(rooms))
}

/// Wire an in-memory engine from the given configuration files.
fn build_engine(
    rewards: Option<&Path>,
    rooms: Option<&Path>,
    seed: Option<u64>,
) -> Result<SessionManager, String> {
    let table = load_rewards(rewards)?;
    let catalog = load_rooms(rooms)?;

    let mut config = EngineConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    Ok(SessionManager::new(
        Arc::new(catalog),
        Arc::new(RewardStore::new(table)),
        Arc::new(InMemoryStore::new()),
        config,
    ))
}
