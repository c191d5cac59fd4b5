//! The reward table store.
//!
//! Exactly one table is active at a time; there is no id to choose between
//! several. Readers always get an owned snapshot, so an edit that lands
//! mid-resolution cannot tear the table a resolution is using.

use parking_lot::RwLock;

use delve_core::RewardTable;

use crate::error::{EngineError, EngineResult};

/// Read access to the active reward table.
pub trait RewardSource: Send + Sync {
    /// A snapshot of the active table, if one is configured.
    fn active_table(&self) -> Option<RewardTable>;
}

/// Holds the single active reward table.
#[derive(Debug, Default)]
pub struct RewardStore {
    active: RwLock<Option<RewardTable>>,
}

impl RewardStore {
    /// A store with no table configured.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store with `table` active. The table is not validated here; use
    /// [`RewardStore::replace`] for admin edits.
    pub fn new(table: RewardTable) -> Self {
        Self {
            active: RwLock::new(Some(table)),
        }
    }

    /// Validate `table` and make it the active one.
    pub fn replace(&self, table: RewardTable) -> EngineResult<()> {
        table.validate()?;
        *self.active.write() = Some(table);
        Ok(())
    }

    /// Copy every field of `table` onto the active table.
    ///
    /// Fails if no table is configured yet, or if `table` is invalid.
    pub fn update(&self, table: &RewardTable) -> EngineResult<RewardTable> {
        table.validate()?;
        let mut active = self.active.write();
        let existing = active.as_mut().ok_or_else(|| {
            EngineError::PreconditionFailed("reward table not configured".to_string())
        })?;
        existing.apply_update(table);
        Ok(*existing)
    }

    /// Remove the active table. Returns `false` if there was none.
    pub fn clear(&self) -> bool {
        self.active.write().take().is_some()
    }
}

impl RewardSource for RewardStore {
    fn active_table(&self) -> Option<RewardTable> {
        *self.active.read()
    }
}
