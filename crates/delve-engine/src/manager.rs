//! The session lifecycle manager.
//!
//! Creates sessions, applies actions to them, and abandons them. Every
//! mutation of a stored session happens under that session's lock, so two
//! actions racing on the same session can never both read the pre-update
//! state.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use rand::rngs::StdRng;

use delve_core::{
    Action, ActionId, ActionType, PlayerId, RewardTable, RoomDefinition, Session, SessionId,
    SessionStatus,
};

use crate::catalog::RoomCatalog;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::locks::SessionLocks;
use crate::resolver::resolve;
use crate::rewards::RewardSource;
use crate::store::SessionStore;

/// Owns session creation, per-action state transitions, and termination.
pub struct SessionManager {
    catalog: Arc<dyn RoomCatalog>,
    rewards: Arc<dyn RewardSource>,
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
    rng: Mutex<StdRng>,
}

impl SessionManager {
    /// Create a manager over the given collaborators.
    pub fn new(
        catalog: Arc<dyn RoomCatalog>,
        rewards: Arc<dyn RewardSource>,
        store: Arc<dyn SessionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            rewards,
            store,
            locks: SessionLocks::new(),
            rng: Mutex::new(config.build_rng()),
        }
    }

    /// Start a new session for `player_id`.
    ///
    /// Draws `room_count` rooms uniformly, with replacement, from the active
    /// catalog. Fails with `PreconditionFailed` if no reward table is
    /// configured or no room is active.
    pub fn create_session(&self, player_id: PlayerId) -> EngineResult<Session> {
        let table = self.active_table()?;
        table.validate()?;

        let rooms = self.catalog.list_active_rooms();
        if rooms.is_empty() {
            log::warn!("cannot start session for player {player_id}: no rooms available");
            return Err(EngineError::PreconditionFailed(
                "no rooms available".to_string(),
            ));
        }

        let room_ids = {
            let mut rng = self.rng.lock();
            (0..table.room_count)
                .map(|_| rooms[rng.random_range(0..rooms.len())].id)
                .collect()
        };

        let session = Session::new(player_id, room_ids, table.starting_health, Utc::now());
        self.store.save_session(&session)?;

        log::info!(
            "session {} started for player {player_id}: {} rooms, {} health",
            session.id,
            session.total_rooms(),
            session.current_health
        );
        Ok(session)
    }

    /// Whether `session` accepts another action.
    pub fn can_continue(&self, session: &Session) -> bool {
        session.can_continue()
    }

    /// Resolve `action_type` in the session's current room and apply it.
    ///
    /// Fails with `NotFound` for an unknown session, `PreconditionFailed`
    /// when no reward table is configured, and `InvalidState` when the
    /// session cannot continue.
    pub fn process_action(
        &self,
        session_id: SessionId,
        action_type: ActionType,
    ) -> EngineResult<Action> {
        let _guard = self.locks.acquire(session_id);

        let mut session = self.load(session_id)?;
        let table = self.active_table()?;

        if !session.can_continue() {
            return Err(EngineError::InvalidState(format!(
                "session {session_id} cannot continue ({}, health {}, room {}/{})",
                session.status,
                session.current_health,
                session.current_room_index,
                session.total_rooms()
            )));
        }

        let resolution = {
            let mut rng = self.rng.lock();
            resolve(action_type, &table, &mut *rng)
        };

        let now = Utc::now();
        let room_number = session.next_room_number();
        let ended = session.advance(resolution.points_change, resolution.health_change, now);

        let action = Action {
            id: ActionId::new(),
            session_id,
            action_type,
            outcome: resolution.outcome,
            points_change: resolution.points_change,
            health_change: resolution.health_change,
            room_number,
            timestamp: now,
        };
        self.store.record_action(&session, &action)?;

        log::debug!(
            "session {session_id} room {room_number}: {action_type} -> {} ({:+} points, {:+} health)",
            action.outcome,
            action.points_change,
            action.health_change
        );
        if ended {
            log::info!(
                "session {session_id} {} with score {}",
                session.status,
                session.score
            );
        }

        Ok(action)
    }

    /// Resolve an action given by name. Unknown names are `InvalidArgument`.
    pub fn process_named_action(&self, session_id: SessionId, action: &str) -> EngineResult<Action> {
        let action_type: ActionType = action.parse()?;
        self.process_action(session_id, action_type)
    }

    /// Mark a session abandoned.
    ///
    /// Returns `Ok(false)` if the session does not exist. A session that has
    /// already finished keeps its result and still returns `Ok(true)`.
    pub fn abandon_session(&self, session_id: SessionId) -> EngineResult<bool> {
        let _guard = self.locks.acquire(session_id);

        let Some(mut session) = self.store.load_session(session_id)? else {
            return Ok(false);
        };

        if session.abandon(Utc::now()) {
            self.store.save_session(&session)?;
            log::info!("session {session_id} abandoned at room {}", session.current_room_index);
        } else {
            log::warn!(
                "abandon ignored for session {session_id}: already {}",
                session.status
            );
        }
        Ok(true)
    }

    /// Fetch a session.
    pub fn get_session(&self, session_id: SessionId) -> EngineResult<Session> {
        self.load(session_id)
    }

    /// Actions recorded for a session, oldest first.
    pub fn list_actions(&self, session_id: SessionId) -> EngineResult<Vec<Action>> {
        self.load(session_id)?;
        self.store.list_actions(session_id)
    }

    /// Every session a player has started, newest first.
    pub fn sessions_for_player(&self, player_id: PlayerId) -> EngineResult<Vec<Session>> {
        let mut sessions = self.store.sessions_for_player(player_id)?;
        sessions.sort_by_key(|s| Reverse(s.start_time));
        Ok(sessions)
    }

    /// The player's newest session that is still in progress.
    pub fn current_session(&self, player_id: PlayerId) -> EngineResult<Option<Session>> {
        Ok(self
            .sessions_for_player(player_id)?
            .into_iter()
            .find(|s| s.status == SessionStatus::InProgress))
    }

    /// The room templates of a session in play order. Rooms removed from the
    /// catalog since the session started come back as `None`.
    pub fn session_rooms(&self, session_id: SessionId) -> EngineResult<Vec<Option<RoomDefinition>>> {
        let session = self.load(session_id)?;
        Ok(session
            .room_ids
            .iter()
            .map(|id| self.catalog.get_room(*id))
            .collect())
    }

    fn load(&self, session_id: SessionId) -> EngineResult<Session> {
        self.store
            .load_session(session_id)?
            .ok_or_else(|| EngineError::NotFound(format!("session {session_id}")))
    }

    fn active_table(&self) -> EngineResult<RewardTable> {
        self.rewards.active_table().ok_or_else(|| {
            log::warn!("reward table not configured");
            EngineError::PreconditionFailed("reward table not configured".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use delve_core::{ActionOutcome, RewardRange, RoomCategory};

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::rewards::RewardStore;
    use crate::store::InMemoryStore;

    fn manager_with(table: Option<RewardTable>, catalog: InMemoryCatalog) -> SessionManager {
        let rewards = match table {
            Some(t) => RewardStore::new(t),
            None => RewardStore::empty(),
        };
        SessionManager::new(
            Arc::new(catalog),
            Arc::new(rewards),
            Arc::new(InMemoryStore::new()),
            EngineConfig::default().with_seed(42),
        )
    }

    fn manager() -> SessionManager {
        manager_with(Some(RewardTable::default()), InMemoryCatalog::starter())
    }

    #[test]
    fn create_session_draws_room_count_rooms() {
        let catalog = InMemoryCatalog::starter();
        let active: Vec<_> = catalog.list_active_rooms().iter().map(|r| r.id).collect();
        let mgr = manager_with(Some(RewardTable::default()), catalog);

        let session = mgr.create_session(PlayerId::new()).unwrap();
        assert_eq!(session.room_ids.len(), 5);
        assert!(session.room_ids.iter().all(|id| active.contains(id)));
        assert_eq!(session.current_health, 100);
        assert_eq!(session.score, 0);
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(mgr.get_session(session.id).unwrap(), session);
    }

    #[test]
    fn single_room_catalog_repeats_rooms() {
        let room = RoomDefinition::new("Only Room", RoomCategory::Combat);
        let id = room.id;
        let mgr = manager_with(Some(RewardTable::default()), InMemoryCatalog::from_rooms([room]));
        let session = mgr.create_session(PlayerId::new()).unwrap();
        assert!(session.room_ids.iter().all(|r| *r == id));
    }

    #[test]
    fn inactive_rooms_never_drawn() {
        let hidden = RoomDefinition::new("Hidden", RoomCategory::Search).with_active(false);
        let hidden_id = hidden.id;
        let table = RewardTable {
            room_count: 40,
            ..RewardTable::default()
        };
        let mgr = manager_with(
            Some(table),
            InMemoryCatalog::from_rooms([RoomDefinition::new("Open", RoomCategory::Combat), hidden]),
        );
        let session = mgr.create_session(PlayerId::new()).unwrap();
        assert!(!session.room_ids.contains(&hidden_id));
    }

    #[test]
    fn create_requires_reward_table() {
        let mgr = manager_with(None, InMemoryCatalog::starter());
        let err = mgr.create_session(PlayerId::new()).unwrap_err();
        assert_eq!(
            err,
            EngineError::PreconditionFailed("reward table not configured".into())
        );
    }

    #[test]
    fn create_requires_rooms() {
        let mgr = manager_with(Some(RewardTable::default()), InMemoryCatalog::new());
        let err = mgr.create_session(PlayerId::new()).unwrap_err();
        assert_eq!(err, EngineError::PreconditionFailed("no rooms available".into()));
    }

    #[test]
    fn create_rejects_invalid_table() {
        let table = RewardTable {
            room_count: 0,
            ..RewardTable::default()
        };
        let mgr = manager_with(Some(table), InMemoryCatalog::starter());
        assert!(matches!(
            mgr.create_session(PlayerId::new()),
            Err(EngineError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn process_action_updates_session() {
        let mgr = manager();
        let session = mgr.create_session(PlayerId::new()).unwrap();

        let action = mgr.process_action(session.id, ActionType::Flee).unwrap();
        assert_eq!(action.outcome, ActionOutcome::Escaped);
        assert_eq!(action.room_number, 1);
        assert_eq!(action.session_id, session.id);

        let after = mgr.get_session(session.id).unwrap();
        assert_eq!(after.current_room_index, 1);
        assert_eq!(after.score, i64::from(action.points_change));
        assert_eq!(after.current_health, 100);
        assert!(after.last_save_time >= session.last_save_time);
    }

    #[test]
    fn room_numbers_are_one_based_and_sequential() {
        let mgr = manager();
        let session = mgr.create_session(PlayerId::new()).unwrap();
        let mut numbers = Vec::new();
        while mgr.get_session(session.id).unwrap().can_continue() {
            numbers.push(mgr.process_action(session.id, ActionType::Flee).unwrap().room_number);
        }
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            mgr.get_session(session.id).unwrap().status,
            SessionStatus::Completed
        );
    }

    #[test]
    fn process_action_on_unknown_session() {
        let mgr = manager();
        let err = mgr.process_action(SessionId::new(), ActionType::Combat).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn process_action_without_table() {
        let rewards = Arc::new(RewardStore::new(RewardTable::default()));
        let mgr = SessionManager::new(
            Arc::new(InMemoryCatalog::starter()),
            rewards.clone(),
            Arc::new(InMemoryStore::new()),
            EngineConfig::default().with_seed(1),
        );
        let session = mgr.create_session(PlayerId::new()).unwrap();
        rewards.clear();
        let err = mgr.process_action(session.id, ActionType::Search).unwrap_err();
        assert!(matches!(err, EngineError::PreconditionFailed(_)));
    }

    #[test]
    fn finished_session_rejects_actions() {
        let mgr = manager();
        let session = mgr.create_session(PlayerId::new()).unwrap();
        mgr.abandon_session(session.id).unwrap();
        let err = mgr.process_action(session.id, ActionType::Flee).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
        assert!(mgr.list_actions(session.id).unwrap().is_empty());
    }

    #[test]
    fn named_actions() {
        let mgr = manager();
        let session = mgr.create_session(PlayerId::new()).unwrap();
        let action = mgr.process_named_action(session.id, "flee").unwrap();
        assert_eq!(action.action_type, ActionType::Flee);

        let err = mgr.process_named_action(session.id, "dance").unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert_eq!(mgr.get_session(session.id).unwrap().current_room_index, 1);
    }

    #[test]
    fn abandon_unknown_session_is_false() {
        assert!(!manager().abandon_session(SessionId::new()).unwrap());
    }

    #[test]
    fn abandon_sets_end_time() {
        let mgr = manager();
        let session = mgr.create_session(PlayerId::new()).unwrap();
        assert!(mgr.abandon_session(session.id).unwrap());
        let after = mgr.get_session(session.id).unwrap();
        assert_eq!(after.status, SessionStatus::Abandoned);
        assert!(after.end_time.is_some());
    }

    #[test]
    fn abandon_completed_session_keeps_result() {
        let table = RewardTable {
            room_count: 1,
            ..RewardTable::default()
        };
        let mgr = manager_with(Some(table), InMemoryCatalog::starter());
        let session = mgr.create_session(PlayerId::new()).unwrap();
        mgr.process_action(session.id, ActionType::Flee).unwrap();
        let finished = mgr.get_session(session.id).unwrap();
        assert_eq!(finished.status, SessionStatus::Completed);

        assert!(mgr.abandon_session(session.id).unwrap());
        assert_eq!(mgr.get_session(session.id).unwrap(), finished);
    }

    #[test]
    fn player_sessions_newest_first() {
        let mgr = manager();
        let player = PlayerId::new();
        let first = mgr.create_session(player).unwrap();
        let second = mgr.create_session(player).unwrap();
        mgr.create_session(PlayerId::new()).unwrap();

        let sessions = mgr.sessions_for_player(player).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].start_time >= sessions[1].start_time);

        mgr.abandon_session(second.id).unwrap();
        let current = mgr.current_session(player).unwrap().unwrap();
        assert_eq!(current.id, first.id);

        mgr.abandon_session(first.id).unwrap();
        assert!(mgr.current_session(player).unwrap().is_none());
    }

    #[test]
    fn session_rooms_resolve_against_catalog() {
        let mgr = manager();
        let session = mgr.create_session(PlayerId::new()).unwrap();
        let rooms = mgr.session_rooms(session.id).unwrap();
        assert_eq!(rooms.len(), 5);
        for (room, id) in rooms.iter().zip(&session.room_ids) {
            assert_eq!(room.as_ref().map(|r| r.id), Some(*id));
        }
    }

    #[test]
    fn list_actions_for_unknown_session() {
        let err = manager().list_actions(SessionId::new()).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn lock_entries_released_after_finished_sessions_are_retried() {
        let table = RewardTable {
            room_count: 1,
            ..RewardTable::default()
        };
        let mgr = manager_with(Some(table), InMemoryCatalog::starter());
        for _ in 0..100 {
            let session = mgr.create_session(PlayerId::new()).unwrap();
            mgr.process_action(session.id, ActionType::Flee).unwrap();
            let err = mgr.process_action(session.id, ActionType::Flee).unwrap_err();
            assert!(matches!(err, EngineError::InvalidState(_)));
        }
        assert!(mgr.locks.is_empty());
    }

    #[test]
    fn lock_entries_released_on_every_error_path() {
        let rewards = Arc::new(RewardStore::new(RewardTable::default()));
        let mgr = SessionManager::new(
            Arc::new(InMemoryCatalog::starter()),
            rewards.clone(),
            Arc::new(InMemoryStore::new()),
            EngineConfig::default().with_seed(2),
        );
        let session = mgr.create_session(PlayerId::new()).unwrap();
        mgr.process_action(session.id, ActionType::Flee).unwrap();
        assert!(mgr.locks.is_empty());

        rewards.clear();
        assert!(mgr.process_action(session.id, ActionType::Flee).is_err());
        assert!(mgr.process_action(SessionId::new(), ActionType::Flee).is_err());
        assert!(!mgr.abandon_session(SessionId::new()).unwrap());
        assert!(mgr.locks.is_empty());

        assert!(mgr.abandon_session(session.id).unwrap());
        assert!(mgr.locks.is_empty());
    }

    #[test]
    fn potion_cannot_push_health_past_ceiling() {
        let table = RewardTable {
            potion_health_gain: RewardRange::fixed(100),
            treasure_points: RewardRange::fixed(0),
            trap_points: RewardRange::fixed(0),
            trap_health_loss: RewardRange::fixed(0),
            starting_health: 180,
            room_count: 20,
            ..RewardTable::default()
        };
        let mgr = manager_with(Some(table), InMemoryCatalog::starter());
        let session = mgr.create_session(PlayerId::new()).unwrap();
        for _ in 0..20 {
            mgr.process_action(session.id, ActionType::Search).unwrap();
            let s = mgr.get_session(session.id).unwrap();
            assert!((0..=delve_core::MAX_HEALTH).contains(&s.current_health));
        }
    }
}
