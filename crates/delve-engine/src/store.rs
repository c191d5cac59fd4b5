//! Persistence of sessions and their actions.

use std::collections::HashMap;

use parking_lot::RwLock;

use delve_core::{Action, PlayerId, Session, SessionId};

use crate::action_log::ActionLog;
use crate::error::EngineResult;

/// Where sessions and actions live between calls.
///
/// Implementations do not need to serialize writers to the same session;
/// the [`crate::SessionManager`] holds a per-session lock around every
/// read-modify-write.
pub trait SessionStore: Send + Sync {
    /// Insert or overwrite a session.
    fn save_session(&self, session: &Session) -> EngineResult<()>;

    /// Fetch a session by id.
    fn load_session(&self, id: SessionId) -> EngineResult<Option<Session>>;

    /// Record a resolved action.
    fn append_action(&self, action: &Action) -> EngineResult<()>;

    /// Actions for a session, oldest first.
    fn list_actions(&self, session_id: SessionId) -> EngineResult<Vec<Action>>;

    /// All sessions belonging to a player, in any order.
    fn sessions_for_player(&self, player_id: PlayerId) -> EngineResult<Vec<Session>>;

    /// Persist the session state and the action that produced it.
    ///
    /// The default saves then appends. Back-ends with transactions should
    /// override this to commit both together.
    fn record_action(&self, session: &Session, action: &Action) -> EngineResult<()> {
        self.save_session(session)?;
        self.append_action(action)
    }
}

/// A store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    actions: RwLock<ActionLog>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Number of stored actions across all sessions.
    pub fn action_count(&self) -> usize {
        self.actions.read().len()
    }
}

impl SessionStore for InMemoryStore {
    fn save_session(&self, session: &Session) -> EngineResult<()> {
        self.sessions.write().insert(session.id, session.clone());
        Ok(())
    }

    fn load_session(&self, id: SessionId) -> EngineResult<Option<Session>> {
        Ok(self.sessions.read().get(&id).cloned())
    }

    fn append_action(&self, action: &Action) -> EngineResult<()> {
        self.actions.write().append(action.clone());
        Ok(())
    }

    fn record_action(&self, session: &Session, action: &Action) -> EngineResult<()> {
        let mut sessions = self.sessions.write();
        let mut actions = self.actions.write();
        sessions.insert(session.id, session.clone());
        actions.append(action.clone());
        Ok(())
    }

    fn list_actions(&self, session_id: SessionId) -> EngineResult<Vec<Action>> {
        Ok(self.actions.read().list_by_session(session_id).to_vec())
    }

    fn sessions_for_player(&self, player_id: PlayerId) -> EngineResult<Vec<Session>> {
        Ok(self
            .sessions
            .read()
            .values()
            .filter(|s| s.player_id == player_id)
            .cloned()
            .collect())
    }
}
