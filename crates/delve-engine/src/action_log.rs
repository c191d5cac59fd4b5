//! Append-only storage of resolved actions.

use std::collections::HashMap;

use delve_core::{Action, SessionId};

/// Resolved actions grouped by session, each group ordered by timestamp.
///
/// Actions sharing a timestamp keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    by_session: HashMap<SessionId, Vec<Action>>,
}

impl ActionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action. Recorded actions are never modified.
    pub fn append(&mut self, action: Action) {
        let entries = self.by_session.entry(action.session_id).or_default();
        let at = entries.partition_point(|a| a.timestamp <= action.timestamp);
        entries.insert(at, action);
    }

    /// Actions for one session, oldest first.
    pub fn list_by_session(&self, session_id: SessionId) -> &[Action] {
        self.by_session
            .get(&session_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of recorded actions.
    pub fn len(&self) -> usize {
        self.by_session.values().map(Vec::len).sum()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.by_session.values().all(Vec::is_empty)
    }
}
