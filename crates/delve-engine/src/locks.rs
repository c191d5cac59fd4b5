//! Per-session mutual exclusion.
//!
//! Each session id maps to its own mutex, so actions on one session run one
//! at a time while different sessions proceed in parallel. Entries exist only
//! while some caller holds or waits on them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

use delve_core::SessionId;

/// A lazily populated map of session id to lock.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no other caller holds `id`, then hold it until the
    /// returned guard is dropped.
    pub fn acquire(&self, id: SessionId) -> SessionGuard<'_> {
        let lock = Arc::clone(self.locks.lock().entry(id).or_default());
        SessionGuard {
            locks: self,
            id,
            guard: Some(lock.lock_arc()),
        }
    }

    /// Number of sessions with a live lock.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Whether no session has a live lock.
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }

    // The map lock is held while counting, and every new handle is cloned
    // under that same lock, so a count of one means nobody holds or waits.
    fn release(&self, id: SessionId) {
        let mut locks = self.locks.lock();
        if locks.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&id);
        }
    }
}

/// Exclusive hold on one session, released on drop.
pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    id: SessionId,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl SessionGuard<'_> {
    /// The session this guard holds.
    pub fn session_id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own handle no longer counts.
        self.guard.take();
        self.locks.release(self.id);
    }
}
