//! Player sessions and their status machine.
//!
//! A session starts `InProgress` and ends in exactly one of `Completed`,
//! `Failed` or `Abandoned`. `end_time` is set if and only if the status is
//! terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{PlayerId, RoomId, SessionId};

/// Ceiling for a session's health.
pub const MAX_HEALTH: i32 = 200;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Still being played.
    InProgress,
    /// Every room was cleared.
    Completed,
    /// Health hit zero.
    Failed,
    /// The player walked away.
    Abandoned,
}

impl SessionStatus {
    /// Whether no further action can change this session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.pad("in progress"),
            Self::Completed => f.pad("completed"),
            Self::Failed => f.pad("failed"),
            Self::Abandoned => f.pad("abandoned"),
        }
    }
}

/// One player's run through a fixed sequence of rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier.
    pub id: SessionId,
    /// The player running the session.
    pub player_id: PlayerId,
    /// Room templates in play order. May repeat.
    pub room_ids: Vec<RoomId>,
    /// Number of rooms already resolved (0..=total_rooms).
    pub current_room_index: u32,
    /// Running score. May go negative.
    pub score: i64,
    /// Current health, always within `0..=MAX_HEALTH`.
    pub current_health: i32,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// When the session was created.
    pub start_time: DateTime<Utc>,
    /// When the session reached a terminal status.
    pub end_time: Option<DateTime<Utc>>,
    /// Last time the session was mutated.
    pub last_save_time: DateTime<Utc>,
}

impl Session {
    /// Start a fresh session over `room_ids`.
    pub fn new(
        player_id: PlayerId,
        room_ids: Vec<RoomId>,
        starting_health: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            player_id,
            room_ids,
            current_room_index: 0,
            score: 0,
            current_health: starting_health.clamp(0, MAX_HEALTH),
            status: SessionStatus::InProgress,
            start_time: now,
            end_time: None,
            last_save_time: now,
        }
    }

    /// Number of rooms generated for this session.
    pub fn total_rooms(&self) -> u32 {
        self.room_ids.len() as u32
    }

    /// Whether the player may submit another action.
    pub fn can_continue(&self) -> bool {
        self.status == SessionStatus::InProgress
            && self.current_health > 0
            && self.current_room_index < self.total_rooms()
    }

    /// Whether the session has ended.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The room the next action will be taken in.
    pub fn current_room(&self) -> Option<RoomId> {
        self.room_ids.get(self.current_room_index as usize).copied()
    }

    /// 1-based position of the room the next action will be taken in.
    pub fn next_room_number(&self) -> u32 {
        self.current_room_index + 1
    }

    /// Apply one resolved action and evaluate termination.
    ///
    /// Health is clamped to `0..=MAX_HEALTH`. Zero health fails the session
    /// even on the last room. Returns `true` if a terminal status was entered.
    pub fn advance(&mut self, points_change: i32, health_change: i32, now: DateTime<Utc>) -> bool {
        self.score += i64::from(points_change);
        self.current_health = self
            .current_health
            .saturating_add(health_change)
            .clamp(0, MAX_HEALTH);
        self.current_room_index += 1;
        self.last_save_time = now;

        if self.current_health <= 0 {
            self.finish(SessionStatus::Failed, now);
        } else if self.current_room_index >= self.total_rooms() {
            self.finish(SessionStatus::Completed, now);
        }
        self.is_terminal()
    }

    /// Mark the session abandoned.
    ///
    /// A session that already ended keeps its result; returns `false` in that
    /// case.
    pub fn abandon(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.finish(SessionStatus::Abandoned, now);
        true
    }

    fn finish(&mut self, status: SessionStatus, now: DateTime<Utc>) {
        self.status = status;
        self.end_time = Some(now);
        self.last_save_time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(rooms: usize, health: i32) -> Session {
        let rooms = (0..rooms).map(|_| RoomId::new()).collect();
        Session::new(PlayerId::new(), rooms, health, Utc::now())
    }

    #[test]
    fn fresh_session() {
        let s = session(3, 100);
        assert_eq!(s.score, 0);
        assert_eq!(s.current_health, 100);
        assert_eq!(s.current_room_index, 0);
        assert_eq!(s.status, SessionStatus::InProgress);
        assert!(s.end_time.is_none());
        assert_eq!(s.start_time, s.last_save_time);
        assert!(s.can_continue());
        assert_eq!(s.current_room(), Some(s.room_ids[0]));
        assert_eq!(s.next_room_number(), 1);
    }

    #[test]
    fn advance_completes_after_last_room() {
        let mut s = session(2, 100);
        assert!(!s.advance(10, 0, Utc::now()));
        assert_eq!(s.status, SessionStatus::InProgress);
        assert!(s.advance(5, -10, Utc::now()));
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.score, 15);
        assert_eq!(s.current_health, 90);
        assert_eq!(s.current_room_index, 2);
        assert!(s.end_time.is_some());
        assert!(!s.can_continue());
        assert_eq!(s.current_room(), None);
    }

    #[test]
    fn zero_health_fails_even_on_last_room() {
        let mut s = session(1, 100);
        assert!(s.advance(100, -150, Utc::now()));
        assert_eq!(s.current_health, 0);
        assert_eq!(s.status, SessionStatus::Failed);
    }

    #[test]
    fn health_is_clamped_to_ceiling() {
        let mut s = session(3, 190);
        s.advance(0, 50, Utc::now());
        assert_eq!(s.current_health, MAX_HEALTH);
    }

    #[test]
    fn starting_health_is_clamped() {
        assert_eq!(session(1, 500).current_health, MAX_HEALTH);
    }

    #[test]
    fn score_can_go_negative() {
        let mut s = session(3, 100);
        s.advance(-20, 0, Utc::now());
        assert_eq!(s.score, -20);
    }

    #[test]
    fn abandon_in_progress() {
        let mut s = session(3, 100);
        assert!(s.abandon(Utc::now()));
        assert_eq!(s.status, SessionStatus::Abandoned);
        assert!(s.end_time.is_some());
        assert!(!s.can_continue());
    }

    #[test]
    fn abandon_keeps_finished_result() {
        let mut s = session(1, 100);
        s.advance(50, 0, Utc::now());
        let ended = s.end_time;
        assert!(!s.abandon(Utc::now()));
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.end_time, ended);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!SessionStatus::InProgress.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(SessionStatus::Abandoned.is_terminal());
    }
}
