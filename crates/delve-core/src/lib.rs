//! Core types for Delve, a turn-based dungeon crawl.
//!
//! This crate holds the data model the progression engine works on: the
//! admin-tuned [`RewardTable`], [`RoomDefinition`] templates, player
//! [`Session`]s and the [`Action`]s resolved inside them. It does no I/O and
//! draws no random numbers; see `delve-engine` for that.

/// Resolved player actions and their outcomes.
pub mod action;
/// Error types used throughout the crate.
pub mod error;
/// Strongly typed identifiers.
pub mod id;
/// Reward ranges and the reward table.
pub mod reward;
/// Room templates.
pub mod room;
/// Player sessions and their status machine.
pub mod session;

/// Re-export action types.
pub use action::{Action, ActionOutcome, ActionType};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export identifier types.
pub use id::{ActionId, PlayerId, RoomId, SessionId};
/// Re-export reward types.
pub use reward::{AdminViolation, RewardRange, RewardTable};
/// Re-export room types.
pub use room::{RoomCategory, RoomDefinition};
/// Re-export session types.
pub use session::{MAX_HEALTH, Session, SessionStatus};
