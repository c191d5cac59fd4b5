//! Session progression engine for Delve.
//!
//! [`SessionManager`] builds sessions from the active [`RoomCatalog`] and
//! [`RewardSource`], resolves player actions through [`resolve`], and
//! persists sessions and their [`ActionLog`] through a [`SessionStore`].
//! Every call is synchronous; concurrent actions on one session are
//! serialized by a per-session lock.

/// Append-only, time-ordered action records.
pub mod action_log;
/// The room catalog collaborator.
pub mod catalog;
/// Engine configuration.
pub mod config;
/// Error types for the engine.
pub mod error;
/// Per-session mutual exclusion.
pub mod locks;
/// The session lifecycle manager.
pub mod manager;
/// Outcome resolution.
pub mod resolver;
/// The reward table collaborator.
pub mod rewards;
/// The persistence collaborator.
pub mod store;

/// Re-export of [`action_log::ActionLog`].
pub use action_log::ActionLog;
/// Re-exports of the room catalog types.
pub use catalog::{InMemoryCatalog, RoomCatalog};
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-exports of [`error::EngineError`] and [`error::EngineResult`].
pub use error::{EngineError, EngineResult};
/// Re-export of [`manager::SessionManager`].
pub use manager::SessionManager;
/// Re-exports of the resolver entry points.
pub use resolver::{Resolution, resolve, resolve_named};
/// Re-exports of the reward table types.
pub use rewards::{RewardSource, RewardStore};
/// Re-exports of the persistence types.
pub use store::{InMemoryStore, SessionStore};
